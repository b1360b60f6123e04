//! Core types for restore projection.

pub mod flags;
pub mod library;
pub mod graph;
pub mod project;
pub mod content;
pub mod metadata;
pub mod manifest;

pub use flags::{IncludeFlags, IncludeFlagsParseError};
pub use library::{DependencyTarget, LibraryKey, LibraryKind, PackageDependency};
pub use graph::{
    FrameworkDependency, GraphNode, LibraryDependency, ProjectReferenceInfo,
    ProjectRestoreMetadataFile, ReferenceType, ResolvedGraph,
};
pub use project::{ProjectSpec, ProjectStyle, TargetFrameworkInfo};
pub use content::{
    AssetProperties, ContentItem, ContentItemGroup, CriteriaEntry, PatternSet, SelectionCriteria,
};
pub use metadata::{ContentFilesEntry, FrameworkSpecificGroup, PackageMetadata};
pub use manifest::{
    is_empty_folder, AssetKind, BuildAction, ContentFileItem, ManifestAsset, ManifestItem,
    ManifestLibraryEntry, ManifestTarget, RuntimeAssetType, RuntimeTarget, EMPTY_FOLDER,
    FORWARD_SLASH_EMPTY_FOLDER,
};
