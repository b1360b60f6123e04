//! # restore-projection
//!
//! Deterministic projection stage of a package restore.
//!
//! After dependency resolution has produced one graph per framework/runtime
//! pair, this crate answers two questions:
//!
//! > Which assets of each resolved library does the project actually consume?
//!
//! > Which build-integration files must the project import?
//!
//! ## Core Contract
//!
//! 1. Flatten per-edge include/suppress flags into one flag set per library
//!    ([`FlagPropagator`])
//! 2. Project each package or project reference into a manifest entry
//!    ([`project_package`], [`project_project`])
//! 3. Aggregate `{id}.props` / `{id}.targets` per framework and refuse to
//!    write them when frameworks disagree ([`ProjectAssetAggregator`])
//!
//! ## Architecture
//!
//! ```text
//! ResolvedGraph → FlagPropagator → IncludeFlagMap
//!                                        ↓
//! PackageSource → ConventionCatalog → LibraryProjector → ManifestTarget
//!                                        ↓
//! PackageFileCache + PackageRepository → ProjectAssetAggregator → BuildAssetsResult
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same graph + same package contents → identical manifest bytes
//! - Library entries are ordered by case-insensitive name, then version
//! - Build imports are sorted ordinally

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregator;
pub mod builder;
pub mod canonical;
pub mod catalog;
pub mod config;
pub mod error;
pub mod framework;
pub mod paths;
pub mod projector;
pub mod propagator;
pub mod source;
pub mod types;

// Re-exports
pub use aggregator::{BuildAssetsResult, ProjectAssetAggregator};
pub use builder::ManifestBuilder;
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};
pub use catalog::{AssetCatalog, ConventionCatalog};
pub use config::ProjectionConfig;
pub use error::{ProjectionError, Result};
pub use framework::{Framework, FrameworkFamily, FrameworkParseError, FrameworkReducer, TargetFramework};
pub use projector::{
    build_items_for_package_id, exclude_items, project_package, project_package_contents, project_project,
    PackageInput, ProjectionTarget,
};
pub use propagator::{FlagPropagator, IncludeFlagMap};
pub use source::{
    FolderRepository, InMemoryError, InMemoryFileCache, InMemoryPackage, InMemoryPackageSource, PackageFileCache,
    PackageRepository, PackageSource,
};
pub use types::{
    BuildAction, ContentFileItem, DependencyTarget, GraphNode, IncludeFlags, LibraryDependency, LibraryKey,
    LibraryKind, ManifestItem, ManifestLibraryEntry, ManifestTarget, PackageDependency, PackageMetadata,
    ProjectSpec, ProjectStyle, ResolvedGraph, RuntimeAssetType, RuntimeTarget,
};

/// Schema version of the manifest and build-asset output.
/// Increment on breaking changes to any serialized type.
pub const PROJECTION_SCHEMA_VERSION: &str = "1.0.0";
