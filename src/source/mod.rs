//! Package sources, file-list caches and install repositories.

pub mod folder;
pub mod memory;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::types::PackageMetadata;

pub use folder::FolderRepository;
pub use memory::{InMemoryError, InMemoryFileCache, InMemoryPackage, InMemoryPackageSource};

/// Reads package contents.
///
/// Implementations must return file lists in a stable order.
pub trait PackageSource: Send + Sync {
    /// Error type for source operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Package-relative paths of every file in the package.
    fn files(&self, id: &str, version: &str) -> Result<Vec<String>, Self::Error>;

    /// Projection-relevant nuspec contents.
    fn metadata(&self, id: &str, version: &str) -> Result<PackageMetadata, Self::Error>;
}

/// File lists already read elsewhere in the restore.
pub trait PackageFileCache: Send + Sync {
    /// Cached file list, if the package was inspected before.
    fn get(&self, id: &str, version: &str) -> Option<Arc<Vec<String>>>;
}

/// An installed-package folder.
pub trait PackageRepository: Send + Sync {
    /// Repository root.
    fn root(&self) -> &Path;

    /// Install directory of a package, if it is present.
    fn install_path(&self, id: &str, version: &str) -> Option<PathBuf>;
}

/// Case-insensitive `(id, version)` lookup key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct PackageKey(String, String);

impl PackageKey {
    pub(crate) fn new(id: &str, version: &str) -> Self {
        Self(id.to_ascii_lowercase(), version.to_ascii_lowercase())
    }
}
