//! On-disk package folder.

use std::path::{Path, PathBuf};

use super::PackageRepository;

/// Package folder with the lower-cased `{root}/{id}/{version}` layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRepository {
    root: PathBuf,
}

impl FolderRepository {
    /// Create a repository rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Install directory a package would have, whether or not it exists.
    pub fn package_directory(&self, id: &str, version: &str) -> PathBuf {
        self.root
            .join(id.to_ascii_lowercase())
            .join(version.to_ascii_lowercase())
    }
}

impl PackageRepository for FolderRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn install_path(&self, id: &str, version: &str) -> Option<PathBuf> {
        let dir = self.package_directory(id, version);
        dir.is_dir().then_some(dir)
    }
}
