//! In-memory package source and file cache.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{PackageFileCache, PackageKey, PackageSource};
use crate::types::PackageMetadata;

/// Error type for the in-memory source.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InMemoryError {
    /// Package not found.
    #[error("Package not found: {id} {version}")]
    PackageNotFound {
        /// Package id.
        id: String,
        /// Package version.
        version: String,
    },
}

/// Contents of one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InMemoryPackage {
    /// Package id.
    pub id: String,
    /// Package version.
    pub version: String,
    /// Package-relative file paths.
    #[serde(default)]
    pub files: Vec<String>,
    /// Nuspec contents.
    #[serde(default)]
    pub metadata: PackageMetadata,
}

impl InMemoryPackage {
    /// Create a package with the given files and empty metadata.
    pub fn new<I, S>(id: impl Into<String>, version: impl Into<String>, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            version: version.into(),
            files: files.into_iter().map(Into::into).collect(),
            metadata: PackageMetadata::default(),
        }
    }

    /// Set the metadata.
    pub fn with_metadata(mut self, metadata: PackageMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Package source backed by a map; also serves as a file cache.
///
/// Uses BTreeMap for deterministic iteration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<InMemoryPackage>", into = "Vec<InMemoryPackage>")]
pub struct InMemoryPackageSource {
    packages: BTreeMap<PackageKey, InMemoryPackage>,
}

impl InMemoryPackageSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a package.
    pub fn add_package(&mut self, package: InMemoryPackage) {
        self.packages.insert(PackageKey::new(&package.id, &package.version), package);
    }

    /// Builder form of [`InMemoryPackageSource::add_package`].
    pub fn with_package(mut self, package: InMemoryPackage) -> Self {
        self.add_package(package);
        self
    }

    /// Look up a package.
    pub fn package(&self, id: &str, version: &str) -> Option<&InMemoryPackage> {
        self.packages.get(&PackageKey::new(id, version))
    }

    /// Number of packages.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// True when the source holds no packages.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    fn require(&self, id: &str, version: &str) -> Result<&InMemoryPackage, InMemoryError> {
        self.package(id, version).ok_or_else(|| InMemoryError::PackageNotFound {
            id: id.to_string(),
            version: version.to_string(),
        })
    }
}

impl From<Vec<InMemoryPackage>> for InMemoryPackageSource {
    fn from(packages: Vec<InMemoryPackage>) -> Self {
        let mut source = Self::new();
        for package in packages {
            source.add_package(package);
        }
        source
    }
}

impl From<InMemoryPackageSource> for Vec<InMemoryPackage> {
    fn from(source: InMemoryPackageSource) -> Self {
        source.packages.into_values().collect()
    }
}

impl PackageSource for InMemoryPackageSource {
    type Error = InMemoryError;

    fn files(&self, id: &str, version: &str) -> Result<Vec<String>, Self::Error> {
        Ok(self.require(id, version)?.files.clone())
    }

    fn metadata(&self, id: &str, version: &str) -> Result<PackageMetadata, Self::Error> {
        Ok(self.require(id, version)?.metadata.clone())
    }
}

impl PackageFileCache for InMemoryPackageSource {
    fn get(&self, id: &str, version: &str) -> Option<Arc<Vec<String>>> {
        self.package(id, version).map(|p| Arc::new(p.files.clone()))
    }
}

/// Shared file-list cache, populated at most once per package.
#[derive(Debug, Default)]
pub struct InMemoryFileCache {
    entries: RwLock<BTreeMap<PackageKey, Arc<Vec<String>>>>,
}

impl InMemoryFileCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file list, replacing any previous entry.
    pub fn insert(&self, id: &str, version: &str, files: Vec<String>) {
        self.entries.write().insert(PackageKey::new(id, version), Arc::new(files));
    }

    /// Return the cached list or populate it with `load`.
    ///
    /// `load` runs under the write lock, so concurrent callers for the same
    /// package never read it twice.
    pub fn get_or_insert_with<F, E>(&self, id: &str, version: &str, load: F) -> Result<Arc<Vec<String>>, E>
    where
        F: FnOnce() -> Result<Vec<String>, E>,
    {
        let key = PackageKey::new(id, version);
        if let Some(files) = self.entries.read().get(&key) {
            return Ok(Arc::clone(files));
        }

        let mut entries = self.entries.write();
        if let Some(files) = entries.get(&key) {
            return Ok(Arc::clone(files));
        }

        let files = Arc::new(load()?);
        entries.insert(key, Arc::clone(&files));
        Ok(files)
    }

    /// Number of cached packages.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl PackageFileCache for InMemoryFileCache {
    fn get(&self, id: &str, version: &str) -> Option<Arc<Vec<String>>> {
        self.entries.read().get(&PackageKey::new(id, version)).cloned()
    }
}
