//! Library identity types.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a resolved library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LibraryKind {
    /// A package from a feed.
    Package,
    /// A project in the same restore.
    Project,
    /// A project outside of the restore closure.
    ExternalProject,
    /// A plain assembly reference.
    Reference,
    /// A dependency the resolver could not satisfy.
    Unresolved,
}

impl LibraryKind {
    /// Priority when packages and projects share a name; lower wins.
    pub(crate) fn lookup_priority(self) -> Option<u8> {
        match self {
            Self::Project => Some(0),
            Self::ExternalProject => Some(1),
            Self::Package => Some(2),
            Self::Reference | Self::Unresolved => None,
        }
    }

    /// True for project-like kinds.
    pub fn is_project(self) -> bool {
        matches!(self, Self::Project | Self::ExternalProject)
    }
}

impl fmt::Display for LibraryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Package => write!(f, "package"),
            Self::Project => write!(f, "project"),
            Self::ExternalProject => write!(f, "externalProject"),
            Self::Reference => write!(f, "reference"),
            Self::Unresolved => write!(f, "unresolved"),
        }
    }
}

/// Identity of a resolved library.
///
/// Flag aggregation keys on `name` alone, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LibraryKey {
    /// Library name (package id or project name).
    pub name: String,
    /// Resolved version.
    pub version: String,
    /// Library kind.
    pub kind: LibraryKind,
}

impl LibraryKey {
    /// Create a new key.
    pub fn new(name: impl Into<String>, version: impl Into<String>, kind: LibraryKind) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            kind,
        }
    }

    /// Create a package key.
    pub fn package(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(name, version, LibraryKind::Package)
    }

    /// Create a project key.
    pub fn project(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(name, version, LibraryKind::Project)
    }
}

impl fmt::Display for LibraryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.name, self.version, self.kind)
    }
}

bitflags! {
    /// Library kinds a dependency edge may resolve to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct DependencyTarget: u8 {
        /// Package.
        const PACKAGE          = 1 << 0;
        /// Project.
        const PROJECT          = 1 << 1;
        /// External project.
        const EXTERNAL_PROJECT = 1 << 2;
        /// Assembly reference.
        const REFERENCE        = 1 << 3;
        /// Framework assembly.
        const ASSEMBLY         = 1 << 4;
    }
}

impl DependencyTarget {
    /// Targets that appear as manifest dependencies.
    pub const PACKAGE_PROJECT_EXTERNAL: Self = Self::PACKAGE
        .union(Self::PROJECT)
        .union(Self::EXTERNAL_PROJECT);
}

impl Default for DependencyTarget {
    fn default() -> Self {
        Self::all()
    }
}

/// A `(id, versionRange)` pair written to the manifest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDependency {
    /// Dependency id.
    pub id: String,
    /// Version range in its textual form.
    pub version_range: String,
}

impl PackageDependency {
    /// Create a new dependency.
    pub fn new(id: impl Into<String>, version_range: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version_range: version_range.into(),
        }
    }
}
