//! Projection errors.

use std::path::PathBuf;

use crate::framework::FrameworkParseError;

/// Fatal error for one library or one target.
///
/// Build-asset divergence and empty graph sets are not errors; they are
/// reported through [`crate::BuildAssetsResult`].
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    /// The package file list could not be read.
    #[error("Package files unavailable for {id} {version}: {reason}")]
    PackageFilesUnavailable {
        /// Package id.
        id: String,
        /// Package version.
        version: String,
        /// Source error text.
        reason: String,
    },

    /// The package metadata could not be read.
    #[error("Package metadata unavailable for {id} {version}: {reason}")]
    MetadataUnavailable {
        /// Package id.
        id: String,
        /// Package version.
        version: String,
        /// Source error text.
        reason: String,
    },

    /// A framework name could not be parsed.
    #[error("Invalid framework: {0}")]
    Framework(#[from] FrameworkParseError),

    /// No runtime-agnostic graph exists for a project framework.
    #[error("No runtime-agnostic graph for framework {0}")]
    MissingTargetGraph(String),

    /// More than one runtime-agnostic graph exists for a project framework.
    #[error("Multiple runtime-agnostic graphs for framework {0}")]
    AmbiguousTargetGraph(String),

    /// A package was not found in any repository.
    #[error("Package {id} {version} is not installed in any repository")]
    PackageNotInstalled {
        /// Package id.
        id: String,
        /// Package version.
        version: String,
    },

    /// A project-relative path could not be computed.
    #[error("Cannot make {path} relative to {base}")]
    RelativePath {
        /// Absolute path.
        path: PathBuf,
        /// Base directory.
        base: PathBuf,
    },
}

/// Result alias for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
