//! Runtime configuration.
//!
//! ## Environment
//!
//! - `NUGET_XPROJ_WRITE_TARGETS`: write build-integration files for projects
//!   that are not msbuild-based (`true`/`false`, default `false`)
//! - `RESTORE_PROJECTION_INPUT`: path of the JSON restore input read by the
//!   `restore_projection` binary (stdin when unset)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable forcing build-integration files for every project.
pub const WRITE_TARGETS_ENV: &str = "NUGET_XPROJ_WRITE_TARGETS";

/// Environment variable naming the binary's input file.
pub const INPUT_ENV: &str = "RESTORE_PROJECTION_INPUT";

/// Projection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionConfig {
    /// Aggregate build assets even for projects that are not msbuild-based.
    #[serde(default)]
    pub force_write_targets: bool,
    /// Restore input file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_path: Option<PathBuf>,
}

impl ProjectionConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, for hosts with their own environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let force_write_targets = match lookup(WRITE_TARGETS_ENV) {
            Some(raw) => match parse_bool(&raw) {
                Some(value) => value,
                None => {
                    tracing::warn!(variable = WRITE_TARGETS_ENV, value = %raw, "Ignoring non-boolean value");
                    false
                }
            },
            None => false,
        };

        let input_path = lookup(INPUT_ENV).filter(|s| !s.is_empty()).map(PathBuf::from);

        Self {
            force_write_targets,
            input_path,
        }
    }
}

/// Parse `true`/`false`, case-insensitively and ignoring surrounding whitespace.
fn parse_bool(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
