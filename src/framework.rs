//! Target framework monikers, compatibility and nearest-match reduction.
//!
//! Frameworks are parsed from the short folder names used inside packages
//! (`net6.0`, `net472`, `netstandard2.0`, `netcoreapp3.1`, `any`) and compared
//! with a reduced compatibility table covering the families the package
//! conventions use.
//!
//! ## Nearest Selection
//!
//! Among the candidates compatible with a target, the reducer prefers:
//!
//! 1. the target's own family (highest version, platform-specific before generic)
//! 2. .NET Standard (highest version)
//! 3. `any`
//!
//! Ties keep the first candidate in input order, so callers control determinism
//! through the order they pass candidates in.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Error returned when a framework short name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameworkParseError {
    /// Empty input.
    #[error("Framework name is empty")]
    Empty,
    /// Unknown framework identifier.
    #[error("Unknown framework identifier: {0}")]
    UnknownIdentifier(String),
    /// Version part could not be parsed.
    #[error("Invalid framework version in '{0}'")]
    InvalidVersion(String),
}

/// Framework family (identifier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FrameworkFamily {
    /// Compatible with every target (`any` folders, native assets).
    Any,
    /// Desktop .NET Framework (`net45`, `net472`).
    NetFramework,
    /// .NET Standard.
    NetStandard,
    /// .NET Core and unified .NET 5+ (`netcoreapp3.1`, `net6.0`).
    NetCoreApp,
    /// A framework that could not be resolved for a project reference.
    Unsupported,
}

/// Framework version, compared component-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FrameworkVersion {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Build component.
    pub patch: u32,
}

impl FrameworkVersion {
    /// Create a version from components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }
}

/// A concrete target framework.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Framework {
    family: FrameworkFamily,
    version: FrameworkVersion,
    platform: Option<String>,
}

/// Shared `any` framework for groups that carry no framework of their own.
pub static ANY_FRAMEWORK: Framework = Framework {
    family: FrameworkFamily::Any,
    version: FrameworkVersion::new(0, 0, 0),
    platform: None,
};

impl Framework {
    /// Create a framework from its parts.
    pub fn new(family: FrameworkFamily, version: FrameworkVersion) -> Self {
        Self { family, version, platform: None }
    }

    /// The `any` framework.
    pub fn any() -> Self {
        Self::new(FrameworkFamily::Any, FrameworkVersion::default())
    }

    /// The framework recorded for incompatible project references.
    pub fn unsupported() -> Self {
        Self::new(FrameworkFamily::Unsupported, FrameworkVersion::default())
    }

    /// Attach an OS platform (`net6.0-windows`).
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        let platform = platform.into().to_ascii_lowercase();
        self.platform = if platform.is_empty() { None } else { Some(platform) };
        self
    }

    /// Parse a short folder name such as `net6.0` or `netstandard2.0`.
    pub fn parse(name: &str) -> Result<Self, FrameworkParseError> {
        let lowered = name.trim().to_ascii_lowercase();
        if lowered.is_empty() {
            return Err(FrameworkParseError::Empty);
        }

        let (moniker, platform) = match lowered.split_once('-') {
            Some((m, p)) => (m, Some(p)),
            None => (lowered.as_str(), None),
        };

        let framework = match moniker {
            "any" => Self::any(),
            "unsupported" => Self::unsupported(),
            _ => {
                if let Some(rest) = moniker.strip_prefix("netstandard") {
                    Self::new(FrameworkFamily::NetStandard, parse_version(rest, name)?)
                } else if let Some(rest) = moniker.strip_prefix("netcoreapp") {
                    Self::new(FrameworkFamily::NetCoreApp, parse_version(rest, name)?)
                } else if let Some(rest) = moniker.strip_prefix("net") {
                    let version = parse_version(rest, name)?;
                    let family = if version.major >= 5 {
                        FrameworkFamily::NetCoreApp
                    } else {
                        FrameworkFamily::NetFramework
                    };
                    Self::new(family, version)
                } else {
                    return Err(FrameworkParseError::UnknownIdentifier(name.to_string()));
                }
            }
        };

        Ok(match platform {
            Some(p) => framework.with_platform(p),
            None => framework,
        })
    }

    /// Framework family.
    pub fn family(&self) -> FrameworkFamily {
        self.family
    }

    /// Framework version.
    pub fn version(&self) -> FrameworkVersion {
        self.version
    }

    /// OS platform, if any.
    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    /// True for frameworks with unified package-based semantics.
    ///
    /// Framework assembly (GAC) references are only carried for frameworks
    /// where this is false.
    pub fn is_package_based(&self) -> bool {
        matches!(self.family, FrameworkFamily::NetStandard | FrameworkFamily::NetCoreApp)
    }

    /// True for desktop .NET Framework.
    pub fn is_desktop(&self) -> bool {
        self.family == FrameworkFamily::NetFramework
    }

    /// Short folder name (`net6.0`, `net472`, `netstandard2.0`).
    pub fn short_folder_name(&self) -> String {
        let v = self.version;
        let base = match self.family {
            FrameworkFamily::Any => "any".to_string(),
            FrameworkFamily::Unsupported => "unsupported".to_string(),
            FrameworkFamily::NetFramework => {
                if v == FrameworkVersion::default() {
                    "net".to_string()
                } else if v.patch > 0 {
                    format!("net{}{}{}", v.major, v.minor, v.patch)
                } else {
                    format!("net{}{}", v.major, v.minor)
                }
            }
            FrameworkFamily::NetStandard => format!("netstandard{}.{}", v.major, v.minor),
            FrameworkFamily::NetCoreApp if v.major >= 5 => format!("net{}.{}", v.major, v.minor),
            FrameworkFamily::NetCoreApp => format!("netcoreapp{}.{}", v.major, v.minor),
        };

        match &self.platform {
            Some(p) => format!("{base}-{p}"),
            None => base,
        }
    }

    /// Full framework name as written in manifests (`.NETCoreApp,Version=v6.0`).
    ///
    /// The version shows major and minor, plus the build component when set.
    /// Platforms are not part of the name.
    pub fn dotnet_framework_name(&self) -> String {
        let identifier = match self.family {
            FrameworkFamily::Any => "Any",
            FrameworkFamily::Unsupported => "Unsupported",
            FrameworkFamily::NetFramework => ".NETFramework",
            FrameworkFamily::NetStandard => ".NETStandard",
            FrameworkFamily::NetCoreApp => ".NETCoreApp",
        };
        let v = self.version;
        if v.patch > 0 {
            format!("{identifier},Version=v{}.{}.{}", v.major, v.minor, v.patch)
        } else {
            format!("{identifier},Version=v{}.{}", v.major, v.minor)
        }
    }

    /// Check whether assets built for `candidate` can be consumed by `self`.
    pub fn is_compatible_with(&self, candidate: &Framework) -> bool {
        if candidate.family == FrameworkFamily::Any {
            return true;
        }

        if self.family == FrameworkFamily::Unsupported || candidate.family == FrameworkFamily::Unsupported {
            return false;
        }

        if candidate.family == self.family {
            let platform_ok = match (&candidate.platform, &self.platform) {
                (None, _) => true,
                (Some(c), Some(t)) => c == t,
                (Some(_), None) => false,
            };
            return platform_ok && candidate.version <= self.version;
        }

        if candidate.family == FrameworkFamily::NetStandard && candidate.platform.is_none() {
            return match max_netstandard_for(self) {
                Some(max) => candidate.version <= max,
                None => false,
            };
        }

        false
    }

    /// Precedence of a compatible candidate; higher is nearer.
    fn precedence(&self, candidate: &Framework) -> (u8, FrameworkVersion, bool) {
        let rank = if candidate.family == self.family {
            3
        } else if candidate.family == FrameworkFamily::NetStandard {
            2
        } else {
            1
        };
        (rank, candidate.version, candidate.platform.is_some())
    }
}

/// Highest .NET Standard version a target can consume.
fn max_netstandard_for(target: &Framework) -> Option<FrameworkVersion> {
    let v = target.version;
    match target.family {
        FrameworkFamily::NetCoreApp if v >= FrameworkVersion::new(3, 0, 0) => Some(FrameworkVersion::new(2, 1, 0)),
        FrameworkFamily::NetCoreApp if v >= FrameworkVersion::new(2, 0, 0) => Some(FrameworkVersion::new(2, 0, 0)),
        FrameworkFamily::NetCoreApp if v >= FrameworkVersion::new(1, 0, 0) => Some(FrameworkVersion::new(1, 6, 0)),
        FrameworkFamily::NetFramework if v >= FrameworkVersion::new(4, 6, 1) => Some(FrameworkVersion::new(2, 0, 0)),
        FrameworkFamily::NetFramework if v >= FrameworkVersion::new(4, 6, 0) => Some(FrameworkVersion::new(1, 3, 0)),
        FrameworkFamily::NetFramework if v >= FrameworkVersion::new(4, 5, 1) => Some(FrameworkVersion::new(1, 2, 0)),
        FrameworkFamily::NetFramework if v >= FrameworkVersion::new(4, 5, 0) => Some(FrameworkVersion::new(1, 1, 0)),
        _ => None,
    }
}

/// Parse the numeric part of a moniker: dotted (`6.0`) or packed digits (`472`).
fn parse_version(rest: &str, original: &str) -> Result<FrameworkVersion, FrameworkParseError> {
    if rest.is_empty() {
        return Ok(FrameworkVersion::default());
    }

    let invalid = || FrameworkParseError::InvalidVersion(original.to_string());

    let parts: Vec<u32> = if rest.contains('.') {
        rest.split('.')
            .map(|p| p.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<_, _>>()?
    } else {
        rest.chars()
            .map(|c| c.to_digit(10).ok_or_else(invalid))
            .collect::<Result<_, _>>()?
    };

    if parts.is_empty() || parts.len() > 4 {
        return Err(invalid());
    }

    Ok(FrameworkVersion::new(
        parts[0],
        parts.get(1).copied().unwrap_or(0),
        parts.get(2).copied().unwrap_or(0),
    ))
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_folder_name())
    }
}

impl FromStr for Framework {
    type Err = FrameworkParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Framework {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.short_folder_name())
    }
}

impl<'de> Deserialize<'de> for Framework {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A project target framework, optionally carrying legacy fallback frameworks
/// ("imports") that are tried in order when the primary yields no assets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetFramework {
    /// Primary framework.
    pub framework: Framework,
    /// Fallback frameworks in declared order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallbacks: Vec<Framework>,
}

impl TargetFramework {
    /// Create a target without fallbacks.
    pub fn new(framework: Framework) -> Self {
        Self { framework, fallbacks: Vec::new() }
    }

    /// Create a fallback target.
    pub fn with_fallbacks(framework: Framework, fallbacks: Vec<Framework>) -> Self {
        Self { framework, fallbacks }
    }

    /// Parse a short folder name into a target without fallbacks.
    pub fn parse(name: &str) -> Result<Self, FrameworkParseError> {
        Framework::parse(name).map(Self::new)
    }

    /// True if this target carries fallback frameworks.
    pub fn is_fallback(&self) -> bool {
        !self.fallbacks.is_empty()
    }

    /// Primary framework followed by each fallback.
    pub fn candidates(&self) -> impl Iterator<Item = &Framework> {
        std::iter::once(&self.framework).chain(self.fallbacks.iter())
    }
}

impl From<Framework> for TargetFramework {
    fn from(framework: Framework) -> Self {
        Self::new(framework)
    }
}

/// Nearest-framework selection over arbitrary items.
pub struct FrameworkReducer;

impl FrameworkReducer {
    /// Pick the item whose framework is nearest to `target`.
    ///
    /// Returns `None` when no item is compatible.
    pub fn nearest<'a, T, F>(target: &Framework, items: &'a [T], framework_of: F) -> Option<&'a T>
    where
        F: Fn(&T) -> &Framework,
    {
        let mut best: Option<(&'a T, (u8, FrameworkVersion, bool))> = None;

        for item in items {
            let candidate = framework_of(item);
            if !target.is_compatible_with(candidate) {
                continue;
            }

            let score = target.precedence(candidate);
            let replace = match &best {
                None => true,
                Some((_, best_score)) => score.cmp(best_score) == Ordering::Greater,
            };

            if replace {
                best = Some((item, score));
            }
        }

        best.map(|(item, _)| item)
    }

    /// Like [`FrameworkReducer::nearest`], retrying each fallback framework in
    /// order when the primary has no compatible item.
    pub fn nearest_with_fallback<'a, T, F>(target: &TargetFramework, items: &'a [T], framework_of: F) -> Option<&'a T>
    where
        F: Fn(&T) -> &Framework,
    {
        target
            .candidates()
            .find_map(|framework| Self::nearest(framework, items, &framework_of))
    }
}
