//! Include flag sets.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Asset kinds a library is allowed to contribute to its consumer.
    ///
    /// Flags are ANDed along a path through the graph and ORed across
    /// multiple paths reaching the same library.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct IncludeFlags: u16 {
        /// Runtime assemblies, resources and framework assemblies.
        const RUNTIME          = 1 << 0;
        /// Compile-time reference assemblies.
        const COMPILE          = 1 << 1;
        /// `build/` props and targets.
        const BUILD            = 1 << 2;
        /// Native libraries.
        const NATIVE           = 1 << 3;
        /// `contentFiles/` items.
        const CONTENT_FILES    = 1 << 4;
        /// Analyzers.
        const ANALYZERS        = 1 << 5;
        /// `buildTransitive/` props and targets.
        const BUILD_TRANSITIVE = 1 << 6;
    }
}

/// Keyword names in declaration order, used for parsing and display.
const FLAG_NAMES: [(&str, IncludeFlags); 7] = [
    ("Runtime", IncludeFlags::RUNTIME),
    ("Compile", IncludeFlags::COMPILE),
    ("Build", IncludeFlags::BUILD),
    ("Native", IncludeFlags::NATIVE),
    ("ContentFiles", IncludeFlags::CONTENT_FILES),
    ("Analyzers", IncludeFlags::ANALYZERS),
    ("BuildTransitive", IncludeFlags::BUILD_TRANSITIVE),
];

impl IncludeFlags {
    /// No assets.
    pub const NONE: Self = Self::empty();
    /// Every asset kind.
    pub const ALL: Self = Self::all();
}

impl Default for IncludeFlags {
    fn default() -> Self {
        Self::ALL
    }
}

/// Error returned when an include flag keyword is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown include flag: {0}")]
pub struct IncludeFlagsParseError(pub String);

impl FromStr for IncludeFlags {
    type Err = IncludeFlagsParseError;

    /// Parse a comma or semicolon separated keyword list, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = Self::NONE;

        for token in s.split(&[',', ';'][..]).map(str::trim).filter(|t| !t.is_empty()) {
            if token.eq_ignore_ascii_case("all") {
                flags |= Self::ALL;
            } else if token.eq_ignore_ascii_case("none") {
                continue;
            } else {
                let (_, flag) = FLAG_NAMES
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(token))
                    .ok_or_else(|| IncludeFlagsParseError(token.to_string()))?;
                flags |= *flag;
            }
        }

        Ok(flags)
    }
}

impl fmt::Display for IncludeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::ALL {
            return f.write_str("All");
        }
        if self.is_empty() {
            return f.write_str("None");
        }

        let names: Vec<&str> = FLAG_NAMES
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect();
        f.write_str(&names.join(", "))
    }
}

impl Serialize for IncludeFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for IncludeFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
