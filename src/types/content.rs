//! Content model types: pattern sets, property bags, item groups and
//! selection criteria.

use serde::{Deserialize, Serialize};

use crate::framework::{Framework, ANY_FRAMEWORK};

/// A family of package path conventions that identifies one asset kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PatternSet {
    /// `runtimes/{rid}/lib/{tfm}/*`, `lib/{tfm}/*`, `lib/*`.
    RuntimeAssemblies,
    /// `ref/{tfm}/*`.
    CompileRefAssemblies,
    /// `lib/{tfm}/*`, `lib/*`.
    CompileLibAssemblies,
    /// `runtimes/{rid}/nativeassets/{tfm}/*`, `runtimes/{rid}/native/*`.
    NativeLibraries,
    /// `lib/{tfm}/{locale}/*.resources.dll` and the `runtimes/` variant.
    ResourceAssemblies,
    /// `build/{tfm}/*`, `build/*`.
    MsBuildFiles,
    /// `buildMultiTargeting/*`, `buildCrossTargeting/*`.
    MsBuildMultiTargetingFiles,
    /// `buildTransitive/{tfm}/*`, `buildTransitive/*`.
    MsBuildTransitiveFiles,
    /// `contentFiles/{codeLanguage}/{tfm}/*`.
    ContentFiles,
    /// `embed/{tfm}/*`.
    EmbedAssemblies,
}

/// Closed property bag carried by groups and items.
///
/// Only the keys the conventions produce are representable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProperties {
    /// Target framework moniker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tfm: Option<Framework>,
    /// Runtime identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rid: Option<String>,
    /// Culture of a satellite assembly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Content file code language (`cs`, `vb`, `any`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_language: Option<String>,
}

/// A single path matched by a pattern set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentItem {
    /// Package-relative path with forward slashes.
    pub path: String,
    /// Item properties.
    pub properties: AssetProperties,
}

/// Items sharing the same group-level properties (framework, RID, language).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItemGroup {
    /// Group-level properties.
    pub properties: AssetProperties,
    /// Items in path order.
    pub items: Vec<ContentItem>,
}

impl ContentItemGroup {
    /// Framework of the group; groups without one are treated as `any`.
    pub fn framework(&self) -> &Framework {
        self.properties.tfm.as_ref().unwrap_or(&ANY_FRAMEWORK)
    }

    /// Runtime identifier of the group.
    pub fn rid(&self) -> Option<&str> {
        self.properties.rid.as_deref()
    }

    /// Code language of the group.
    pub fn code_language(&self) -> Option<&str> {
        self.properties.code_language.as_deref()
    }
}

/// One `(framework, rid)` combination to try.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CriteriaEntry {
    /// Framework to match groups against.
    pub framework: Framework,
    /// Required RID; `None` only matches runtime-agnostic groups.
    pub runtime_identifier: Option<String>,
}

/// Ordered entries, tried until one yields a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectionCriteria {
    /// Entries in priority order.
    pub entries: Vec<CriteriaEntry>,
}

impl SelectionCriteria {
    /// Runtime-specific matches first (when a RID is given), then runtime-agnostic.
    pub fn for_framework_and_runtime(framework: &Framework, runtime_identifier: Option<&str>) -> Self {
        let mut entries = Vec::with_capacity(2);

        if let Some(rid) = runtime_identifier.filter(|r| !r.is_empty()) {
            entries.push(CriteriaEntry {
                framework: framework.clone(),
                runtime_identifier: Some(rid.to_string()),
            });
        }

        entries.push(CriteriaEntry {
            framework: framework.clone(),
            runtime_identifier: None,
        });

        Self { entries }
    }

    /// Runtime-agnostic criteria for `framework`.
    pub fn for_framework(framework: &Framework) -> Self {
        Self::for_framework_and_runtime(framework, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rid_criteria_try_specific_first() {
        let fw = Framework::parse("net6.0").unwrap();
        let criteria = SelectionCriteria::for_framework_and_runtime(&fw, Some("win-x64"));
        assert_eq!(criteria.entries.len(), 2);
        assert_eq!(criteria.entries[0].runtime_identifier.as_deref(), Some("win-x64"));
        assert_eq!(criteria.entries[1].runtime_identifier, None);

        assert_eq!(SelectionCriteria::for_framework_and_runtime(&fw, Some("")).entries.len(), 1);
    }

    #[test]
    fn test_group_without_tfm_is_any() {
        let group = ContentItemGroup {
            properties: AssetProperties::default(),
            items: Vec::new(),
        };
        assert_eq!(group.framework(), &Framework::any());
    }
}
