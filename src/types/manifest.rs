//! Manifest output types.
//!
//! A [`ManifestTarget`] holds one [`ManifestLibraryEntry`] per resolved
//! library for a single framework/runtime combination. Entries serialize to
//! camelCase JSON with empty sections omitted, so the same input always
//! yields byte-identical output.

use serde::{Deserialize, Serialize};

use super::library::{LibraryKind, PackageDependency};
use crate::canonical::canonical_hash_hex;
use crate::framework::TargetFramework;

/// Reserved file name meaning "supported, deliberately no assets".
pub const EMPTY_FOLDER: &str = "_._";

/// The sentinel as a path suffix.
pub const FORWARD_SLASH_EMPTY_FOLDER: &str = "/_._";

/// True if `path` ends in the `/_._` sentinel.
pub fn is_empty_folder(path: &str) -> bool {
    path.ends_with(FORWARD_SLASH_EMPTY_FOLDER)
}

/// An item in a manifest asset list.
///
/// Each item kind owns the constructor for its sentinel form, so exclusion
/// never has to guess the concrete type of a list.
pub trait ManifestAsset: Clone {
    /// Package-relative path.
    fn path(&self) -> &str;

    /// Build a sentinel item at `path`, carrying this item's properties.
    fn empty_marker(&self, path: String) -> Self;
}

/// A path in a compile/runtime/resource/native/build/embed list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManifestItem {
    /// Package-relative path.
    pub path: String,
    /// Culture, for resource assemblies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl ManifestItem {
    /// Create an item without properties.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            locale: None,
        }
    }
}

impl ManifestAsset for ManifestItem {
    fn path(&self) -> &str {
        &self.path
    }

    fn empty_marker(&self, path: String) -> Self {
        Self {
            path,
            locale: self.locale.clone(),
        }
    }
}

/// Section a runtime target belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuntimeAssetType {
    /// Runtime assembly.
    Runtime,
    /// Satellite resource assembly.
    Resource,
    /// Native library.
    Native,
}

/// A RID-specific asset listed in a runtime-agnostic graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeTarget {
    /// Package-relative path.
    pub path: String,
    /// Section the asset belongs to.
    pub asset_type: RuntimeAssetType,
    /// Runtime identifier.
    pub rid: String,
    /// Culture, for resource assemblies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl ManifestAsset for RuntimeTarget {
    fn path(&self) -> &str {
        &self.path
    }

    fn empty_marker(&self, path: String) -> Self {
        Self {
            path,
            asset_type: self.asset_type,
            rid: self.rid.clone(),
            locale: self.locale.clone(),
        }
    }
}

/// MSBuild item type a content file is added as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BuildAction {
    /// Not added to the build.
    None,
    /// Compiled.
    #[default]
    Compile,
    /// Content item.
    Content,
    /// Embedded resource.
    EmbeddedResource,
}

impl BuildAction {
    /// Parse a nuspec `buildAction` value, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "compile" => Some(Self::Compile),
            "content" => Some(Self::Content),
            "embeddedresource" => Some(Self::EmbeddedResource),
            _ => None,
        }
    }
}

/// A `contentFiles/` item with its build metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFileItem {
    /// Package-relative path.
    pub path: String,
    /// Build action.
    pub build_action: BuildAction,
    /// Code language folder the item came from.
    pub code_language: String,
    /// Copy to the output directory.
    pub copy_to_output: bool,
    /// Output path, when copied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    /// Preprocessed output path, for `.pp` files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pp_output_path: Option<String>,
}

impl ContentFileItem {
    /// The canonical no-op item that replaces an excluded content-file list.
    pub fn empty() -> Self {
        Self {
            path: format!("contentFiles/any/any/{EMPTY_FOLDER}"),
            build_action: BuildAction::None,
            code_language: "any".to_string(),
            copy_to_output: false,
            output_path: None,
            pp_output_path: None,
        }
    }
}

/// Manifest sections holding plain [`ManifestItem`] lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Compile-time assemblies.
    Compile,
    /// Runtime assemblies.
    Runtime,
    /// Satellite resource assemblies.
    Resource,
    /// Native libraries.
    Native,
    /// Embedded interop assemblies.
    Embed,
    /// Build props and targets.
    Build,
    /// Multi-targeting build props and targets.
    BuildMultiTargeting,
}

/// Projected manifest entry for one library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestLibraryEntry {
    /// Library name.
    pub name: String,
    /// Library version.
    pub version: String,
    /// Package or project.
    #[serde(rename = "type")]
    pub kind: LibraryKind,
    /// Framework of a referenced project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    /// Dependencies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<PackageDependency>,
    /// Framework (GAC) assemblies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub framework_assemblies: Vec<String>,
    /// Shared framework references.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub framework_references: Vec<String>,
    /// Compile-time assemblies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compile: Vec<ManifestItem>,
    /// Runtime assemblies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runtime: Vec<ManifestItem>,
    /// Satellite resource assemblies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource: Vec<ManifestItem>,
    /// Native libraries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub native: Vec<ManifestItem>,
    /// Embedded interop assemblies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embed: Vec<ManifestItem>,
    /// Build props and targets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub build: Vec<ManifestItem>,
    /// Multi-targeting build props and targets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub build_multi_targeting: Vec<ManifestItem>,
    /// Content files.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content_files: Vec<ContentFileItem>,
    /// RID-specific assets, for runtime-agnostic graphs only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runtime_targets: Vec<RuntimeTarget>,
}

impl ManifestLibraryEntry {
    /// Create an empty entry.
    pub fn new(name: impl Into<String>, version: impl Into<String>, kind: LibraryKind) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            kind,
            framework: None,
            dependencies: Vec::new(),
            framework_assemblies: Vec::new(),
            framework_references: Vec::new(),
            compile: Vec::new(),
            runtime: Vec::new(),
            resource: Vec::new(),
            native: Vec::new(),
            embed: Vec::new(),
            build: Vec::new(),
            build_multi_targeting: Vec::new(),
            content_files: Vec::new(),
            runtime_targets: Vec::new(),
        }
    }

    /// Item list for `kind`.
    pub fn items(&self, kind: AssetKind) -> &[ManifestItem] {
        match kind {
            AssetKind::Compile => &self.compile,
            AssetKind::Runtime => &self.runtime,
            AssetKind::Resource => &self.resource,
            AssetKind::Native => &self.native,
            AssetKind::Embed => &self.embed,
            AssetKind::Build => &self.build,
            AssetKind::BuildMultiTargeting => &self.build_multi_targeting,
        }
    }

    /// Mutable item list for `kind`.
    pub fn items_mut(&mut self, kind: AssetKind) -> &mut Vec<ManifestItem> {
        match kind {
            AssetKind::Compile => &mut self.compile,
            AssetKind::Runtime => &mut self.runtime,
            AssetKind::Resource => &mut self.resource,
            AssetKind::Native => &mut self.native,
            AssetKind::Embed => &mut self.embed,
            AssetKind::Build => &mut self.build,
            AssetKind::BuildMultiTargeting => &mut self.build_multi_targeting,
        }
    }

    /// Paths of an item list, for assertions and diagnostics.
    pub fn paths(items: &[ManifestItem]) -> Vec<&str> {
        items.iter().map(|i| i.path.as_str()).collect()
    }
}

/// All library entries for one framework/runtime combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestTarget {
    /// Target framework.
    pub framework: TargetFramework,
    /// Runtime identifier, for RID-specific targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_identifier: Option<String>,
    /// Entries ordered by case-insensitive name, then version.
    pub libraries: Vec<ManifestLibraryEntry>,
}

impl ManifestTarget {
    /// Target key as written in the manifest (`net6.0` or `net6.0/linux-x64`).
    pub fn key(&self) -> String {
        match &self.runtime_identifier {
            Some(rid) => format!("{}/{}", self.framework.framework, rid),
            None => self.framework.framework.to_string(),
        }
    }

    /// Look up an entry by name, case-insensitively.
    pub fn library(&self, name: &str) -> Option<&ManifestLibraryEntry> {
        self.libraries.iter().find(|l| l.name.eq_ignore_ascii_case(name))
    }

    /// Stable fingerprint of the serialized target.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        canonical_hash_hex(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty_folder() {
        assert!(is_empty_folder("lib/net6.0/_._"));
        assert!(!is_empty_folder("_._"));
        assert!(!is_empty_folder("lib/net6.0/a_._"));
        assert!(!is_empty_folder("lib/net6.0/A.dll"));
    }

    #[test]
    fn test_empty_marker_copies_properties() {
        let item = ManifestItem {
            path: "lib/net6.0/de/A.resources.dll".to_string(),
            locale: Some("de".to_string()),
        };
        let marker = item.empty_marker("lib/net6.0/de/_._".to_string());
        assert_eq!(marker.locale.as_deref(), Some("de"));

        let target = RuntimeTarget {
            path: "runtimes/win/native/a.dll".to_string(),
            asset_type: RuntimeAssetType::Native,
            rid: "win".to_string(),
            locale: None,
        };
        let marker = target.empty_marker("runtimes/win/native/_._".to_string());
        assert_eq!(marker.rid, "win");
        assert_eq!(marker.asset_type, RuntimeAssetType::Native);
    }

    #[test]
    fn test_entry_omits_empty_sections() {
        let mut entry = ManifestLibraryEntry::new("A", "1.0.0", LibraryKind::Package);
        entry.runtime.push(ManifestItem::new("lib/net6.0/A.dll"));
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"name":"A","version":"1.0.0","type":"package","runtime":[{"path":"lib/net6.0/A.dll"}]}"#
        );
    }
}
