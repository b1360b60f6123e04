//! Package metadata as read from a nuspec.
//!
//! Only the parts that affect projection are modelled: framework-specific
//! groups (dependencies, references, framework assemblies, framework
//! references) and the `<contentFiles>` entries.

use serde::{Deserialize, Serialize};

use super::library::PackageDependency;
use crate::framework::{Framework, FrameworkReducer, TargetFramework};

/// Items declared for one target framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkSpecificGroup<T> {
    /// Framework the group applies to; groups without one apply to any.
    #[serde(default = "Framework::any")]
    pub target_framework: Framework,
    /// Group items.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> FrameworkSpecificGroup<T> {
    /// Create a group.
    pub fn new(target_framework: Framework, items: Vec<T>) -> Self {
        Self { target_framework, items }
    }
}

/// A `<files>` entry under `<contentFiles>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFilesEntry {
    /// Glob relative to `contentFiles/`.
    pub include: String,
    /// Glob of paths to exclude from `include`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
    /// Build action name (`Compile`, `Content`, `None`, `EmbeddedResource`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_action: Option<String>,
    /// Copy matched files to the output directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_to_output: Option<bool>,
    /// Drop the folder structure when copying.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flatten: Option<bool>,
}

impl ContentFilesEntry {
    /// Create an entry for `include` with default attributes.
    pub fn new(include: impl Into<String>) -> Self {
        Self {
            include: include.into(),
            exclude: None,
            build_action: None,
            copy_to_output: None,
            flatten: None,
        }
    }
}

/// Projection-relevant nuspec contents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetadata {
    /// `<dependencies>` groups.
    #[serde(default)]
    pub dependency_groups: Vec<FrameworkSpecificGroup<PackageDependency>>,
    /// `<references>` groups; items are assembly file names.
    #[serde(default)]
    pub reference_groups: Vec<FrameworkSpecificGroup<String>>,
    /// `<frameworkAssemblies>` groups.
    #[serde(default)]
    pub framework_assembly_groups: Vec<FrameworkSpecificGroup<String>>,
    /// `<frameworkReferences>` groups.
    #[serde(default)]
    pub framework_reference_groups: Vec<FrameworkSpecificGroup<String>>,
    /// `<contentFiles>` entries in declared order.
    #[serde(default)]
    pub content_files: Vec<ContentFilesEntry>,
}

impl PackageMetadata {
    /// Nearest dependency group.
    pub fn nearest_dependencies(&self, target: &TargetFramework) -> Option<&FrameworkSpecificGroup<PackageDependency>> {
        nearest_group(target, &self.dependency_groups)
    }

    /// Nearest `<references>` group.
    pub fn nearest_references(&self, target: &TargetFramework) -> Option<&FrameworkSpecificGroup<String>> {
        nearest_group(target, &self.reference_groups)
    }

    /// Nearest framework assembly group.
    pub fn nearest_framework_assemblies(&self, target: &TargetFramework) -> Option<&FrameworkSpecificGroup<String>> {
        nearest_group(target, &self.framework_assembly_groups)
    }

    /// Nearest framework reference group.
    pub fn nearest_framework_references(&self, target: &TargetFramework) -> Option<&FrameworkSpecificGroup<String>> {
        nearest_group(target, &self.framework_reference_groups)
    }
}

fn nearest_group<'a, T>(target: &TargetFramework, groups: &'a [FrameworkSpecificGroup<T>]) -> Option<&'a FrameworkSpecificGroup<T>> {
    FrameworkReducer::nearest_with_fallback(target, groups, |g| &g.target_framework)
}
