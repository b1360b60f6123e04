//! Library projection: one resolved package or project becomes one
//! [`ManifestLibraryEntry`](crate::types::ManifestLibraryEntry).
//!
//! ## Pipeline
//!
//! 1. Load the file list and turn it into a catalog
//! 2. Select one group per asset kind using the ordered criteria
//! 3. Apply legacy rules (`lib/contract`, nuspec `<references>`)
//! 4. Apply the exclusion rule for the effective include flags
//!
//! Every step is a pure function of its inputs, so the same inputs always
//! produce the same entry.

pub mod content_files;
pub mod exclude;
pub mod package;
pub mod project;
pub mod runtime_targets;

pub use exclude::exclude_items;
pub use package::{project_package, project_package_contents, PackageInput};
pub use project::project_project;

use crate::catalog::AssetCatalog;
use crate::framework::TargetFramework;
use crate::paths::{compare_ignore_case, file_name};
use crate::types::{
    ContentItemGroup, LibraryDependency, ManifestItem, PackageDependency, PatternSet, ResolvedGraph,
    SelectionCriteria, FORWARD_SLASH_EMPTY_FOLDER,
};

/// Text of an unbounded version range.
pub const ALL_VERSIONS_RANGE: &str = "(, )";

/// Framework and runtime a library is projected for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionTarget {
    /// Target framework, possibly with fallbacks.
    pub framework: TargetFramework,
    /// Runtime identifier of the graph.
    pub runtime_identifier: Option<String>,
}

impl ProjectionTarget {
    /// Runtime-agnostic target.
    pub fn new(framework: impl Into<TargetFramework>) -> Self {
        Self {
            framework: framework.into(),
            runtime_identifier: None,
        }
    }

    /// Set the runtime identifier.
    pub fn with_runtime(mut self, rid: impl Into<String>) -> Self {
        self.runtime_identifier = Some(rid.into());
        self
    }

    /// Target of a resolved graph.
    pub fn from_graph(graph: &ResolvedGraph) -> Self {
        Self {
            framework: graph.framework.clone(),
            runtime_identifier: graph.rid().map(str::to_string),
        }
    }

    /// Runtime identifier, treating empty as absent.
    pub fn rid(&self) -> Option<&str> {
        self.runtime_identifier.as_deref().filter(|r| !r.is_empty())
    }

    /// Criteria for the primary framework, then one per fallback framework,
    /// all sharing the runtime identifier.
    pub fn ordered_criteria(&self) -> Vec<SelectionCriteria> {
        self.framework
            .candidates()
            .map(|framework| SelectionCriteria::for_framework_and_runtime(framework, self.rid()))
            .collect()
    }
}

/// Manifest items of a group, keeping the locale.
pub(crate) fn to_manifest_items(group: &ContentItemGroup) -> Vec<ManifestItem> {
    group
        .items
        .iter()
        .map(|item| ManifestItem {
            path: item.path.clone(),
            locale: item.properties.locale.clone(),
        })
        .collect()
}

/// Items of the first group matched under `criteria`.
pub(crate) fn select_items<C: AssetCatalog + ?Sized>(
    catalog: &C,
    criteria: &[SelectionCriteria],
    patterns: &[PatternSet],
) -> Vec<ManifestItem> {
    catalog
        .match_best_group(criteria, patterns)
        .map(|group| to_manifest_items(&group))
        .unwrap_or_default()
}

/// Keep `{id}.props` and `{id}.targets` from a build group.
///
/// Items are ordered by path ignoring case and the first match of each name
/// wins. When neither exists, a `_._` item is kept so the package still
/// counts as having build assets.
pub fn build_items_for_package_id(items: &[ManifestItem], package_id: &str) -> Vec<ManifestItem> {
    if items.is_empty() {
        return Vec::new();
    }

    let mut ordered: Vec<&ManifestItem> = items.iter().collect();
    ordered.sort_by(|a, b| compare_ignore_case(&a.path, &b.path));

    let props_name = format!("{package_id}.props");
    let targets_name = format!("{package_id}.targets");
    let named = |name: &str| {
        ordered
            .iter()
            .find(|item| file_name(&item.path).eq_ignore_ascii_case(name))
            .map(|item| (*item).clone())
    };

    let selected: Vec<ManifestItem> = [named(&props_name), named(&targets_name)].into_iter().flatten().collect();
    if !selected.is_empty() {
        return selected;
    }

    ordered
        .iter()
        .find(|item| item.path.ends_with(FORWARD_SLASH_EMPTY_FOLDER))
        .map(|item| vec![(*item).clone()])
        .unwrap_or_default()
}

/// Manifest dependency for a graph edge, as written for project references.
///
/// An external-project edge without a range is pinned to `1.0.0`; other
/// ranges lose their snapshot suffix.
pub(crate) fn project_dependency(edge: &LibraryDependency) -> PackageDependency {
    use crate::types::DependencyTarget;

    let range = edge
        .version_range
        .as_deref()
        .filter(|r| !r.trim().is_empty() && *r != ALL_VERSIONS_RANGE && *r != "*");

    let range = match range {
        None if edge.target.contains(DependencyTarget::EXTERNAL_PROJECT) => "1.0.0".to_string(),
        None => ALL_VERSIONS_RANGE.to_string(),
        Some(r) => crate::paths::strip_snapshot(r),
    };

    PackageDependency::new(edge.name.clone(), range)
}
