//! Resolved dependency graph types.
//!
//! A [`ResolvedGraph`] is the resolver's output for one framework/runtime
//! combination: the project root(s) plus the flattened set of resolved
//! libraries, each carrying its outgoing dependency edges.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::flags::IncludeFlags;
use super::library::{DependencyTarget, LibraryKey, LibraryKind};
use crate::framework::{Framework, TargetFramework};

/// How a dependency edge entered the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceType {
    /// Declared by the parent.
    #[default]
    Direct,
    /// Pinned transitively through central package management.
    Transitive,
}

/// A dependency edge from a parent library to a child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryDependency {
    /// Child library name.
    pub name: String,
    /// Requested version range, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_range: Option<String>,
    /// Library kinds this edge may resolve to.
    #[serde(default)]
    pub target: DependencyTarget,
    /// Flags explicitly requested on the edge.
    #[serde(default)]
    pub include_type: IncludeFlags,
    /// Flags the child asks its parent to revoke.
    #[serde(default = "default_suppress_parent")]
    pub suppress_parent: IncludeFlags,
    /// Bypass the include/suppress intersection.
    #[serde(default)]
    pub excluded_assets_flow: bool,
    /// Direct or centrally-managed transitive.
    #[serde(default)]
    pub reference_type: ReferenceType,
}

/// Default suppression: analyzers, build and content files stay private.
fn default_suppress_parent() -> IncludeFlags {
    IncludeFlags::CONTENT_FILES | IncludeFlags::ANALYZERS | IncludeFlags::BUILD
}

impl LibraryDependency {
    /// Create a direct package dependency with default flags.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version_range: None,
            target: DependencyTarget::default(),
            include_type: IncludeFlags::ALL,
            suppress_parent: default_suppress_parent(),
            excluded_assets_flow: false,
            reference_type: ReferenceType::Direct,
        }
    }

    /// Set the version range.
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.version_range = Some(range.into());
        self
    }

    /// Set the requested include flags.
    pub fn with_include(mut self, flags: IncludeFlags) -> Self {
        self.include_type = flags;
        self
    }

    /// Set the suppressed flags.
    pub fn with_suppress(mut self, flags: IncludeFlags) -> Self {
        self.suppress_parent = flags;
        self
    }

    /// Set the target type constraint.
    pub fn with_target(mut self, target: DependencyTarget) -> Self {
        self.target = target;
        self
    }

    /// Mark as a centrally-managed transitive edge.
    pub fn transitive(mut self) -> Self {
        self.reference_type = ReferenceType::Transitive;
        self
    }

    /// Enable excluded-assets flow.
    pub fn with_excluded_assets_flow(mut self) -> Self {
        self.excluded_assets_flow = true;
        self
    }

    /// True unless the edge is a centrally-managed transitive pin.
    pub fn is_direct(&self) -> bool {
        self.reference_type == ReferenceType::Direct
    }

    /// True if the edge may resolve to a package or project.
    pub fn targets_package_or_project(&self) -> bool {
        self.target.intersects(DependencyTarget::PACKAGE_PROJECT_EXTERNAL)
    }
}

/// A file a project reference exposes, in package layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRestoreMetadataFile {
    /// Path as it would appear inside a package (`lib/net6.0/a.dll`), or `LIBANY`.
    pub package_path: String,
    /// Absolute path on disk.
    pub absolute_path: PathBuf,
}

impl ProjectRestoreMetadataFile {
    /// Create a new file entry.
    pub fn new(package_path: impl Into<String>, absolute_path: impl Into<PathBuf>) -> Self {
        Self {
            package_path: package_path.into(),
            absolute_path: absolute_path.into(),
        }
    }
}

/// A framework reference declared by a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkDependency {
    /// Shared framework name.
    pub name: String,
    /// True when all assets of the reference are private.
    #[serde(default)]
    pub private_assets_all: bool,
}

/// Project-specific data the resolver attaches to project nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReferenceInfo {
    /// Path to the referenced project file.
    #[serde(default)]
    pub project_path: Option<PathBuf>,
    /// Nearest framework of the referenced project.
    #[serde(default)]
    pub target_framework: Option<Framework>,
    /// Set when target framework information exists but nothing was compatible.
    #[serde(default)]
    pub incompatible: bool,
    /// Files the project exposes.
    #[serde(default)]
    pub files: Vec<ProjectRestoreMetadataFile>,
    /// Framework assemblies.
    #[serde(default)]
    pub framework_assemblies: Vec<String>,
    /// Framework references.
    #[serde(default)]
    pub framework_references: Vec<FrameworkDependency>,
}

/// A node in the resolved graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Resolved identity.
    pub key: LibraryKey,
    /// Outgoing dependency edges.
    #[serde(default)]
    pub dependencies: Vec<LibraryDependency>,
    /// Project data, for project nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectReferenceInfo>,
}

impl GraphNode {
    /// Create a node without dependencies.
    pub fn new(key: LibraryKey) -> Self {
        Self {
            key,
            dependencies: Vec::new(),
            project: None,
        }
    }

    /// Add an outgoing edge.
    pub fn with_dependency(mut self, dependency: LibraryDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Attach project data.
    pub fn with_project(mut self, project: ProjectReferenceInfo) -> Self {
        self.project = Some(project);
        self
    }

    /// Node name.
    pub fn name(&self) -> &str {
        &self.key.name
    }

    /// Node kind.
    pub fn kind(&self) -> LibraryKind {
        self.key.kind
    }
}

/// Resolver output for one framework/runtime combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedGraph {
    /// Target framework of the graph.
    pub framework: TargetFramework,
    /// Runtime identifier; empty or absent for the runtime-agnostic graph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_identifier: Option<String>,
    /// Root nodes (the restoring project).
    pub roots: Vec<GraphNode>,
    /// Every resolved library reachable from the roots.
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
}

impl ResolvedGraph {
    /// Create a runtime-agnostic graph with a single root.
    pub fn new(framework: impl Into<TargetFramework>, root: GraphNode) -> Self {
        Self {
            framework: framework.into(),
            runtime_identifier: None,
            roots: vec![root],
            nodes: Vec::new(),
        }
    }

    /// Set the runtime identifier.
    pub fn with_runtime(mut self, rid: impl Into<String>) -> Self {
        self.runtime_identifier = Some(rid.into());
        self
    }

    /// Add a resolved node.
    pub fn with_node(mut self, node: GraphNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Runtime identifier, treating empty as absent.
    pub fn rid(&self) -> Option<&str> {
        self.runtime_identifier.as_deref().filter(|r| !r.is_empty())
    }

    /// True for graphs without a runtime identifier.
    pub fn is_runtime_agnostic(&self) -> bool {
        self.rid().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_defaults_from_json() {
        let dep: LibraryDependency = serde_json::from_str(r#"{"name":"A"}"#).unwrap();
        assert_eq!(dep.include_type, IncludeFlags::ALL);
        assert_eq!(dep.suppress_parent, default_suppress_parent());
        assert!(dep.is_direct());
        assert!(dep.targets_package_or_project());
    }

    #[test]
    fn test_empty_rid_is_agnostic() {
        let root = GraphNode::new(LibraryKey::project("app", "1.0.0"));
        let graph = ResolvedGraph::new(Framework::parse("net6.0").unwrap(), root).with_runtime("");
        assert!(graph.is_runtime_agnostic());
        assert!(!graph.clone().with_runtime("linux-x64").is_runtime_agnostic());
    }
}
