//! Project-level build asset aggregation.
//!
//! The generated `.nuget.g.props` / `.nuget.g.targets` files import every
//! package's `{id}.props` and `{id}.targets` unconditionally, so they can
//! only be written when every target framework resolves to the same set.
//!
//! ## Algorithm
//!
//! 1. Skip projects that are not msbuild-based unless forced
//! 2. Fail when there are no graphs
//! 3. Per framework (in parallel): flatten flags on the single
//!    runtime-agnostic graph, then collect the build files of every package
//!    that still has `Build`, resolved to its install directory
//! 4. Fail when any two frameworks disagree

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::{AssetCatalog, ConventionCatalog};
use crate::config::ProjectionConfig;
use crate::error::{ProjectionError, Result};
use crate::framework::TargetFramework;
use crate::propagator::FlagPropagator;
use crate::projector::{build_items_for_package_id, to_manifest_items, ProjectionTarget};
use crate::source::{PackageFileCache, PackageRepository};
use crate::types::{
    is_empty_folder, IncludeFlags, LibraryKind, PatternSet, ProjectSpec, ProjectStyle, ResolvedGraph,
};

/// Build-integration files for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildAssetsResult {
    /// False when the project shape is invalid or frameworks disagree.
    pub success: bool,
    /// Output path of the generated targets file.
    pub targets_path: PathBuf,
    /// Output path of the generated props file.
    pub props_path: PathBuf,
    /// Root of the first package repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_root: Option<PathBuf>,
    /// Absolute `.targets` paths to import, sorted.
    #[serde(default)]
    pub targets: Vec<PathBuf>,
    /// Absolute `.props` paths to import, sorted.
    #[serde(default)]
    pub props: Vec<PathBuf>,
}

/// Build files collected for one framework.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct FrameworkBuildAssets {
    targets: Vec<PathBuf>,
    props: Vec<PathBuf>,
}

impl FrameworkBuildAssets {
    fn imports(&self) -> impl Iterator<Item = &PathBuf> {
        self.targets.iter().chain(self.props.iter())
    }

    fn push(&mut self, path: PathBuf) {
        let is_targets = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("targets"));
        let list = if is_targets { &mut self.targets } else { &mut self.props };
        if !list.contains(&path) {
            list.push(path);
        }
    }

    fn sort(&mut self) {
        self.targets.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        self.props.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    }
}

/// Collects per-framework build assets for a project.
pub struct ProjectAssetAggregator<'a, R, C: ?Sized> {
    repositories: &'a [R],
    cache: &'a C,
    config: ProjectionConfig,
}

impl<'a, R, C> ProjectAssetAggregator<'a, R, C>
where
    R: PackageRepository,
    C: PackageFileCache + ?Sized,
{
    /// Create an aggregator over `repositories`, probed in order.
    pub fn new(repositories: &'a [R], cache: &'a C, config: ProjectionConfig) -> Self {
        Self {
            repositories,
            cache,
            config,
        }
    }

    /// Aggregate build assets for `project` over its resolved graphs.
    pub fn aggregate(&self, project: &ProjectSpec, graphs: &[ResolvedGraph]) -> Result<BuildAssetsResult> {
        let (targets_path, props_path) = output_paths(project);
        let mut result = BuildAssetsResult {
            success: true,
            targets_path,
            props_path,
            repository_root: self.repositories.first().map(|r| r.root().to_path_buf()),
            targets: Vec::new(),
            props: Vec::new(),
        };

        if !project.msbuild_based && !self.config.force_write_targets {
            tracing::debug!(project = %project.name, "Skipping build assets for non-msbuild project");
            return Ok(result);
        }

        if graphs.is_empty() {
            tracing::warn!(project = %project.name, "No resolved graphs for build assets");
            result.success = false;
            return Ok(result);
        }

        let per_framework = project
            .target_frameworks
            .par_iter()
            .map(|info| self.framework_assets(project, &info.framework, graphs))
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        let Some(first) = per_framework.first() else {
            return Ok(result);
        };

        if let Some((idx, _)) = per_framework
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, assets)| !assets.imports().eq(first.imports()))
        {
            tracing::warn!(
                project = %project.name,
                first = %project.target_frameworks[0].framework.framework,
                other = %project.target_frameworks[idx].framework.framework,
                "Build assets differ across frameworks"
            );
            result.success = false;
            return Ok(result);
        }

        result.targets = first.targets.clone();
        result.props = first.props.clone();

        tracing::debug!(
            project = %project.name,
            targets = result.targets.len(),
            props = result.props.len(),
            "Aggregated build assets"
        );

        Ok(result)
    }

    fn framework_assets(
        &self,
        project: &ProjectSpec,
        framework: &TargetFramework,
        graphs: &[ResolvedGraph],
    ) -> Result<FrameworkBuildAssets> {
        let graph = single_graph(framework, graphs)?;
        let flags = FlagPropagator::flatten_for_project(graph, project);
        let criteria = ProjectionTarget::from_graph(graph).ordered_criteria();
        let mut assets = FrameworkBuildAssets::default();

        for node in graph.nodes.iter().filter(|n| n.kind() == LibraryKind::Package) {
            let (id, version) = (node.name(), node.key.version.as_str());
            if !flags.get_or_all(id).contains(IncludeFlags::BUILD) {
                continue;
            }

            let Some(files) = self.cache.get(id, version) else {
                tracing::trace!(package = %id, version = %version, "No cached file list; skipping build assets");
                continue;
            };

            let catalog = ConventionCatalog::new(files.iter());
            let Some(group) = catalog.match_best_group(&criteria, &[PatternSet::MsBuildFiles]) else {
                continue;
            };

            let items: Vec<_> = build_items_for_package_id(&to_manifest_items(&group), id)
                .into_iter()
                .filter(|item| !is_empty_folder(&item.path))
                .collect();
            if items.is_empty() {
                continue;
            }

            let install = self
                .repositories
                .iter()
                .find_map(|r| r.install_path(id, version))
                .ok_or_else(|| ProjectionError::PackageNotInstalled {
                    id: id.to_string(),
                    version: version.to_string(),
                })?;

            for item in items {
                assets.push(join_package_path(&install, &item.path));
            }
        }

        assets.sort();
        Ok(assets)
    }
}

/// The one runtime-agnostic graph for `framework`.
fn single_graph<'g>(framework: &TargetFramework, graphs: &'g [ResolvedGraph]) -> Result<&'g ResolvedGraph> {
    let mut matches = graphs
        .iter()
        .filter(|g| g.is_runtime_agnostic() && g.framework.framework == framework.framework);

    match (matches.next(), matches.next()) {
        (Some(graph), None) => Ok(graph),
        (None, _) => Err(ProjectionError::MissingTargetGraph(framework.framework.to_string())),
        (Some(_), Some(_)) => Err(ProjectionError::AmbiguousTargetGraph(framework.framework.to_string())),
    }
}

/// Generated file paths: `{project}.nuget.targets`, or
/// `{project file}.nuget.g.targets` for PackageReference projects.
fn output_paths(project: &ProjectSpec) -> (PathBuf, PathBuf) {
    let stem = match project.style {
        ProjectStyle::PackageReference => {
            let file = project
                .project_path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| project.name.clone());
            format!("{file}.nuget.g")
        }
        _ => format!("{}.nuget", project.name),
    };

    (
        project.output_path.join(format!("{stem}.targets")),
        project.output_path.join(format!("{stem}.props")),
    )
}

fn join_package_path(install: &Path, package_path: &str) -> PathBuf {
    package_path
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(install.to_path_buf(), |path, segment| path.join(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::Framework;
    use crate::source::InMemoryFileCache;
    use crate::types::{GraphNode, LibraryDependency, LibraryKey, TargetFrameworkInfo};

    struct FixedRepository {
        root: PathBuf,
        installed: Vec<&'static str>,
    }

    impl PackageRepository for FixedRepository {
        fn root(&self) -> &Path {
            &self.root
        }

        fn install_path(&self, id: &str, version: &str) -> Option<PathBuf> {
            self.installed
                .iter()
                .any(|i| i.eq_ignore_ascii_case(id))
                .then(|| self.root.join(id.to_ascii_lowercase()).join(version))
        }
    }

    fn fw(name: &str) -> Framework {
        Framework::parse(name).unwrap()
    }

    fn repository(installed: Vec<&'static str>) -> Vec<FixedRepository> {
        vec![FixedRepository {
            root: PathBuf::from("/packages"),
            installed,
        }]
    }

    fn project(frameworks: &[&str]) -> ProjectSpec {
        frameworks.iter().fold(
            ProjectSpec::new("app", "/src/app/app.csproj"),
            |p, f| p.with_framework(TargetFrameworkInfo::new(fw(f))),
        )
    }

    fn graph(framework: &str, root_deps: &[LibraryDependency], packages: &[&str]) -> ResolvedGraph {
        let root = root_deps
            .iter()
            .cloned()
            .fold(GraphNode::new(LibraryKey::project("app", "1.0.0")), |n, d| n.with_dependency(d));
        packages.iter().fold(ResolvedGraph::new(fw(framework), root), |g, p| {
            g.with_node(GraphNode::new(LibraryKey::package(*p, "1.0.0")))
        })
    }

    fn cache(entries: &[(&str, &[&str])]) -> InMemoryFileCache {
        let cache = InMemoryFileCache::new();
        for (id, files) in entries {
            cache.insert(id, "1.0.0", files.iter().map(|f| f.to_string()).collect());
        }
        cache
    }

    #[test]
    fn test_shared_assets_across_frameworks() {
        let repos = repository(vec!["P"]);
        let cache = cache(&[("P", &["build/P.props", "build/P.targets", "build/Other.props"])]);
        let deps = [LibraryDependency::new("P")];
        let graphs = vec![graph("net6.0", &deps, &["P"]), graph("net7.0", &deps, &["P"])];

        let aggregator = ProjectAssetAggregator::new(&repos, &cache, ProjectionConfig::default());
        let result = aggregator.aggregate(&project(&["net6.0", "net7.0"]), &graphs).unwrap();

        assert!(result.success);
        assert_eq!(result.props, vec![PathBuf::from("/packages/p/1.0.0/build/P.props")]);
        assert_eq!(result.targets, vec![PathBuf::from("/packages/p/1.0.0/build/P.targets")]);
        assert_eq!(result.targets_path, PathBuf::from("/src/app/obj/app.csproj.nuget.g.targets"));
        assert_eq!(result.repository_root, Some(PathBuf::from("/packages")));
    }

    #[test]
    fn test_divergent_frameworks_fail() {
        let repos = repository(vec!["P", "Q"]);
        let cache = cache(&[("P", &["build/P.props"]), ("Q", &["build/Q.targets"])]);
        let graphs = vec![
            graph("net6.0", &[LibraryDependency::new("P")], &["P"]),
            graph("net7.0", &[LibraryDependency::new("P"), LibraryDependency::new("Q")], &["P", "Q"]),
        ];

        let aggregator = ProjectAssetAggregator::new(&repos, &cache, ProjectionConfig::default());
        let result = aggregator.aggregate(&project(&["net6.0", "net7.0"]), &graphs).unwrap();

        assert!(!result.success);
        assert!(result.props.is_empty());
        assert!(result.targets.is_empty());
    }

    #[test]
    fn test_build_flag_gates_packages() {
        let repos = repository(vec!["P"]);
        let cache = cache(&[("P", &["build/P.props"])]);
        let graphs = vec![graph(
            "net6.0",
            &[LibraryDependency::new("P").with_include(IncludeFlags::ALL - IncludeFlags::BUILD)],
            &["P"],
        )];

        let aggregator = ProjectAssetAggregator::new(&repos, &cache, ProjectionConfig::default());
        let result = aggregator.aggregate(&project(&["net6.0"]), &graphs).unwrap();
        assert!(result.success);
        assert!(result.props.is_empty());
    }

    #[test]
    fn test_uncached_package_skipped_and_sentinel_ignored() {
        let repos = repository(vec![]);
        let cache = cache(&[("S", &["build/_._"])]);
        let deps = [LibraryDependency::new("S"), LibraryDependency::new("Uncached")];
        let graphs = vec![graph("net6.0", &deps, &["S", "Uncached"])];

        let aggregator = ProjectAssetAggregator::new(&repos, &cache, ProjectionConfig::default());
        let result = aggregator.aggregate(&project(&["net6.0"]), &graphs).unwrap();
        assert!(result.success);
        assert!(result.props.is_empty() && result.targets.is_empty());
    }

    #[test]
    fn test_non_msbuild_project() {
        let repos = repository(vec!["P"]);
        let cache = cache(&[("P", &["build/P.props"])]);
        let mut project = project(&["net6.0"]);
        project.msbuild_based = false;
        project.style = ProjectStyle::ProjectJson;
        let graphs = vec![graph("net6.0", &[LibraryDependency::new("P")], &["P"])];

        let skipped = ProjectAssetAggregator::new(&repos, &cache, ProjectionConfig::default())
            .aggregate(&project, &graphs)
            .unwrap();
        assert!(skipped.success);
        assert!(skipped.props.is_empty());
        assert_eq!(skipped.props_path, PathBuf::from("/src/app/obj/app.nuget.props"));

        let forced = ProjectionConfig {
            force_write_targets: true,
            ..ProjectionConfig::default()
        };
        let written = ProjectAssetAggregator::new(&repos, &cache, forced)
            .aggregate(&project, &graphs)
            .unwrap();
        assert_eq!(written.props.len(), 1);
    }

    #[test]
    fn test_no_graphs_fails() {
        let repos = repository(vec![]);
        let cache = InMemoryFileCache::new();
        let result = ProjectAssetAggregator::new(&repos, &cache, ProjectionConfig::default())
            .aggregate(&project(&["net6.0"]), &[])
            .unwrap();
        assert!(!result.success);
    }

    #[test]
    fn test_graph_and_install_errors() {
        let cache = cache(&[("P", &["build/P.props"])]);
        let graphs = vec![graph("net6.0", &[LibraryDependency::new("P")], &["P"])];

        let repos = repository(vec![]);
        let aggregator = ProjectAssetAggregator::new(&repos, &cache, ProjectionConfig::default());
        assert!(matches!(
            aggregator.aggregate(&project(&["net6.0"]), &graphs),
            Err(ProjectionError::PackageNotInstalled { .. })
        ));
        assert!(matches!(
            aggregator.aggregate(&project(&["net7.0"]), &graphs),
            Err(ProjectionError::MissingTargetGraph(_))
        ));

        let duplicated = vec![graphs[0].clone(), graphs[0].clone()];
        assert!(matches!(
            aggregator.aggregate(&project(&["net6.0"]), &duplicated),
            Err(ProjectionError::AmbiguousTargetGraph(_))
        ));
    }

    #[test]
    fn test_rid_graphs_ignored() {
        let repos = repository(vec!["P"]);
        let cache = cache(&[("P", &["build/P.props"])]);
        let graphs = vec![
            graph("net6.0", &[LibraryDependency::new("P")], &["P"]),
            graph("net6.0", &[], &[]).with_runtime("win-x64"),
        ];

        let result = ProjectAssetAggregator::new(&repos, &cache, ProjectionConfig::default())
            .aggregate(&project(&["net6.0"]), &graphs)
            .unwrap();
        assert_eq!(result.props.len(), 1);
    }
}
