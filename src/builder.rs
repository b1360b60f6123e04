//! Manifest target assembly.
//!
//! For each resolved graph: flatten include flags, then project every
//! package and project node into one [`ManifestTarget`]. Graphs are built
//! in parallel; output order matches input order.

use rayon::prelude::*;

use crate::error::Result;
use crate::paths::compare_ignore_case;
use crate::propagator::FlagPropagator;
use crate::projector::{project_package, project_project, PackageInput, ProjectionTarget};
use crate::source::{PackageFileCache, PackageSource};
use crate::types::{GraphNode, LibraryKind, ManifestTarget, ProjectSpec, ResolvedGraph};

/// Builds manifest targets for one project.
pub struct ManifestBuilder<'a, S: ?Sized> {
    source: &'a S,
    project: &'a ProjectSpec,
    file_cache: Option<&'a dyn PackageFileCache>,
}

impl<'a, S> ManifestBuilder<'a, S>
where
    S: PackageSource + ?Sized,
{
    /// Create a builder reading packages from `source`.
    pub fn new(source: &'a S, project: &'a ProjectSpec) -> Self {
        Self {
            source,
            project,
            file_cache: None,
        }
    }

    /// Prefer file lists from `cache` over the package source.
    pub fn with_file_cache(mut self, cache: &'a dyn PackageFileCache) -> Self {
        self.file_cache = Some(cache);
        self
    }

    /// Build one target per graph, in input order.
    pub fn build(&self, graphs: &[ResolvedGraph]) -> Result<Vec<ManifestTarget>> {
        graphs
            .par_iter()
            .map(|graph| self.build_target(graph))
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }

    /// Build the target for a single graph.
    #[tracing::instrument(skip_all, fields(framework = %graph.framework.framework, rid = graph.rid().unwrap_or("")))]
    pub fn build_target(&self, graph: &ResolvedGraph) -> Result<ManifestTarget> {
        let flags = FlagPropagator::flatten_for_project(graph, self.project);
        let target = ProjectionTarget::from_graph(graph);

        let mut nodes: Vec<&GraphNode> = graph
            .nodes
            .iter()
            .filter(|n| n.kind() == LibraryKind::Package || n.kind().is_project())
            .collect();
        nodes.sort_by(|a, b| {
            compare_ignore_case(a.name(), b.name()).then_with(|| a.key.version.cmp(&b.key.version))
        });

        let libraries = nodes
            .into_iter()
            .map(|node| {
                let include = flags.get_or_all(node.name());
                if node.kind().is_project() {
                    return project_project(node, include, &target, self.project);
                }

                let cached = self.file_cache.and_then(|c| c.get(node.name(), &node.key.version));
                let mut input = PackageInput::new(node.name(), &node.key.version);
                if let Some(files) = cached.as_deref() {
                    input = input.with_cached_files(files);
                }
                project_package(self.source, &input, include, &target)
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(libraries = libraries.len(), "Built manifest target");

        Ok(ManifestTarget {
            framework: graph.framework.clone(),
            runtime_identifier: graph.rid().map(str::to_string),
            libraries,
        })
    }
}
