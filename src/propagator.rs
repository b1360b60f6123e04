//! Include-flag flattening over a resolved graph.
//!
//! ## Algorithm
//!
//! 1. Index package/project nodes by case-insensitive name (projects win)
//! 2. Seed a FIFO queue with each root's direct edges, carrying the edge's
//!    include flags
//! 3. Pop an item; if its flags are already recorded for the name, skip it,
//!    otherwise union them into the record
//! 4. Push each direct, not fully suppressed child with
//!    `flags & include & !suppress` (or `flags & !suppress` when excluded
//!    assets flow)
//! 5. Overwrite the record of every dependency the project declares itself
//!    with that declaration's include flags
//!
//! Each name's record only grows and is bounded by `ALL`, so the walk
//! terminates on cyclic graphs.

use std::collections::{BTreeMap, VecDeque};

use crate::types::{GraphNode, IncludeFlags, LibraryDependency, ProjectSpec, ResolvedGraph};

/// Effective include flags per library, keyed case-insensitively by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IncludeFlagMap {
    flags: BTreeMap<String, IncludeFlags>,
}

impl IncludeFlagMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded flags for `name`.
    pub fn get(&self, name: &str) -> Option<IncludeFlags> {
        self.flags.get(&name.to_ascii_lowercase()).copied()
    }

    /// Recorded flags for `name`, or `ALL` when the name was never reached.
    pub fn get_or_all(&self, name: &str) -> IncludeFlags {
        self.get(name).unwrap_or(IncludeFlags::ALL)
    }

    /// Union `flags` into the record for `name`.
    pub fn merge(&mut self, name: &str, flags: IncludeFlags) {
        *self.flags.entry(name.to_ascii_lowercase()).or_insert(IncludeFlags::NONE) |= flags;
    }

    /// Replace the record for `name`.
    pub fn set(&mut self, name: &str, flags: IncludeFlags) {
        self.flags.insert(name.to_ascii_lowercase(), flags);
    }

    /// Entries by lower-cased name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, IncludeFlags)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of recorded names.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// Flattens per-edge include authorization into one flag set per library.
pub struct FlagPropagator;

impl FlagPropagator {
    /// Flatten `graph`, then apply the project's own declarations.
    pub fn flatten(graph: &ResolvedGraph, declared: &[&LibraryDependency]) -> IncludeFlagMap {
        let lookup = node_lookup(graph);
        let mut result = IncludeFlagMap::new();
        let mut queue: VecDeque<(&GraphNode, IncludeFlags)> = VecDeque::new();

        for root in &graph.roots {
            for edge in root.dependencies.iter().filter(|d| d.is_direct()) {
                match lookup.get(&edge.name.to_ascii_lowercase()) {
                    Some(&node) => queue.push_back((node, edge.include_type & IncludeFlags::ALL)),
                    None => tracing::trace!(dependency = %edge.name, "Dropping root edge without a resolved node"),
                }
            }
        }

        while let Some((node, flags)) = queue.pop_front() {
            let name = node.name();
            if result.get(name).is_some_and(|recorded| recorded.contains(flags)) {
                continue;
            }
            result.merge(name, flags);

            for edge in node.dependencies.iter().filter(|d| d.is_direct()) {
                if edge.suppress_parent == IncludeFlags::ALL {
                    continue;
                }

                let Some(&child) = lookup.get(&edge.name.to_ascii_lowercase()) else {
                    tracing::trace!(parent = %name, dependency = %edge.name, "Dropping edge without a resolved node");
                    continue;
                };

                let allowed = if edge.excluded_assets_flow {
                    !edge.suppress_parent
                } else {
                    edge.include_type & !edge.suppress_parent
                };
                queue.push_back((child, flags & allowed));
            }
        }

        for dependency in declared {
            result.set(&dependency.name, dependency.include_type);
        }

        tracing::debug!(
            framework = %graph.framework.framework,
            rid = graph.rid().unwrap_or(""),
            libraries = result.len(),
            "Flattened include flags"
        );

        result
    }

    /// Flatten `graph` using the dependencies `project` declares for the
    /// graph's framework.
    pub fn flatten_for_project(graph: &ResolvedGraph, project: &ProjectSpec) -> IncludeFlagMap {
        let declared = project.direct_dependencies(&graph.framework.framework);
        Self::flatten(graph, &declared)
    }
}

/// Package and project nodes by lower-cased name; projects shadow packages.
fn node_lookup(graph: &ResolvedGraph) -> BTreeMap<String, &GraphNode> {
    let mut lookup: BTreeMap<String, &GraphNode> = BTreeMap::new();

    for node in &graph.nodes {
        let Some(priority) = node.kind().lookup_priority() else {
            continue;
        };

        let key = node.name().to_ascii_lowercase();
        let replace = match lookup.get(&key) {
            Some(existing) => existing.kind().lookup_priority().map_or(true, |p| priority < p),
            None => true,
        };
        if replace {
            lookup.insert(key, node);
        }
    }

    lookup
}
