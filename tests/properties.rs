//! Property tests for include-flag flattening on random, possibly cyclic graphs.

use proptest::prelude::*;

use restore_projection::{
    FlagPropagator, Framework, GraphNode, IncludeFlags, LibraryDependency, LibraryKey, ResolvedGraph,
};

/// `(parent, child, include, suppress, excluded_assets_flow)`
type EdgeSpec = (usize, usize, u16, u16, bool);

fn name(idx: usize) -> String {
    format!("P{idx}")
}

fn edge(child: usize, include: u16, suppress: u16, flow: bool) -> LibraryDependency {
    let dep = LibraryDependency::new(name(child))
        .with_include(IncludeFlags::from_bits_truncate(include))
        .with_suppress(IncludeFlags::from_bits_truncate(suppress));
    if flow {
        dep.with_excluded_assets_flow()
    } else {
        dep
    }
}

fn build_graph(n: usize, edges: &[EdgeSpec], roots: &[(usize, u16)]) -> ResolvedGraph {
    let root = roots.iter().fold(GraphNode::new(LibraryKey::project("app", "1.0.0")), |node, (child, include)| {
        node.with_dependency(edge(*child, *include, 0, false))
    });

    let mut graph = ResolvedGraph::new(Framework::parse("net6.0").unwrap(), root);
    for idx in 0..n {
        let node = edges
            .iter()
            .filter(|(parent, ..)| *parent == idx)
            .fold(GraphNode::new(LibraryKey::package(name(idx), "1.0.0")), |node, (_, child, inc, sup, flow)| {
                node.with_dependency(edge(*child, *inc, *sup, *flow))
            });
        graph = graph.with_node(node);
    }
    graph
}

fn graph_strategy() -> impl Strategy<Value = ResolvedGraph> {
    (1usize..8)
        .prop_flat_map(|n| {
            let edges = prop::collection::vec((0..n, 0..n, any::<u16>(), any::<u16>(), any::<bool>()), 0..n * 3);
            let roots = prop::collection::vec((0..n, any::<u16>()), 1..4);
            (Just(n), edges, roots)
        })
        .prop_map(|(n, edges, roots)| build_graph(n, &edges, &roots))
}

/// Flags each incoming edge could offer, given the final recorded flags of its parent.
fn offered(graph: &ResolvedGraph, flags: &restore_projection::IncludeFlagMap, target: &str) -> IncludeFlags {
    let mut union = IncludeFlags::NONE;

    for dep in graph.roots.iter().flat_map(|r| r.dependencies.iter()) {
        if dep.name.eq_ignore_ascii_case(target) {
            union |= dep.include_type & IncludeFlags::ALL;
        }
    }

    for node in &graph.nodes {
        let Some(parent) = flags.get(node.name()) else {
            continue;
        };
        for dep in node.dependencies.iter().filter(|d| d.name.eq_ignore_ascii_case(target)) {
            let allowed = if dep.excluded_assets_flow {
                !dep.suppress_parent
            } else {
                dep.include_type & !dep.suppress_parent
            };
            union |= parent & allowed;
        }
    }

    union
}

proptest! {
    #[test]
    fn flattening_is_idempotent(graph in graph_strategy()) {
        let first = FlagPropagator::flatten(&graph, &[]);
        let second = FlagPropagator::flatten(&graph, &[]);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn recorded_flags_come_from_incoming_edges(graph in graph_strategy()) {
        let flags = FlagPropagator::flatten(&graph, &[]);

        for (name, recorded) in flags.iter() {
            prop_assert!(IncludeFlags::ALL.contains(recorded));
            prop_assert!(offered(&graph, &flags, name).contains(recorded));
        }
    }

    #[test]
    fn declared_dependencies_override(graph in graph_strategy(), include in any::<u16>()) {
        let declared = LibraryDependency::new("P0").with_include(IncludeFlags::from_bits_truncate(include));
        let flags = FlagPropagator::flatten(&graph, &[&declared]);
        prop_assert_eq!(flags.get("p0"), Some(IncludeFlags::from_bits_truncate(include)));
    }
}

#[test]
fn cycle_flags_bounded_by_entry_edge() {
    let graph = build_graph(
        2,
        &[(0, 1, IncludeFlags::ALL.bits(), 0, false), (1, 0, IncludeFlags::ALL.bits(), 0, false)],
        &[(0, (IncludeFlags::RUNTIME | IncludeFlags::COMPILE).bits())],
    );

    let flags = FlagPropagator::flatten(&graph, &[]);
    assert_eq!(flags.get("P0"), Some(IncludeFlags::RUNTIME | IncludeFlags::COMPILE));
    assert_eq!(flags.get("P1"), Some(IncludeFlags::RUNTIME | IncludeFlags::COMPILE));
}
