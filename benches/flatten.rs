//! Performance benchmarks for include-flag flattening and package projection.
//!
//! Run with: `cargo bench --bench flatten`
//!
//! ## Performance Targets
//!
//! | Operation | Target | Notes |
//! |-----------|--------|-------|
//! | Flatten 1k nodes | <5ms | Layered graph with back edges |
//! | Project one package | <100µs | ~50 files |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use restore_projection::{
    project_package_contents, FlagPropagator, Framework, GraphNode, IncludeFlags, LibraryDependency, LibraryKey,
    PackageInput, PackageMetadata, ProjectionTarget, ResolvedGraph,
};

/// Layered graph: each node depends on the next three, every tenth node
/// points back to the start to form cycles.
fn make_graph(size: usize) -> ResolvedGraph {
    let root = GraphNode::new(LibraryKey::project("app", "1.0.0"))
        .with_dependency(LibraryDependency::new("P0"))
        .with_dependency(LibraryDependency::new("P1").with_include(IncludeFlags::COMPILE));

    let mut graph = ResolvedGraph::new(Framework::parse("net6.0").unwrap(), root);
    for i in 0..size {
        let mut node = GraphNode::new(LibraryKey::package(format!("P{i}"), "1.0.0"));
        for j in (i + 1)..(i + 4).min(size) {
            node = node.with_dependency(LibraryDependency::new(format!("P{j}")).with_suppress(IncludeFlags::NONE));
        }
        if i % 10 == 9 {
            node = node.with_dependency(LibraryDependency::new("P0"));
        }
        graph = graph.with_node(node);
    }
    graph
}

fn make_files() -> Vec<String> {
    let mut files = Vec::new();
    for tfm in ["net462", "netstandard2.0", "net6.0", "net8.0"] {
        files.push(format!("lib/{tfm}/Pkg.dll"));
        files.push(format!("lib/{tfm}/Pkg.xml"));
        files.push(format!("ref/{tfm}/Pkg.dll"));
        for locale in ["de", "fr", "ja"] {
            files.push(format!("lib/{tfm}/{locale}/Pkg.resources.dll"));
        }
    }
    for rid in ["win-x64", "linux-x64", "osx-arm64"] {
        files.push(format!("runtimes/{rid}/native/pkg.native"));
        files.push(format!("runtimes/{rid}/lib/net6.0/Pkg.dll"));
    }
    files.push("build/Pkg.props".to_string());
    files.push("buildTransitive/Pkg.targets".to_string());
    files
}

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");

    for size in [100, 1_000, 5_000] {
        let graph = make_graph(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &graph, |b, graph| {
            b.iter(|| FlagPropagator::flatten(black_box(graph), &[]))
        });
    }

    group.finish();
}

fn bench_project_package(c: &mut Criterion) {
    let files = make_files();
    let metadata = PackageMetadata::default();
    let agnostic = ProjectionTarget::new(Framework::parse("net7.0").unwrap());
    let rid = ProjectionTarget::new(Framework::parse("net7.0").unwrap()).with_runtime("linux-x64");

    let mut group = c.benchmark_group("project_package");
    for (label, target) in [("agnostic", &agnostic), ("rid", &rid)] {
        group.bench_function(label, |b| {
            b.iter(|| {
                project_package_contents(
                    &PackageInput::new("Pkg", "1.0.0"),
                    black_box(&files),
                    &metadata,
                    IncludeFlags::ALL,
                    target,
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_flatten, bench_project_package);
criterion_main!(benches);
