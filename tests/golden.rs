//! Golden tests for restore projection.
//!
//! These tests pin the manifest bytes and the build-asset aggregation
//! outcome for small but complete restores.

use std::path::PathBuf;

use restore_projection::types::{FrameworkSpecificGroup, TargetFrameworkInfo};
use restore_projection::{
    build_items_for_package_id, project_package_contents, Framework, FolderRepository, GraphNode, IncludeFlags,
    InMemoryFileCache, InMemoryPackage, InMemoryPackageSource, LibraryDependency, LibraryKey, ManifestBuilder,
    ManifestItem, ManifestLibraryEntry, ManifestTarget, PackageDependency, PackageInput, PackageMetadata,
    ProjectAssetAggregator, ProjectSpec, ProjectionConfig, ProjectionTarget, ResolvedGraph,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn fw(name: &str) -> Framework {
    Framework::parse(name).unwrap()
}

fn app() -> ProjectSpec {
    ProjectSpec::new("app", "/src/app/app.csproj")
        .with_framework(TargetFrameworkInfo::new(fw("net6.0")))
        .with_framework(TargetFrameworkInfo::new(fw("net7.0")))
}

/// app → A → B
fn chain_graph(framework: &str) -> ResolvedGraph {
    let root = GraphNode::new(LibraryKey::project("app", "1.0.0")).with_dependency(LibraryDependency::new("A"));

    ResolvedGraph::new(fw(framework), root)
        .with_node(
            GraphNode::new(LibraryKey::package("A", "1.0.0"))
                .with_dependency(LibraryDependency::new("B").with_range("[1.0.0, )")),
        )
        .with_node(GraphNode::new(LibraryKey::package("B", "1.0.0")))
}

fn chain_source() -> InMemoryPackageSource {
    let a_metadata = PackageMetadata {
        dependency_groups: vec![FrameworkSpecificGroup::new(
            Framework::any(),
            vec![PackageDependency::new("B", "[1.0.0, )")],
        )],
        ..PackageMetadata::default()
    };

    InMemoryPackageSource::new()
        .with_package(InMemoryPackage::new("A", "1.0.0", ["lib/net6.0/A.dll", "build/A.props"]).with_metadata(a_metadata))
        .with_package(InMemoryPackage::new(
            "B",
            "1.0.0",
            ["lib/netstandard2.0/B.dll", "build/B.targets", "contentFiles/any/any/b.txt"],
        ))
}

fn build_target(graph: &ResolvedGraph) -> ManifestTarget {
    let source = chain_source();
    let project = app();
    ManifestBuilder::new(&source, &project).build_target(graph).unwrap()
}

fn single_package_graph(framework: &str) -> ResolvedGraph {
    let root = GraphNode::new(LibraryKey::project("app", "1.0.0")).with_dependency(LibraryDependency::new("P"));
    ResolvedGraph::new(fw(framework), root).with_node(GraphNode::new(LibraryKey::package("P", "1.0.0")))
}

fn paths(items: &[ManifestItem]) -> Vec<&str> {
    ManifestLibraryEntry::paths(items)
}

// ─────────────────────────────────────────────────────────────────────────────
// Manifest Determinism
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_manifest_entry_golden_json() {
    let target = build_target(&chain_graph("net6.0"));

    let a = serde_json::to_string(target.library("A").unwrap()).unwrap();
    assert_eq!(
        a,
        r#"{"name":"A","version":"1.0.0","type":"package","dependencies":[{"id":"B","versionRange":"[1.0.0, )"}],"compile":[{"path":"lib/net6.0/A.dll"}],"runtime":[{"path":"lib/net6.0/A.dll"}],"build":[{"path":"build/A.props"}]}"#
    );

    // B reached transitively: build and content files are suppressed by default.
    let b = serde_json::to_string(target.library("B").unwrap()).unwrap();
    assert_eq!(
        b,
        r#"{"name":"B","version":"1.0.0","type":"package","compile":[{"path":"lib/netstandard2.0/B.dll"}],"runtime":[{"path":"lib/netstandard2.0/B.dll"}],"build":[{"path":"build/_._"}],"contentFiles":[{"path":"contentFiles/any/any/_._","buildAction":"None","codeLanguage":"any","copyToOutput":false}]}"#
    );
}

#[test]
fn test_fingerprint_determinism() {
    let first = build_target(&chain_graph("net6.0")).fingerprint().unwrap();

    for _ in 0..10 {
        assert_eq!(build_target(&chain_graph("net6.0")).fingerprint().unwrap(), first);
    }

    assert_ne!(build_target(&chain_graph("net7.0")).fingerprint().unwrap(), first);
}

#[test]
fn test_node_order_does_not_change_manifest() {
    let mut reversed = chain_graph("net6.0");
    reversed.nodes.reverse();

    let a = build_target(&chain_graph("net6.0"));
    let b = build_target(&reversed);
    assert_eq!(a, b);
    assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
}

#[test]
fn test_manifest_round_trip_keeps_fingerprint() {
    let target = build_target(&chain_graph("net6.0").with_runtime("linux-x64"));
    let json = serde_json::to_string(&target).unwrap();
    let parsed: ManifestTarget = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.key(), "net6.0/linux-x64");
    assert_eq!(parsed.fingerprint().unwrap(), target.fingerprint().unwrap());
}

// ─────────────────────────────────────────────────────────────────────────────
// Projection Rules
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_excluded_runtime_keeps_group_signal() {
    let files = vec!["lib/net6.0/B.dll".to_string(), "lib/net6.0/A.dll".to_string()];
    let entry = project_package_contents(
        &PackageInput::new("A", "1.0.0"),
        &files,
        &PackageMetadata::default(),
        IncludeFlags::ALL - IncludeFlags::RUNTIME,
        &ProjectionTarget::new(fw("net6.0")),
    );

    assert_eq!(paths(&entry.runtime), vec!["lib/net6.0/_._"]);
    assert_eq!(paths(&entry.compile), vec!["lib/net6.0/A.dll", "lib/net6.0/B.dll"]);
}

#[test]
fn test_reference_filter_only_touches_lib() {
    let metadata = PackageMetadata {
        reference_groups: vec![FrameworkSpecificGroup::new(fw("net50"), vec!["A.dll".to_string()])],
        ..PackageMetadata::default()
    };
    let files: Vec<String> = ["lib/net50/A.dll", "lib/net50/B.dll", "runtimes/win/lib/net50/B.dll"]
        .iter()
        .map(|f| f.to_string())
        .collect();

    let agnostic = project_package_contents(
        &PackageInput::new("Pkg", "1.0.0"),
        &files,
        &metadata,
        IncludeFlags::ALL,
        &ProjectionTarget::new(fw("net5.0")),
    );
    assert_eq!(paths(&agnostic.compile), vec!["lib/net50/A.dll"]);
    assert_eq!(paths(&agnostic.runtime), vec!["lib/net50/A.dll"]);

    let win = project_package_contents(
        &PackageInput::new("Pkg", "1.0.0"),
        &files,
        &metadata,
        IncludeFlags::ALL,
        &ProjectionTarget::new(fw("net5.0")).with_runtime("win"),
    );
    assert_eq!(paths(&win.compile), vec!["lib/net50/A.dll"]);
    assert_eq!(paths(&win.runtime), vec!["runtimes/win/lib/net50/B.dll"]);
}

#[test]
fn test_build_asset_disambiguation() {
    let group: Vec<ManifestItem> = ["build/Foo.props", "build/Foo.targets", "build/_._"]
        .iter()
        .map(|p| ManifestItem::new(*p))
        .collect();

    assert_eq!(
        paths(&build_items_for_package_id(&group, "Foo")),
        vec!["build/Foo.props", "build/Foo.targets"]
    );
    assert_eq!(paths(&build_items_for_package_id(&group, "Bar")), vec!["build/_._"]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Build Asset Aggregation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_end_to_end_shared_props() {
    let packages = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(packages.path().join("p").join("1.0.0")).unwrap();
    let repositories = vec![FolderRepository::new(packages.path())];

    let cache = InMemoryFileCache::new();
    cache.insert("P", "1.0.0", vec!["build/P.props".to_string()]);
    let graphs = vec![single_package_graph("net6.0"), single_package_graph("net7.0")];

    let result = ProjectAssetAggregator::new(&repositories, &cache, ProjectionConfig::default())
        .aggregate(&app(), &graphs)
        .unwrap();

    assert!(result.success);
    assert!(result.targets.is_empty());
    assert_eq!(
        result.props,
        vec![packages.path().join("p").join("1.0.0").join("build").join("P.props")]
    );
    assert_eq!(result.repository_root, Some(packages.path().to_path_buf()));
    assert_eq!(result.props_path, PathBuf::from("/src/app/obj/app.csproj.nuget.g.props"));
}

#[test]
fn test_end_to_end_divergent_props() {
    let packages = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(packages.path().join("p").join("1.0.0")).unwrap();
    let repositories = vec![FolderRepository::new(packages.path())];

    let cache = InMemoryFileCache::new();
    cache.insert(
        "P",
        "1.0.0",
        vec!["build/net6.0/P.props".to_string(), "build/net7.0/P.props".to_string()],
    );
    let graphs = vec![single_package_graph("net6.0"), single_package_graph("net7.0")];

    let result = ProjectAssetAggregator::new(&repositories, &cache, ProjectionConfig::default())
        .aggregate(&app(), &graphs)
        .unwrap();

    assert!(!result.success);
    assert!(result.props.is_empty());
    assert!(result.targets.is_empty());
}
