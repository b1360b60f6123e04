//! Package projection.
//!
//! ## Algorithm
//!
//! 1. Framework assemblies (non package-based frameworks only) and
//!    framework references from the nearest nuspec groups
//! 2. Compile (`ref/`, then `lib/`), runtime, embed, resource and native
//!    groups under the ordered criteria
//! 3. Build assets: `buildTransitive/` first, then `build/` items with a new
//!    file name; `buildMultiTargeting/` filtered the same way
//! 4. Content files and, for runtime-agnostic targets, runtime targets
//! 5. `lib/contract/{id}.dll` replaces compile on non-desktop frameworks
//! 6. The nuspec `<references>` filter trims `lib/` compile and runtime items
//! 7. Dependencies, then exclusion for the effective include flags

use crate::catalog::ConventionCatalog;
use crate::error::{ProjectionError, Result};
use crate::paths::file_name;
use crate::source::PackageSource;
use crate::types::{
    IncludeFlags, LibraryDependency, LibraryKind, ManifestItem, ManifestLibraryEntry, PackageDependency,
    PackageMetadata, PatternSet, SelectionCriteria,
};

use super::content_files::content_files;
use super::exclude::exclude_items;
use super::runtime_targets::runtime_targets;
use super::{build_items_for_package_id, select_items, ProjectionTarget, ALL_VERSIONS_RANGE};

/// Resolved package to project.
#[derive(Debug, Clone, Copy)]
pub struct PackageInput<'a> {
    /// Package id.
    pub id: &'a str,
    /// Resolved version.
    pub version: &'a str,
    /// File list already recorded for the package, if any.
    pub cached_files: Option<&'a [String]>,
    /// Dependency list replacing the nuspec dependency groups.
    pub dependencies: Option<&'a [LibraryDependency]>,
}

impl<'a> PackageInput<'a> {
    /// Input reading everything from the package source.
    pub fn new(id: &'a str, version: &'a str) -> Self {
        Self {
            id,
            version,
            cached_files: None,
            dependencies: None,
        }
    }

    /// Use a previously recorded file list.
    pub fn with_cached_files(mut self, files: &'a [String]) -> Self {
        self.cached_files = Some(files);
        self
    }

    /// Override the nuspec dependencies.
    pub fn with_dependencies(mut self, dependencies: &'a [LibraryDependency]) -> Self {
        self.dependencies = Some(dependencies);
        self
    }
}

/// Project a package, reading files and metadata from `source`.
pub fn project_package<S: PackageSource + ?Sized>(
    source: &S,
    input: &PackageInput<'_>,
    flags: IncludeFlags,
    target: &ProjectionTarget,
) -> Result<ManifestLibraryEntry> {
    let loaded;
    let files: &[String] = match input.cached_files {
        Some(files) => files,
        None => {
            loaded = source
                .files(input.id, input.version)
                .map_err(|e| ProjectionError::PackageFilesUnavailable {
                    id: input.id.to_string(),
                    version: input.version.to_string(),
                    reason: e.to_string(),
                })?;
            &loaded
        }
    };

    let metadata = source
        .metadata(input.id, input.version)
        .map_err(|e| ProjectionError::MetadataUnavailable {
            id: input.id.to_string(),
            version: input.version.to_string(),
            reason: e.to_string(),
        })?;

    Ok(project_package_contents(input, files, &metadata, flags, target))
}

/// Project a package from an already loaded file list and nuspec.
pub fn project_package_contents(
    input: &PackageInput<'_>,
    files: &[String],
    metadata: &PackageMetadata,
    flags: IncludeFlags,
    target: &ProjectionTarget,
) -> ManifestLibraryEntry {
    let catalog = ConventionCatalog::new(files);
    let criteria = target.ordered_criteria();
    let framework = &target.framework;
    let mut entry = ManifestLibraryEntry::new(input.id, input.version, LibraryKind::Package);

    if !framework.framework.is_package_based() {
        if let Some(group) = metadata.nearest_framework_assemblies(framework) {
            entry.framework_assemblies = group.items.clone();
        }
    }
    if let Some(group) = metadata.nearest_framework_references(framework) {
        entry.framework_references = group.items.clone();
    }

    entry.compile = select_items(
        &catalog,
        &criteria,
        &[PatternSet::CompileRefAssemblies, PatternSet::CompileLibAssemblies],
    );
    entry.runtime = select_items(&catalog, &criteria, &[PatternSet::RuntimeAssemblies]);
    entry.embed = select_items(&catalog, &criteria, &[PatternSet::EmbedAssemblies]);
    entry.resource = select_items(&catalog, &criteria, &[PatternSet::ResourceAssemblies]);
    entry.native = select_items(&catalog, &criteria, &[PatternSet::NativeLibraries]);

    entry.build = build_assets(&catalog, &criteria, input.id);
    entry.build_multi_targeting = build_items_for_package_id(
        &select_items(&catalog, &criteria, &[PatternSet::MsBuildMultiTargetingFiles]),
        input.id,
    );

    entry.content_files = content_files(&catalog, framework, &metadata.content_files);

    if target.rid().is_none() {
        entry.runtime_targets = runtime_targets(&catalog, framework);
    }

    if !entry.runtime.is_empty() && !framework.framework.is_desktop() {
        let contract = format!("lib/contract/{}.dll", input.id);
        if catalog.paths().iter().any(|p| *p == contract) {
            entry.compile = vec![ManifestItem::new(contract)];
        }
    }

    if !entry.compile.is_empty() || !entry.runtime.is_empty() {
        if let Some(group) = metadata.nearest_references(framework) {
            apply_reference_filter(&mut entry.compile, &group.items);
            apply_reference_filter(&mut entry.runtime, &group.items);
        }
    }

    entry.dependencies = match input.dependencies {
        Some(overrides) => overrides
            .iter()
            .filter(|d| d.targets_package_or_project())
            .map(|d| {
                PackageDependency::new(
                    d.name.clone(),
                    d.version_range.clone().unwrap_or_else(|| ALL_VERSIONS_RANGE.to_string()),
                )
            })
            .collect(),
        None => metadata
            .nearest_dependencies(framework)
            .map(|g| g.items.clone())
            .unwrap_or_default(),
    };

    exclude_items(&mut entry, flags);

    tracing::trace!(
        package = %input.id,
        version = %input.version,
        framework = %framework.framework,
        compile = entry.compile.len(),
        runtime = entry.runtime.len(),
        build = entry.build.len(),
        "Projected package"
    );

    entry
}

/// `buildTransitive/` items, then `build/` items whose file name is new.
fn build_assets(catalog: &ConventionCatalog, criteria: &[SelectionCriteria], id: &str) -> Vec<ManifestItem> {
    let mut build = build_items_for_package_id(
        &select_items(catalog, criteria, &[PatternSet::MsBuildTransitiveFiles]),
        id,
    );
    let direct = build_items_for_package_id(&select_items(catalog, criteria, &[PatternSet::MsBuildFiles]), id);

    for item in direct {
        let name = file_name(&item.path);
        if !build.iter().any(|b| file_name(&b.path).eq_ignore_ascii_case(name)) {
            build.push(item);
        }
    }

    build
}

/// Keep `lib/` items only when their file name is a declared reference.
///
/// The `lib/` prefix is matched case-sensitively; reference names are not.
fn apply_reference_filter(items: &mut Vec<ManifestItem>, references: &[String]) {
    items.retain(|item| {
        !item.path.starts_with("lib/")
            || references.iter().any(|r| r.eq_ignore_ascii_case(file_name(&item.path)))
    });
}
