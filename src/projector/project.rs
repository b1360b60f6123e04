//! Project reference projection.
//!
//! Files come from the referenced project's restore metadata instead of a
//! package: each entry maps a package-layout path to a file on disk. The
//! selected paths are written relative to the consuming project.

use std::path::{Path, PathBuf};

use crate::catalog::ConventionCatalog;
use crate::error::{ProjectionError, Result};
use crate::framework::Framework;
use crate::paths::{normalize_package_path, relative_to};
use crate::types::{
    GraphNode, IncludeFlags, ManifestItem, ManifestLibraryEntry, PatternSet, ProjectReferenceInfo, ProjectSpec,
    ProjectStyle,
};

use super::exclude::exclude_items;
use super::{project_dependency, select_items, ProjectionTarget};

/// Package path meaning "any assembly for the consuming framework".
pub const LIB_ANY: &str = "LIBANY";

/// Project a project-reference node for the project `consumer`.
pub fn project_project(
    node: &GraphNode,
    flags: IncludeFlags,
    target: &ProjectionTarget,
    consumer: &ProjectSpec,
) -> Result<ManifestLibraryEntry> {
    let mut entry = ManifestLibraryEntry::new(node.name(), &node.key.version, node.kind());

    entry.dependencies = node
        .dependencies
        .iter()
        .filter(|d| d.targets_package_or_project() && d.suppress_parent != IncludeFlags::ALL)
        .map(project_dependency)
        .collect();

    if let Some(info) = &node.project {
        entry.framework = if info.incompatible {
            Some(Framework::unsupported().dotnet_framework_name())
        } else {
            info.target_framework.as_ref().map(Framework::dotnet_framework_name)
        };

        if consumer.style == ProjectStyle::PackageReference {
            project_files(&mut entry, info, target, consumer.directory())?;
        }

        entry.framework_assemblies = info.framework_assemblies.clone();
        entry.framework_references = info
            .framework_references
            .iter()
            .filter(|r| !r.private_assets_all)
            .map(|r| r.name.clone())
            .collect();
    }

    exclude_items(&mut entry, flags);

    tracing::trace!(
        project = %entry.name,
        framework = entry.framework.as_deref().unwrap_or(""),
        compile = entry.compile.len(),
        runtime = entry.runtime.len(),
        "Projected project reference"
    );

    Ok(entry)
}

fn project_files(
    entry: &mut ManifestLibraryEntry,
    info: &ProjectReferenceInfo,
    target: &ProjectionTarget,
    consumer_dir: &Path,
) -> Result<()> {
    // Without a project path no files are projected.
    let Some(project_path) = &info.project_path else {
        return Ok(());
    };
    let project_dir = project_path.parent().unwrap_or_else(|| Path::new(""));

    let files = package_layout(&entry.name, info, target, project_dir);
    let catalog = ConventionCatalog::new(files.iter().map(|(path, _)| path));
    let criteria = target.ordered_criteria();

    let compile = select_items(
        &catalog,
        &criteria,
        &[PatternSet::CompileRefAssemblies, PatternSet::CompileLibAssemblies],
    );
    let runtime = select_items(&catalog, &criteria, &[PatternSet::RuntimeAssemblies]);

    entry.compile = to_consumer_relative(compile, &files, consumer_dir)?;
    entry.runtime = to_consumer_relative(runtime, &files, consumer_dir)?;
    Ok(())
}

/// Package-layout path to absolute path; the first entry for a path wins.
fn package_layout(
    name: &str,
    info: &ProjectReferenceInfo,
    target: &ProjectionTarget,
    project_dir: &Path,
) -> Vec<(String, PathBuf)> {
    let any_path = format!("lib/{}/any.dll", target.framework.framework.short_folder_name());
    let mut files: Vec<(String, PathBuf)> = Vec::new();

    if info.files.is_empty() {
        let placeholder = project_dir.join("bin").join("placeholder").join(format!("{name}.dll"));
        files.push((any_path.clone(), placeholder));
    }

    for file in &info.files {
        let path = if file.package_path == LIB_ANY {
            any_path.clone()
        } else {
            normalize_package_path(&file.package_path)
        };

        if !files.iter().any(|(existing, _)| existing.eq_ignore_ascii_case(&path)) {
            files.push((path, file.absolute_path.clone()));
        }
    }

    files
}

fn to_consumer_relative(
    items: Vec<ManifestItem>,
    files: &[(String, PathBuf)],
    consumer_dir: &Path,
) -> Result<Vec<ManifestItem>> {
    items
        .into_iter()
        .filter_map(|item| {
            let absolute = files
                .iter()
                .find(|(path, _)| path.eq_ignore_ascii_case(&item.path))
                .map(|(_, absolute)| absolute)?;

            Some(
                relative_to(absolute, consumer_dir)
                    .map(|path| ManifestItem { path, locale: item.locale })
                    .ok_or_else(|| ProjectionError::RelativePath {
                        path: absolute.clone(),
                        base: consumer_dir.to_path_buf(),
                    }),
            )
        })
        .collect()
}
