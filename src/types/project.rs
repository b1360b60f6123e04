//! The restoring project.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::graph::LibraryDependency;
use crate::framework::{Framework, TargetFramework};

/// How the project declares its dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProjectStyle {
    /// `<PackageReference>` items in the project file.
    #[default]
    PackageReference,
    /// A `project.json` file.
    ProjectJson,
    /// A CLI tool restore.
    DotnetCliTool,
    /// A standalone restore without a project file.
    Standalone,
}

/// Per-framework section of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetFrameworkInfo {
    /// The framework (with fallbacks, if any).
    pub framework: TargetFramework,
    /// Dependencies declared only for this framework.
    #[serde(default)]
    pub dependencies: Vec<LibraryDependency>,
}

impl TargetFrameworkInfo {
    /// Create a framework section without dependencies.
    pub fn new(framework: impl Into<TargetFramework>) -> Self {
        Self {
            framework: framework.into(),
            dependencies: Vec::new(),
        }
    }
}

/// The project being restored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSpec {
    /// Project name.
    pub name: String,
    /// Path to the project file.
    pub project_path: PathBuf,
    /// Directory the build-integration files are written to.
    pub output_path: PathBuf,
    /// Dependency declaration style.
    #[serde(default)]
    pub style: ProjectStyle,
    /// True when the project participates in MSBuild integration.
    #[serde(default = "default_msbuild_based")]
    pub msbuild_based: bool,
    /// Dependencies shared by every framework.
    #[serde(default)]
    pub dependencies: Vec<LibraryDependency>,
    /// Target frameworks in declared order.
    pub target_frameworks: Vec<TargetFrameworkInfo>,
}

fn default_msbuild_based() -> bool {
    true
}

impl ProjectSpec {
    /// Create a PackageReference project rooted at `project_path`.
    pub fn new(name: impl Into<String>, project_path: impl Into<PathBuf>) -> Self {
        let project_path = project_path.into();
        let output_path = project_path
            .parent()
            .map(|dir| dir.join("obj"))
            .unwrap_or_else(|| PathBuf::from("obj"));

        Self {
            name: name.into(),
            project_path,
            output_path,
            style: ProjectStyle::PackageReference,
            msbuild_based: true,
            dependencies: Vec::new(),
            target_frameworks: Vec::new(),
        }
    }

    /// Add a target framework section.
    pub fn with_framework(mut self, info: TargetFrameworkInfo) -> Self {
        self.target_frameworks.push(info);
        self
    }

    /// Add a shared dependency.
    pub fn with_dependency(mut self, dependency: LibraryDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Directory containing the project file.
    pub fn directory(&self) -> &Path {
        self.project_path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Dependencies declared directly for `framework`: the shared list followed
    /// by the framework-specific list.
    pub fn direct_dependencies(&self, framework: &Framework) -> Vec<&LibraryDependency> {
        let specific = self
            .target_frameworks
            .iter()
            .filter(|tf| &tf.framework.framework == framework)
            .flat_map(|tf| tf.dependencies.iter());

        self.dependencies.iter().chain(specific).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_dependencies_include_framework_specific() {
        let net6 = Framework::parse("net6.0").unwrap();
        let net7 = Framework::parse("net7.0").unwrap();

        let mut info6 = TargetFrameworkInfo::new(net6.clone());
        info6.dependencies.push(LibraryDependency::new("OnlySix"));

        let project = ProjectSpec::new("app", "/src/app/app.csproj")
            .with_dependency(LibraryDependency::new("Shared"))
            .with_framework(info6)
            .with_framework(TargetFrameworkInfo::new(net7.clone()));

        let six: Vec<_> = project.direct_dependencies(&net6).iter().map(|d| d.name.as_str()).collect();
        let seven: Vec<_> = project.direct_dependencies(&net7).iter().map(|d| d.name.as_str()).collect();

        assert_eq!(six, vec!["Shared", "OnlySix"]);
        assert_eq!(seven, vec!["Shared"]);
        assert_eq!(project.output_path, PathBuf::from("/src/app/obj"));
    }
}
