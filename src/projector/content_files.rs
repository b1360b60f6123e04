//! `contentFiles/` selection and per-item build metadata.
//!
//! ## Algorithm
//!
//! 1. Partition content groups by code language, first-seen order
//! 2. Keep the nearest framework group of each language
//! 3. Apply every nuspec `<files>` entry whose include glob matches and
//!    whose exclude glob does not, in document order; an attribute set by a
//!    later entry overrides the same attribute from an earlier one. Globs are
//!    relative to `contentFiles/`

use globset::{GlobBuilder, GlobMatcher};

use crate::catalog::AssetCatalog;
use crate::framework::{FrameworkReducer, TargetFramework};
use crate::paths::file_name;
use crate::types::{
    is_empty_folder, BuildAction, ContentFileItem, ContentFilesEntry, ContentItem, ContentItemGroup, PatternSet,
};

const CONTENT_FILES_PREFIX: &str = "contentFiles/";
const PREPROCESSED_SUFFIX: &str = ".pp";

/// A nuspec entry with compiled globs.
struct CompiledEntry<'a> {
    entry: &'a ContentFilesEntry,
    include: GlobMatcher,
    exclude: Option<GlobMatcher>,
}

impl CompiledEntry<'_> {
    fn matches(&self, relative: &str) -> bool {
        self.include.is_match(relative) && !self.exclude.as_ref().is_some_and(|e| e.is_match(relative))
    }
}

fn compile_glob(pattern: &str) -> Result<GlobMatcher, globset::Error> {
    let normalized = pattern.replace('\\', "/");
    Ok(GlobBuilder::new(&normalized)
        .case_insensitive(true)
        .literal_separator(true)
        .build()?
        .compile_matcher())
}

fn compile_entries(entries: &[ContentFilesEntry]) -> Vec<CompiledEntry<'_>> {
    entries
        .iter()
        .filter_map(|entry| {
            let include = match compile_glob(&entry.include) {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!(include = %entry.include, error = %e, "Skipping content files entry with invalid glob");
                    return None;
                }
            };
            let exclude = match entry.exclude.as_deref().map(compile_glob).transpose() {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!(include = %entry.include, error = %e, "Skipping content files entry with invalid exclude glob");
                    return None;
                }
            };
            Some(CompiledEntry { entry, include, exclude })
        })
        .collect()
}

/// Content file items for `framework`, every code language contributing.
pub fn content_files<C: AssetCatalog + ?Sized>(
    catalog: &C,
    framework: &TargetFramework,
    entries: &[ContentFilesEntry],
) -> Vec<ContentFileItem> {
    let groups = catalog.find_groups(PatternSet::ContentFiles);
    if groups.is_empty() {
        return Vec::new();
    }

    let compiled = compile_entries(entries);
    nearest_per_language(&groups, framework)
        .into_iter()
        .flat_map(|group| {
            let language = group.code_language().unwrap_or("any").to_string();
            group
                .items
                .iter()
                .map(|item| content_file_item(item, &language, &compiled))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn nearest_per_language<'a>(groups: &'a [ContentItemGroup], framework: &TargetFramework) -> Vec<&'a ContentItemGroup> {
    let mut languages: Vec<Option<&str>> = Vec::new();
    for group in groups {
        if !languages.contains(&group.code_language()) {
            languages.push(group.code_language());
        }
    }

    languages
        .into_iter()
        .filter_map(|language| {
            let candidates: Vec<&ContentItemGroup> =
                groups.iter().filter(|g| g.code_language() == language).collect();
            FrameworkReducer::nearest_with_fallback(framework, &candidates, |g| g.framework()).copied()
        })
        .collect()
}

fn content_file_item(item: &ContentItem, language: &str, entries: &[CompiledEntry<'_>]) -> ContentFileItem {
    let mut result = ContentFileItem {
        path: item.path.clone(),
        build_action: BuildAction::default(),
        code_language: language.to_string(),
        copy_to_output: false,
        output_path: None,
        pp_output_path: None,
    };

    if is_empty_folder(&item.path) {
        result.build_action = BuildAction::None;
        return result;
    }

    // contentFiles/{codeLanguage}/{tfm}/{rest}
    let under_prefix = item.path.get(CONTENT_FILES_PREFIX.len()..).unwrap_or_default();
    let rest = under_prefix.splitn(3, '/').nth(2).unwrap_or_default();
    let output_relative = rest.strip_suffix(PREPROCESSED_SUFFIX).unwrap_or(rest);

    if rest.len() > output_relative.len() {
        result.pp_output_path = Some(output_relative.to_string());
    }

    let mut copy_to_output = false;
    let mut flatten = false;
    for matched in entries.iter().filter(|e| e.matches(under_prefix)) {
        if let Some(action) = matched.entry.build_action.as_deref() {
            match BuildAction::parse(action) {
                Some(action) => result.build_action = action,
                None => tracing::warn!(path = %item.path, build_action = action, "Ignoring unknown build action"),
            }
        }
        if let Some(copy) = matched.entry.copy_to_output {
            copy_to_output = copy;
        }
        if let Some(flat) = matched.entry.flatten {
            flatten = flat;
        }
    }

    if copy_to_output {
        result.copy_to_output = true;
        result.output_path = Some(if flatten {
            file_name(output_relative).to_string()
        } else {
            output_relative.to_string()
        });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ConventionCatalog;

    fn framework() -> TargetFramework {
        TargetFramework::parse("net6.0").unwrap()
    }

    #[test]
    fn test_every_language_contributes_nearest_group() {
        let catalog = ConventionCatalog::new([
            "contentFiles/any/any/readme.txt",
            "contentFiles/cs/net5.0/a.cs",
            "contentFiles/cs/netstandard2.0/old.cs",
            "contentFiles/vb/net8.0/a.vb",
        ]);

        let items = content_files(&catalog, &framework(), &[]);
        let paths: Vec<&str> = items.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["contentFiles/any/any/readme.txt", "contentFiles/cs/net5.0/a.cs"]);
        assert_eq!(items[1].code_language, "cs");
        assert_eq!(items[1].build_action, BuildAction::Compile);
        assert!(!items[1].copy_to_output);
    }

    #[test]
    fn test_matching_entries_apply_in_order() {
        let catalog = ConventionCatalog::new(["contentFiles/any/any/config/app.json", "contentFiles/any/any/tool.ps1"]);
        let entries = vec![
            ContentFilesEntry {
                exclude: Some("**/*.ps1".to_string()),
                build_action: Some("content".to_string()),
                copy_to_output: Some(true),
                ..ContentFilesEntry::new("any/any/**")
            },
            ContentFilesEntry {
                build_action: Some("None".to_string()),
                copy_to_output: Some(true),
                flatten: Some(true),
                ..ContentFilesEntry::new("any/any/*.PS1")
            },
        ];

        let items = content_files(&catalog, &framework(), &entries);
        assert_eq!(items[0].build_action, BuildAction::Content);
        assert_eq!(items[0].output_path.as_deref(), Some("config/app.json"));
        assert_eq!(items[1].build_action, BuildAction::None);
        assert_eq!(items[1].output_path.as_deref(), Some("tool.ps1"));
    }

    #[test]
    fn test_later_entry_overrides_only_its_attributes() {
        let catalog = ConventionCatalog::new([
            "contentFiles/any/any/a/file.txt",
            "contentFiles/any/any/b/file.txt",
        ]);
        let entries = vec![
            ContentFilesEntry {
                build_action: Some("None".to_string()),
                copy_to_output: Some(true),
                ..ContentFilesEntry::new("**/*")
            },
            ContentFilesEntry {
                copy_to_output: Some(false),
                ..ContentFilesEntry::new("**/a/file.txt")
            },
        ];

        let items = content_files(&catalog, &framework(), &entries);
        assert_eq!(items[0].path, "contentFiles/any/any/a/file.txt");
        assert_eq!(items[0].build_action, BuildAction::None);
        assert!(!items[0].copy_to_output);
        assert_eq!(items[0].output_path, None);

        assert_eq!(items[1].build_action, BuildAction::None);
        assert!(items[1].copy_to_output);
        assert_eq!(items[1].output_path.as_deref(), Some("b/file.txt"));
    }

    #[test]
    fn test_preprocessed_files() {
        let catalog = ConventionCatalog::new(["contentFiles/cs/any/Models/Model.cs.pp"]);
        let entries = vec![ContentFilesEntry {
            copy_to_output: Some(true),
            ..ContentFilesEntry::new("cs/**/*.pp")
        }];

        let items = content_files(&catalog, &framework(), &entries);
        assert_eq!(items[0].pp_output_path.as_deref(), Some("Models/Model.cs"));
        assert_eq!(items[0].output_path.as_deref(), Some("Models/Model.cs"));
    }

    #[test]
    fn test_sentinel_and_invalid_glob() {
        let catalog = ConventionCatalog::new(["contentFiles/any/net6.0/_._"]);
        let entries = vec![ContentFilesEntry::new("any/[")];

        let items = content_files(&catalog, &framework(), &entries);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].build_action, BuildAction::None);
    }
}
