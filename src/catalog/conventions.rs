//! Well-known package folder conventions.
//!
//! Each [`PatternSet`] is a list of path templates made of literal segments
//! and typed tokens. Literal segments compare case-insensitively. Templates
//! without a `{tfm}` token carry a default framework: `lib/{assembly}` is
//! desktop .NET with no version, everything else is `any`.
//!
//! | Pattern set                  | Templates                                                             |
//! |------------------------------|-----------------------------------------------------------------------|
//! | `RuntimeAssemblies`          | `runtimes/{rid}/lib/{tfm}/{assembly}`, `lib/{tfm}/{assembly}`, `lib/{assembly}` |
//! | `CompileRefAssemblies`       | `ref/{tfm}/{assembly}`                                                |
//! | `CompileLibAssemblies`       | `lib/{tfm}/{assembly}`, `lib/{assembly}`                              |
//! | `NativeLibraries`            | `runtimes/{rid}/nativeassets/{tfm}/{any}`, `runtimes/{rid}/native/{any}` |
//! | `ResourceAssemblies`         | `runtimes/{rid}/lib/{tfm}/{locale}/{satellite}`, `lib/{tfm}/{locale}/{satellite}` |
//! | `MsBuildFiles`               | `build/{tfm}/{msbuild}`, `build/{msbuild}`                            |
//! | `MsBuildMultiTargetingFiles` | `buildMultiTargeting/{msbuild}`, `buildCrossTargeting/{msbuild}`      |
//! | `MsBuildTransitiveFiles`     | `buildTransitive/{tfm}/{msbuild}`, `buildTransitive/{msbuild}`        |
//! | `ContentFiles`               | `contentFiles/{codeLanguage}/{tfm}/{any}`                             |
//! | `EmbedAssemblies`            | `embed/{tfm}/{assembly}`                                              |

use regex_lite::Regex;
use std::sync::OnceLock;

use super::AssetCatalog;
use crate::framework::{Framework, FrameworkFamily, FrameworkVersion};
use crate::paths::normalize_package_path;
use crate::types::{AssetProperties, ContentItem, ContentItemGroup, PatternSet, EMPTY_FOLDER};

/// One template segment.
#[derive(Debug, Clone, Copy)]
enum Segment {
    Lit(&'static str),
    Tfm,
    Rid,
    Locale,
    CodeLanguage,
    /// `.dll`, `.winmd`, `.exe`, or the sentinel. Final segment.
    Assembly,
    /// `.props`, `.targets`, or the sentinel. Final segment.
    MsBuild,
    /// `.resources.dll`, or the sentinel. Final segment.
    Satellite,
    /// One or more remaining segments.
    AnyRest,
}

#[derive(Debug, Clone, Copy)]
enum DefaultTfm {
    Any,
    Net,
}

struct Template {
    segments: &'static [Segment],
    default_tfm: DefaultTfm,
}

use Segment::*;

const fn template(segments: &'static [Segment]) -> Template {
    Template { segments, default_tfm: DefaultTfm::Any }
}

const RUNTIME_ASSEMBLIES: &[Template] = &[
    template(&[Lit("runtimes"), Rid, Lit("lib"), Tfm, Assembly]),
    template(&[Lit("lib"), Tfm, Assembly]),
    Template { segments: &[Lit("lib"), Assembly], default_tfm: DefaultTfm::Net },
];

const COMPILE_REF_ASSEMBLIES: &[Template] = &[template(&[Lit("ref"), Tfm, Assembly])];

const COMPILE_LIB_ASSEMBLIES: &[Template] = &[
    template(&[Lit("lib"), Tfm, Assembly]),
    Template { segments: &[Lit("lib"), Assembly], default_tfm: DefaultTfm::Net },
];

const NATIVE_LIBRARIES: &[Template] = &[
    template(&[Lit("runtimes"), Rid, Lit("nativeassets"), Tfm, AnyRest]),
    template(&[Lit("runtimes"), Rid, Lit("native"), AnyRest]),
];

const RESOURCE_ASSEMBLIES: &[Template] = &[
    template(&[Lit("runtimes"), Rid, Lit("lib"), Tfm, Locale, Satellite]),
    template(&[Lit("lib"), Tfm, Locale, Satellite]),
];

const MSBUILD_FILES: &[Template] = &[
    template(&[Lit("build"), Tfm, MsBuild]),
    template(&[Lit("build"), MsBuild]),
];

const MSBUILD_MULTI_TARGETING_FILES: &[Template] = &[
    template(&[Lit("buildMultiTargeting"), MsBuild]),
    template(&[Lit("buildCrossTargeting"), MsBuild]),
];

const MSBUILD_TRANSITIVE_FILES: &[Template] = &[
    template(&[Lit("buildTransitive"), Tfm, MsBuild]),
    template(&[Lit("buildTransitive"), MsBuild]),
];

const CONTENT_FILES: &[Template] = &[template(&[Lit("contentFiles"), CodeLanguage, Tfm, AnyRest])];

const EMBED_ASSEMBLIES: &[Template] = &[template(&[Lit("embed"), Tfm, Assembly])];

fn templates(pattern: PatternSet) -> &'static [Template] {
    match pattern {
        PatternSet::RuntimeAssemblies => RUNTIME_ASSEMBLIES,
        PatternSet::CompileRefAssemblies => COMPILE_REF_ASSEMBLIES,
        PatternSet::CompileLibAssemblies => COMPILE_LIB_ASSEMBLIES,
        PatternSet::NativeLibraries => NATIVE_LIBRARIES,
        PatternSet::ResourceAssemblies => RESOURCE_ASSEMBLIES,
        PatternSet::MsBuildFiles => MSBUILD_FILES,
        PatternSet::MsBuildMultiTargetingFiles => MSBUILD_MULTI_TARGETING_FILES,
        PatternSet::MsBuildTransitiveFiles => MSBUILD_TRANSITIVE_FILES,
        PatternSet::ContentFiles => CONTENT_FILES,
        PatternSet::EmbedAssemblies => EMBED_ASSEMBLIES,
    }
}

fn locale_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("static pattern"))
}

fn has_suffix(segment: &str, suffixes: &[&str]) -> bool {
    let lowered = segment.to_ascii_lowercase();
    segment == EMPTY_FOLDER || suffixes.iter().any(|s| lowered.len() > s.len() && lowered.ends_with(s))
}

/// Match `path` against `template`, returning item properties on success.
fn match_template(template: &Template, parts: &[&str]) -> Option<AssetProperties> {
    let mut props = AssetProperties::default();
    let mut idx = 0;

    for (pos, segment) in template.segments.iter().enumerate() {
        let last = pos + 1 == template.segments.len();
        let part = *parts.get(idx)?;

        let ok = match segment {
            AnyRest => return Some(finish(props, template)),
            Lit(lit) => part.eq_ignore_ascii_case(lit),
            Tfm => {
                props.tfm = Some(Framework::parse(part).unwrap_or_else(|_| Framework::unsupported()));
                true
            }
            Rid => {
                props.rid = Some(part.to_string());
                true
            }
            Locale => {
                props.locale = Some(part.to_string());
                locale_regex().is_match(part)
            }
            CodeLanguage => {
                props.code_language = Some(part.to_ascii_lowercase());
                true
            }
            Assembly => last && has_suffix(part, &[".dll", ".winmd", ".exe"]),
            MsBuild => last && has_suffix(part, &[".props", ".targets"]),
            Satellite => last && has_suffix(part, &[".resources.dll"]),
        };

        if !ok {
            return None;
        }
        idx += 1;
    }

    (idx == parts.len()).then(|| finish(props, template))
}

fn finish(mut props: AssetProperties, template: &Template) -> AssetProperties {
    if props.tfm.is_none() {
        props.tfm = Some(match template.default_tfm {
            DefaultTfm::Any => Framework::any(),
            DefaultTfm::Net => Framework::new(FrameworkFamily::NetFramework, FrameworkVersion::default()),
        });
    }
    props
}

/// Group-level view of item properties.
fn group_properties(item: &AssetProperties) -> AssetProperties {
    AssetProperties {
        tfm: item.tfm.clone(),
        rid: item.rid.clone(),
        locale: None,
        code_language: item.code_language.clone(),
    }
}

/// Catalog over a package file list using the well-known folder conventions.
#[derive(Debug, Clone, Default)]
pub struct ConventionCatalog {
    paths: Vec<String>,
}

impl ConventionCatalog {
    /// Build a catalog; paths are normalized, sorted ordinally and de-duplicated.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut paths: Vec<String> = paths
            .into_iter()
            .map(|p| normalize_package_path(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();
        paths.sort();
        paths.dedup();
        Self { paths }
    }

    /// Normalized paths.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Every item matched by `pattern`; the first matching template wins per path.
    pub fn find_items(&self, pattern: PatternSet) -> Vec<ContentItem> {
        let templates = templates(pattern);

        self.paths
            .iter()
            .filter_map(|path| {
                let parts: Vec<&str> = path.split('/').collect();
                templates
                    .iter()
                    .find_map(|t| match_template(t, &parts))
                    .map(|properties| ContentItem {
                        path: path.clone(),
                        properties,
                    })
            })
            .collect()
    }
}

impl AssetCatalog for ConventionCatalog {
    fn find_groups(&self, pattern: PatternSet) -> Vec<ContentItemGroup> {
        let mut groups: Vec<ContentItemGroup> = Vec::new();

        for item in self.find_items(pattern) {
            let key = group_properties(&item.properties);
            match groups.iter_mut().find(|g| g.properties == key) {
                Some(group) => group.items.push(item),
                None => groups.push(ContentItemGroup {
                    properties: key,
                    items: vec![item],
                }),
            }
        }

        groups
    }
}
