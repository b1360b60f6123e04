//! Path and version-range text helpers.

use regex_lite::Regex;
use std::cmp::Ordering;
use std::path::{Component, Path};
use std::sync::OnceLock;

fn separator_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\\/]+").expect("static pattern"))
}

fn snapshot_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d)-\*").expect("static pattern"))
}

/// Normalize a package path to single forward slashes without a leading slash.
pub fn normalize_package_path(path: &str) -> String {
    let normalized = separator_regex().replace_all(path, "/");
    normalized.trim_start_matches('/').to_string()
}

/// File name portion of a forward-slash path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Directory portion of a forward-slash path including the trailing slash,
/// or empty for a bare file name.
pub fn directory_with_slash(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..=idx],
        None => "",
    }
}

/// Ordinal comparison ignoring ASCII case (both sides upper-cased).
pub fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_uppercase())
        .cmp(b.bytes().map(|c| c.to_ascii_uppercase()))
}

/// Prefix test ignoring ASCII case.
pub fn starts_with_ignore_case(path: &str, prefix: &str) -> bool {
    path.len() >= prefix.len() && path.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Express `path` relative to `base` with forward slashes.
///
/// Returns `None` when the two paths share no root (different prefixes on
/// Windows, or one relative and the other absolute).
pub fn relative_to(path: &Path, base: &Path) -> Option<String> {
    if path.is_absolute() != base.is_absolute() {
        return None;
    }

    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();

    if let (Some(Component::Prefix(a)), Some(Component::Prefix(b))) = (path_parts.first(), base_parts.first()) {
        if a != b {
            return None;
        }
    }

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = Vec::new();
    for part in &base_parts[common..] {
        match part {
            Component::CurDir => {}
            _ => segments.push("..".to_string()),
        }
    }
    for part in &path_parts[common..] {
        match part {
            Component::CurDir => {}
            other => segments.push(other.as_os_str().to_string_lossy().into_owned()),
        }
    }

    Some(segments.join("/"))
}

/// Drop snapshot suffixes from a version range (`1.0.0-*` becomes `1.0.0`).
pub fn strip_snapshot(range: &str) -> String {
    snapshot_regex().replace_all(range, "$1").into_owned()
}
