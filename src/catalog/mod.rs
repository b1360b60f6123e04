//! Asset catalogs: turn a package file list into selectable item groups.
//!
//! The [`AssetCatalog`] trait is the seam between projection and the
//! pattern-matching engine. Implementations only have to enumerate groups
//! per [`PatternSet`]; best-group selection is shared.

pub mod conventions;

pub use conventions::ConventionCatalog;

use crate::framework::FrameworkReducer;
use crate::types::{ContentItemGroup, CriteriaEntry, PatternSet, SelectionCriteria};

/// Source of asset groups for one package or project.
pub trait AssetCatalog {
    /// Every group matched by `pattern`, in first-seen order.
    fn find_groups(&self, pattern: PatternSet) -> Vec<ContentItemGroup>;

    /// Best group for one criteria list.
    ///
    /// Pattern sets are tried in order; within each, criteria entries are
    /// tried in order and the first entry with a compatible group wins.
    fn find_best_group(&self, criteria: &SelectionCriteria, patterns: &[PatternSet]) -> Option<ContentItemGroup> {
        for pattern in patterns {
            let groups = self.find_groups(*pattern);
            if groups.is_empty() {
                continue;
            }

            for entry in &criteria.entries {
                if let Some(group) = best_for_entry(entry, &groups) {
                    return Some(group.clone());
                }
            }
        }

        None
    }

    /// First non-empty best group across an ordered list of criteria.
    ///
    /// Later criteria are never consulted once one yields a group.
    fn match_best_group(&self, criteria: &[SelectionCriteria], patterns: &[PatternSet]) -> Option<ContentItemGroup> {
        criteria
            .iter()
            .find_map(|c| self.find_best_group(c, patterns))
            .filter(|g| !g.items.is_empty())
    }
}

/// Nearest compatible group whose RID equals the entry's RID exactly.
fn best_for_entry<'a>(entry: &CriteriaEntry, groups: &'a [ContentItemGroup]) -> Option<&'a ContentItemGroup> {
    let candidates: Vec<&ContentItemGroup> = groups
        .iter()
        .filter(|g| g.rid() == entry.runtime_identifier.as_deref())
        .collect();

    FrameworkReducer::nearest(&entry.framework, &candidates, |g| g.framework()).copied()
}
