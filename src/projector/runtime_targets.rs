//! RID-specific assets listed in a runtime-agnostic target.

use crate::catalog::AssetCatalog;
use crate::framework::{FrameworkReducer, TargetFramework};
use crate::types::{ContentItemGroup, PatternSet, RuntimeAssetType, RuntimeTarget};

/// Sections written as runtime targets, in output order.
const SECTIONS: [(PatternSet, RuntimeAssetType); 3] = [
    (PatternSet::RuntimeAssemblies, RuntimeAssetType::Runtime),
    (PatternSet::ResourceAssemblies, RuntimeAssetType::Resource),
    (PatternSet::NativeLibraries, RuntimeAssetType::Native),
];

/// Every RID's nearest group for each runtime-target section.
pub fn runtime_targets<C: AssetCatalog + ?Sized>(catalog: &C, framework: &TargetFramework) -> Vec<RuntimeTarget> {
    let mut targets = Vec::new();

    for (pattern, asset_type) in SECTIONS {
        let groups = catalog.find_groups(pattern);
        for group in nearest_per_rid(&groups, framework) {
            let Some(rid) = group.rid() else {
                continue;
            };
            targets.extend(group.items.iter().map(|item| RuntimeTarget {
                path: item.path.clone(),
                asset_type,
                rid: rid.to_string(),
                locale: item.properties.locale.clone(),
            }));
        }
    }

    targets
}

/// Nearest group of each RID, RIDs in first-seen order.
fn nearest_per_rid<'a>(groups: &'a [ContentItemGroup], framework: &TargetFramework) -> Vec<&'a ContentItemGroup> {
    let mut rids: Vec<&str> = Vec::new();
    for rid in groups.iter().filter_map(ContentItemGroup::rid) {
        if !rids.contains(&rid) {
            rids.push(rid);
        }
    }

    rids.into_iter()
        .filter_map(|rid| {
            let candidates: Vec<&ContentItemGroup> = groups.iter().filter(|g| g.rid() == Some(rid)).collect();
            FrameworkReducer::nearest_with_fallback(framework, &candidates, |g| g.framework()).copied()
        })
        .collect()
}
