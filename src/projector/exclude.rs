//! Asset exclusion for include flags that were not granted.
//!
//! An excluded kind is not simply emptied: a non-empty list collapses to a
//! single `_._` item so consumers still see that the package supports the
//! framework but contributes nothing.

use crate::paths::{compare_ignore_case, directory_with_slash, file_name, starts_with_ignore_case};
use crate::types::{
    is_empty_folder, AssetKind, ContentFileItem, IncludeFlags, ManifestAsset, ManifestLibraryEntry,
    RuntimeAssetType, RuntimeTarget, EMPTY_FOLDER,
};

/// Replace a list holding real assets with one sentinel item.
///
/// The sentinel sits in the directory of the shallowest item (by position
/// of the last `/`, ties broken by path ignoring case) and copies that
/// item's properties. Lists that are empty or hold only paths ending in
/// `/_._` are left alone.
pub fn clear_if_exists<T: ManifestAsset>(items: &mut Vec<T>) {
    if !items.iter().any(|item| !is_empty_folder(item.path())) {
        return;
    }

    let Some(first) = items.iter().reduce(|best, item| {
        let best_key = slash_index(best.path());
        let item_key = slash_index(item.path());
        match item_key.cmp(&best_key).then_with(|| compare_ignore_case(item.path(), best.path())) {
            std::cmp::Ordering::Less => item,
            _ => best,
        }
    }) else {
        return;
    };

    let marker = first.empty_marker(format!("{}{}", directory_with_slash(first.path()), EMPTY_FOLDER));
    *items = vec![marker];
}

fn slash_index(path: &str) -> isize {
    path.rfind('/').map_or(-1, |idx| idx as isize)
}

/// Apply the exclusion rule for every flag missing from `flags`.
pub fn exclude_items(entry: &mut ManifestLibraryEntry, flags: IncludeFlags) {
    if !flags.contains(IncludeFlags::RUNTIME) {
        clear_if_exists(entry.items_mut(AssetKind::Runtime));
        entry.framework_assemblies.clear();
        entry.resource.clear();
    }

    if !flags.contains(IncludeFlags::COMPILE) {
        clear_if_exists(entry.items_mut(AssetKind::Compile));
        clear_if_exists(entry.items_mut(AssetKind::Embed));
    }

    if !flags.contains(IncludeFlags::NATIVE) {
        clear_if_exists(entry.items_mut(AssetKind::Native));
    }

    if !flags.contains(IncludeFlags::CONTENT_FILES) && entry.content_files.iter().any(|c| !is_empty_folder(&c.path)) {
        entry.content_files = vec![ContentFileItem::empty()];
    }

    let build = flags.contains(IncludeFlags::BUILD);
    let build_transitive = flags.contains(IncludeFlags::BUILD_TRANSITIVE);
    if !build && !build_transitive {
        clear_if_exists(entry.items_mut(AssetKind::Build));
        clear_if_exists(entry.items_mut(AssetKind::BuildMultiTargeting));
    } else if !build {
        exclude_direct_build(entry);
    }

    exclude_runtime_targets(&mut entry.runtime_targets, flags);
}

/// Drop `build/` assets while keeping `buildTransitive/` ones.
fn exclude_direct_build(entry: &mut ManifestLibraryEntry) {
    let has_transitive = entry.build.iter().any(|item| starts_with_ignore_case(&item.path, "buildTransitive/"));
    if !has_transitive {
        clear_if_exists(entry.items_mut(AssetKind::Build));
        clear_if_exists(entry.items_mut(AssetKind::BuildMultiTargeting));
        return;
    }

    let (kept, removed): (Vec<_>, Vec<_>) = std::mem::take(&mut entry.build)
        .into_iter()
        .partition(|item| !starts_with_ignore_case(&item.path, "build/"));
    entry.build = kept;

    for item in removed {
        let name = file_name(&item.path);
        if let Some(idx) = entry
            .build_multi_targeting
            .iter()
            .position(|m| file_name(&m.path).eq_ignore_ascii_case(name))
        {
            entry.build_multi_targeting.remove(idx);
        }
    }
}

/// Runtime targets follow the runtime and native rules of their section.
fn exclude_runtime_targets(targets: &mut Vec<RuntimeTarget>, flags: IncludeFlags) {
    let runtime = flags.contains(IncludeFlags::RUNTIME);
    let native = flags.contains(IncludeFlags::NATIVE);
    if runtime && native {
        return;
    }

    let mut managed: Vec<RuntimeTarget> = Vec::new();
    let mut resources: Vec<RuntimeTarget> = Vec::new();
    let mut natives: Vec<RuntimeTarget> = Vec::new();
    for target in targets.drain(..) {
        match target.asset_type {
            RuntimeAssetType::Runtime => managed.push(target),
            RuntimeAssetType::Resource => resources.push(target),
            RuntimeAssetType::Native => natives.push(target),
        }
    }

    if !runtime {
        clear_if_exists(&mut managed);
        clear_if_exists(&mut resources);
    }
    if !native {
        clear_if_exists(&mut natives);
    }

    targets.extend(managed);
    targets.extend(resources);
    targets.extend(natives);
}
