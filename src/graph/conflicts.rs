use std::collections::BTreeMap;

use crate::models::VersionConflict;
use crate::parser::LockEntries;

pub const CONFLICT_REASON: &str = "Multiple versions in go.sum";

/// Find modules resolved at more than one version.
///
/// Versions are sorted as plain strings, so `v2.10.0` sorts before `v2.9.0`.
/// The greatest string is the "current" version and every other version is
/// paired against it: `n` versions yield `n - 1` conflicts.
pub fn find_conflicts(entries: &LockEntries) -> Vec<VersionConflict> {
    let mut versions_by_module: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for entry in entries.values() {
        versions_by_module
            .entry(entry.module_path.as_str())
            .or_default()
            .push(entry.version.as_str());
    }

    let mut conflicts = Vec::new();
    for (module_path, mut versions) in versions_by_module {
        if versions.len() < 2 {
            continue;
        }
        versions.sort_unstable();

        let Some((current, older)) = versions.split_last() else {
            continue;
        };
        for conflict_version in older {
            conflicts.push(VersionConflict {
                module_path: module_path.to_string(),
                current_version: current.to_string(),
                conflict_version: conflict_version.to_string(),
                reason: CONFLICT_REASON.to_string(),
            });
        }
    }

    conflicts
}
