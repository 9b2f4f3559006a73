//! Level inference and mutation over resolved tiers
//!
//! Both directions work on [`TierIds`] only, so a catalog entry and a
//! heuristic module group go through the same code:
//! - inference: enabled ids + tiers -> best-fit [`Level`]
//! - mutation: target level + tiers -> clear the module, then enable
//!   cumulatively (`view ⊆ manage ⊆ admin`)

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{ModuleCatalogEntry, PermissionId};
use crate::level::Level;
use crate::resolver::KeyMap;
use crate::tiers::{CatalogTiers, TierIds, TierSource};

/// Whether a tier with no ids counts as fully granted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierPolicy {
    /// `hasAll(∅)` is true: a module with nothing left to grant reads as
    /// fully granted
    #[default]
    Vacuous,
    /// An empty tier never satisfies an all-granted check
    Strict,
}

impl TierPolicy {
    #[inline]
    fn covers(self, set: &BTreeSet<PermissionId>, enabled: &BTreeSet<PermissionId>) -> bool {
        match self {
            TierPolicy::Vacuous => set.is_subset(enabled),
            TierPolicy::Strict => !set.is_empty() && set.is_subset(enabled),
        }
    }
}

#[inline]
fn has_any(set: &BTreeSet<PermissionId>, enabled: &BTreeSet<PermissionId>) -> bool {
    !set.is_disjoint(enabled)
}

/// Best-fit level for a module's current configuration
pub fn infer_tiers(enabled: &BTreeSet<PermissionId>, tiers: &TierIds, policy: TierPolicy) -> Level {
    let TierIds { view, manage, admin } = tiers;

    if has_any(admin, enabled) {
        return Level::Admin;
    }
    // No admin-tier actions: fully administered once view+manage are all granted
    if admin.is_empty() {
        let view_manage: BTreeSet<PermissionId> = view.union(manage).cloned().collect();
        if policy.covers(&view_manage, enabled) {
            return Level::Admin;
        }
    }

    // No manage-tier actions: managed once every view id is granted
    if has_any(manage, enabled) || (manage.is_empty() && policy.covers(view, enabled)) {
        return Level::Manage;
    }

    if has_any(view, enabled) {
        return Level::View;
    }
    Level::None
}

/// Emit the toggles that move a module to `target`: every module id off,
/// then the target's tiers on.
pub fn apply_tiers<F>(target: Level, tiers: &TierIds, mut toggle: F)
where
    F: FnMut(&PermissionId, bool),
{
    for id in tiers.all() {
        toggle(&id, false);
    }
    for tier in target.tiers() {
        for id in tiers.get(*tier) {
            toggle(id, true);
        }
    }
}

/// Infer the level of any tier source
pub fn level_of<S: TierSource + ?Sized>(source: &S, enabled: &BTreeSet<PermissionId>, policy: TierPolicy) -> Level {
    infer_tiers(enabled, &source.tier_ids(), policy)
}

/// Move `enabled` to `target` for one tier source and return the new level
pub fn set_level_of<S: TierSource + ?Sized>(
    source: &S,
    enabled: &mut BTreeSet<PermissionId>,
    target: Level,
    policy: TierPolicy,
) -> Level {
    let tiers = source.tier_ids();
    let before = infer_tiers(enabled, &tiers, policy);
    apply_tiers(target, &tiers, |id, on| {
        if on {
            enabled.insert(id.clone());
        } else {
            enabled.remove(id);
        }
    });
    let after = infer_tiers(enabled, &tiers, policy);
    tracing::debug!(module = source.module_key(), %before, %target, %after, "level set");
    after
}

/// Level of a catalog module under the default [`TierPolicy::Vacuous`]
pub fn infer_level(enabled: &BTreeSet<PermissionId>, entry: &ModuleCatalogEntry, key_to_id: &KeyMap) -> Level {
    infer_level_with(enabled, entry, key_to_id, TierPolicy::default())
}

pub fn infer_level_with(
    enabled: &BTreeSet<PermissionId>,
    entry: &ModuleCatalogEntry,
    key_to_id: &KeyMap,
    policy: TierPolicy,
) -> Level {
    level_of(&CatalogTiers::new(entry, key_to_id), enabled, policy)
}

/// Drive a catalog module to `target` through the caller's toggle callback
pub fn set_level<F>(target: Level, entry: &ModuleCatalogEntry, key_to_id: &KeyMap, toggle: F)
where
    F: FnMut(&PermissionId, bool),
{
    apply_tiers(target, &CatalogTiers::new(entry, key_to_id).tier_ids(), toggle)
}
