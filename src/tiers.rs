//! Resolved tier id sets and the sources that produce them

use std::collections::BTreeSet;

use crate::catalog::{ModuleCatalogEntry, PermissionId};
use crate::level::{Level, Tier};
use crate::resolver::KeyMap;

/// A module's tiers as deployment ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierIds {
    pub view: BTreeSet<PermissionId>,
    pub manage: BTreeSet<PermissionId>,
    pub admin: BTreeSet<PermissionId>,
}

impl TierIds {
    pub fn get(&self, tier: Tier) -> &BTreeSet<PermissionId> {
        match tier {
            Tier::View => &self.view,
            Tier::Manage => &self.manage,
            Tier::Admin => &self.admin,
        }
    }

    /// Every id belonging to the module
    pub fn all(&self) -> BTreeSet<PermissionId> {
        self.view.iter().chain(&self.manage).chain(&self.admin).cloned().collect()
    }

    /// Ids a level enables; tiers are cumulative
    pub fn ids_for(&self, level: Level) -> BTreeSet<PermissionId> {
        level.tiers().iter().flat_map(|t| self.get(*t).iter().cloned()).collect()
    }

    pub fn contains(&self, id: &PermissionId) -> bool {
        Tier::ALL.iter().any(|t| self.get(*t).contains(id))
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty() && self.manage.is_empty() && self.admin.is_empty()
    }
}

/// Strategy producing a module's tiers. The inference and mutation core
/// only ever sees the resulting [`TierIds`].
pub trait TierSource {
    fn module_key(&self) -> &str;
    fn label(&self) -> &str;
    fn tier_ids(&self) -> TierIds;
}

/// Tiers declared by a catalog entry, resolved against a deployment
#[derive(Debug, Clone, Copy)]
pub struct CatalogTiers<'a> {
    pub entry: &'a ModuleCatalogEntry,
    pub keys: &'a KeyMap,
}

impl<'a> CatalogTiers<'a> {
    pub fn new(entry: &'a ModuleCatalogEntry, keys: &'a KeyMap) -> Self {
        CatalogTiers { entry, keys }
    }
}

impl TierSource for CatalogTiers<'_> {
    fn module_key(&self) -> &str {
        &self.entry.module_key
    }

    fn label(&self) -> &str {
        &self.entry.label
    }

    fn tier_ids(&self) -> TierIds {
        let levels = &self.entry.levels;
        TierIds {
            view: self.keys.ids(&levels.view),
            manage: self.keys.ids(&levels.manage),
            admin: self.keys.ids(&levels.admin),
        }
    }
}
