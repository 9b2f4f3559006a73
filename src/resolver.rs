//! Catalog key -> deployment id resolution

use std::collections::{BTreeSet, HashMap};

use crate::catalog::{ModuleCatalogEntry, Permission, PermissionId};

/// Lookup table from permission key to the id a deployment stores.
///
/// Catalog keys the deployment does not know are simply absent; callers
/// drop them instead of failing so a catalog may run ahead of the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMap {
    ids: HashMap<String, PermissionId>,
}

impl KeyMap {
    pub fn get(&self, key: &str) -> Option<&PermissionId> {
        self.ids.get(key)
    }

    /// Resolve a key list, dropping unknown keys
    pub fn ids<'a, I>(&self, keys: I) -> BTreeSet<PermissionId>
    where
        I: IntoIterator<Item = &'a String>,
    {
        keys.into_iter().filter_map(|k| self.ids.get(k)).cloned().collect()
    }

    /// Catalog keys of `entry` with no id in this deployment
    pub fn missing<'e>(&self, entry: &'e ModuleCatalogEntry) -> Vec<&'e str> {
        entry.levels.all().filter(|k| !self.ids.contains_key(*k)).collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<(String, PermissionId)> for KeyMap {
    fn from_iter<T: IntoIterator<Item = (String, PermissionId)>>(iter: T) -> Self {
        KeyMap { ids: iter.into_iter().collect() }
    }
}

/// Build the key map for the permissions a deployment exposes.
/// A key listed twice keeps its last id.
pub fn resolve(permissions: &[Permission]) -> KeyMap {
    permissions.iter().map(|p| (p.key.clone(), p.id.clone())).collect()
}
