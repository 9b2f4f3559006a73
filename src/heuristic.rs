//! Naming-convention tiers for permissions with no catalog entry

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{Permission, PermissionId};
use crate::constants::{MANAGE_VERBS, MODULE_SEPARATOR, VIEW_MARKERS};
use crate::tiers::{TierIds, TierSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    View,
    Manage,
    Unknown,
}

/// Leading dotted segment of a permission key (the whole key if undotted)
pub fn module_of(key: &str) -> &str {
    key.split_once(MODULE_SEPARATOR).map_or(key, |(m, _)| m)
}

/// Key with its module segment stripped
pub fn action_of(key: &str) -> &str {
    key.split_once(MODULE_SEPARATOR).map_or(key, |(_, a)| a)
}

/// Classify a permission key by its action verbs. Matching is a plain
/// case-sensitive substring test.
pub fn classify(key: &str) -> Classification {
    let tail = action_of(key);
    if tail.ends_with("read") || VIEW_MARKERS.iter().any(|m| tail.contains(m)) {
        Classification::View
    } else if MANAGE_VERBS.iter().any(|v| tail.contains(v)) {
        Classification::Manage
    } else {
        Classification::Unknown
    }
}

/// Permissions sharing a module prefix, tiered by [`classify`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicGroup {
    module_key: String,
    permissions: Vec<Permission>,
}

impl HeuristicGroup {
    pub fn new(module_key: impl Into<String>, permissions: Vec<Permission>) -> Self {
        HeuristicGroup { module_key: module_key.into(), permissions }
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    fn ids_where(&self, f: impl Fn(Classification) -> bool) -> BTreeSet<PermissionId> {
        self.permissions.iter().filter(|p| f(classify(&p.key))).map(|p| p.id.clone()).collect()
    }

    /// View-classified ids, or every id when none classify as view
    pub fn view_group(&self) -> BTreeSet<PermissionId> {
        let view = self.ids_where(|c| c == Classification::View);
        if view.is_empty() {
            self.admin_group()
        } else {
            view
        }
    }

    /// View group plus every id not classified as view; unknown actions
    /// count as manage
    pub fn manage_group(&self) -> BTreeSet<PermissionId> {
        let mut ids = self.view_group();
        ids.extend(self.ids_where(|c| c != Classification::View));
        ids
    }

    /// Every id in the module
    pub fn admin_group(&self) -> BTreeSet<PermissionId> {
        self.permissions.iter().map(|p| p.id.clone()).collect()
    }
}

impl TierSource for HeuristicGroup {
    fn module_key(&self) -> &str {
        &self.module_key
    }

    fn label(&self) -> &str {
        &self.module_key
    }

    // Cumulative groups -> disjoint tiers. The manage group already covers
    // every key, so the admin tier is empty and admin reads as view+manage.
    fn tier_ids(&self) -> TierIds {
        let view = self.view_group();
        let manage_group = self.manage_group();
        let manage = manage_group.difference(&view).cloned().collect();
        let admin = self.admin_group().difference(&manage_group).cloned().collect();
        TierIds { view, manage, admin }
    }
}

/// Bucket permissions by module prefix, ordered by module key
pub fn group_by_module<'a, I>(permissions: I) -> Vec<HeuristicGroup>
where
    I: IntoIterator<Item = &'a Permission>,
{
    let mut groups: BTreeMap<&str, Vec<Permission>> = BTreeMap::new();
    for p in permissions {
        groups.entry(p.module()).or_default().push(p.clone());
    }
    groups.into_iter().map(|(m, ps)| HeuristicGroup::new(m, ps)).collect()
}
