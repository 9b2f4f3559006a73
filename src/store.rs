//! Source of truth for permissions and role grants

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use crate::catalog::{Permission, PermissionId};
use crate::error::Result;

/// Persistence collaborator for role editing.
///
/// Saves are full replacements of a role's id set; the last successful
/// save wins.
pub trait RoleStore {
    /// Every permission the deployment exposes
    fn permissions(&self) -> Result<Vec<Permission>>;

    /// Register or rename a permission
    fn put_permission(&self, permission: &Permission) -> Result<()>;

    fn roles(&self) -> Result<Vec<String>>;

    /// Ids granted to a role; empty for an unknown role
    fn role_permissions(&self, role: &str) -> Result<BTreeSet<PermissionId>>;

    fn replace_role_permissions(&self, role: &str, ids: &BTreeSet<PermissionId>) -> Result<()>;
}

#[derive(Debug, Default)]
struct Tables {
    permissions: BTreeMap<PermissionId, String>,
    roles: BTreeMap<String, BTreeSet<PermissionId>>,
}

/// In-process store, mainly for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_permissions<I: IntoIterator<Item = Permission>>(permissions: I) -> Self {
        let store = Self::new();
        store.lock().permissions.extend(permissions.into_iter().map(|p| (p.id, p.key)));
        store
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl RoleStore for MemoryStore {
    fn permissions(&self) -> Result<Vec<Permission>> {
        Ok(self.lock().permissions.iter().map(|(id, key)| Permission::new(id.clone(), key.clone())).collect())
    }

    fn put_permission(&self, permission: &Permission) -> Result<()> {
        self.lock().permissions.insert(permission.id.clone(), permission.key.clone());
        Ok(())
    }

    fn roles(&self) -> Result<Vec<String>> {
        Ok(self.lock().roles.keys().cloned().collect())
    }

    fn role_permissions(&self, role: &str) -> Result<BTreeSet<PermissionId>> {
        Ok(self.lock().roles.get(role).cloned().unwrap_or_default())
    }

    fn replace_role_permissions(&self, role: &str, ids: &BTreeSet<PermissionId>) -> Result<()> {
        self.lock().roles.insert(role.to_string(), ids.clone());
        Ok(())
    }
}

impl<S: RoleStore + ?Sized> RoleStore for &S {
    fn permissions(&self) -> Result<Vec<Permission>> {
        (**self).permissions()
    }

    fn put_permission(&self, permission: &Permission) -> Result<()> {
        (**self).put_permission(permission)
    }

    fn roles(&self) -> Result<Vec<String>> {
        (**self).roles()
    }

    fn role_permissions(&self, role: &str) -> Result<BTreeSet<PermissionId>> {
        (**self).role_permissions(role)
    }

    fn replace_role_permissions(&self, role: &str, ids: &BTreeSet<PermissionId>) -> Result<()> {
        (**self).replace_role_permissions(role, ids)
    }
}
