//! LMDB-backed role store

use std::collections::BTreeSet;
use std::path::Path;

use heed::types::{Bytes, Str, U64};
use heed::{Database, Env, EnvOpenOptions};

use crate::catalog::{Permission, PermissionId};
use crate::config::StoreConfig;
use crate::error::{err, Result};
use crate::keys::{get_part, grant_key, role_prefix};
use crate::store::RoleStore;

type Epoch = U64<byteorder::BigEndian>;

/// Role store on an LMDB environment.
///
/// Storage patterns:
/// - `permissions`: id -> key
/// - `grants`: [role][id] -> epoch of the save that wrote it
/// - `roles`: role -> epoch of its last save
pub struct LmdbStore {
    env: Env,
    permissions: Database<Str, Str>,
    grants: Database<Bytes, Epoch>,
    roles: Database<Str, Epoch>,
}

fn current_epoch() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl LmdbStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_config(&StoreConfig { path: path.as_ref().to_path_buf(), ..StoreConfig::default() })
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let path = config.path.as_path();
        std::fs::create_dir_all(path)?;
        // SAFETY: LMDB requires no other process to open this path with different settings.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(config.map_size)
                .max_dbs(3)
                .open(path)
                .map_err(err)?
        };
        let mut tx = env.write_txn().map_err(err)?;
        let permissions = env.create_database(&mut tx, Some("permissions")).map_err(err)?;
        let grants = env.create_database(&mut tx, Some("grants")).map_err(err)?;
        let roles = env.create_database(&mut tx, Some("roles")).map_err(err)?;
        tx.commit().map_err(err)?;
        tracing::info!(path = %path.display(), "role store opened");
        Ok(LmdbStore { env, permissions, grants, roles })
    }

    /// Drop every permission and grant
    pub fn clear(&self) -> Result<()> {
        let mut tx = self.env.write_txn().map_err(err)?;
        self.permissions.clear(&mut tx).map_err(err)?;
        self.grants.clear(&mut tx).map_err(err)?;
        self.roles.clear(&mut tx).map_err(err)?;
        tx.commit().map_err(err)
    }

    /// Epoch (ms) of a role's last save
    pub fn saved_at(&self, role: &str) -> Result<Option<u64>> {
        let tx = self.env.read_txn().map_err(err)?;
        self.roles.get(&tx, role).map_err(err)
    }
}

impl RoleStore for LmdbStore {
    fn permissions(&self) -> Result<Vec<Permission>> {
        let tx = self.env.read_txn().map_err(err)?;
        let mut r = Vec::new();
        for item in self.permissions.iter(&tx).map_err(err)? {
            let (id, key) = item.map_err(err)?;
            r.push(Permission::new(id, key));
        }
        Ok(r)
    }

    fn put_permission(&self, permission: &Permission) -> Result<()> {
        let mut tx = self.env.write_txn().map_err(err)?;
        self.permissions.put(&mut tx, permission.id.as_str(), permission.key.as_str()).map_err(err)?;
        tx.commit().map_err(err)
    }

    fn roles(&self) -> Result<Vec<String>> {
        let tx = self.env.read_txn().map_err(err)?;
        let mut r = Vec::new();
        for item in self.roles.iter(&tx).map_err(err)? {
            let (role, _) = item.map_err(err)?;
            r.push(role.to_string());
        }
        Ok(r)
    }

    fn role_permissions(&self, role: &str) -> Result<BTreeSet<PermissionId>> {
        let prefix = role_prefix(role)?;
        let tx = self.env.read_txn().map_err(err)?;
        let mut r = BTreeSet::new();
        for item in self.grants.prefix_iter(&tx, prefix.as_slice()).map_err(err)? {
            let (k, _) = item.map_err(err)?;
            if let Some(id) = get_part(k, 1) {
                r.insert(PermissionId::from(id));
            }
        }
        Ok(r)
    }

    fn replace_role_permissions(&self, role: &str, ids: &BTreeSet<PermissionId>) -> Result<()> {
        let prefix = role_prefix(role)?;
        let keys = ids.iter().map(|id| grant_key(role, id.as_str())).collect::<Result<Vec<_>>>()?;
        let epoch = current_epoch();

        let mut tx = self.env.write_txn().map_err(err)?;
        let stale = self
            .grants
            .prefix_iter(&tx, prefix.as_slice())
            .map_err(err)?
            .map(|item| item.map(|(k, _)| k.to_vec()))
            .collect::<heed::Result<Vec<_>>>()
            .map_err(err)?;
        for k in &stale {
            self.grants.delete(&mut tx, k.as_slice()).map_err(err)?;
        }
        for k in &keys {
            self.grants.put(&mut tx, k.as_slice(), &epoch).map_err(err)?;
        }
        self.roles.put(&mut tx, role, &epoch).map_err(err)?;
        tx.commit().map_err(err)?;
        tracing::debug!(role, removed = stale.len(), written = keys.len(), "role grants replaced");
        Ok(())
    }
}
