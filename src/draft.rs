//! In-progress permission set for the role being edited
//!
//! Lifecycle:
//! - Unloaded: no role selected
//! - Hydrated: snapshot of the role's persisted ids, no local edits
//! - Dirty: local edits differ from the snapshot
//!
//! A successful save makes the edits the new snapshot. A failed save
//! re-fetches the role and drops local edits; there is no merge.

use std::collections::BTreeSet;

use crate::catalog::PermissionId;
use crate::engine::{level_of, set_level_of, TierPolicy};
use crate::error::{Result, TierError};
use crate::level::Level;
use crate::store::RoleStore;
use crate::tiers::TierSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    Unloaded,
    Hydrated,
    Dirty,
}

/// Ids added and removed relative to the persisted snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changes {
    pub added: BTreeSet<PermissionId>,
    pub removed: BTreeSet<PermissionId>,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RolePermissionDraft {
    role: Option<String>,
    baseline: BTreeSet<PermissionId>,
    enabled: BTreeSet<PermissionId>,
}

impl RolePermissionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DraftState {
        match &self.role {
            None => DraftState::Unloaded,
            Some(_) if self.enabled == self.baseline => DraftState::Hydrated,
            Some(_) => DraftState::Dirty,
        }
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn enabled(&self) -> &BTreeSet<PermissionId> {
        &self.enabled
    }

    pub fn is_enabled(&self, id: &PermissionId) -> bool {
        self.enabled.contains(id)
    }

    /// Load a role's persisted ids, replacing whatever was being edited.
    /// On a fetch error the draft is left untouched.
    pub fn hydrate<S: RoleStore + ?Sized>(&mut self, store: &S, role: &str) -> Result<()> {
        let ids = store.role_permissions(role)?;
        if self.state() == DraftState::Dirty {
            tracing::debug!(previous = self.role.as_deref(), role, "discarding unsaved edits");
        }
        tracing::debug!(role, count = ids.len(), "draft hydrated");
        self.role = Some(role.to_string());
        self.enabled = ids.clone();
        self.baseline = ids;
        Ok(())
    }

    /// Switch to another role; unsaved edits are dropped
    pub fn select_role<S: RoleStore + ?Sized>(&mut self, store: &S, role: &str) -> Result<()> {
        self.hydrate(store, role)
    }

    pub fn toggle(&mut self, id: &PermissionId, enabled: bool) -> Result<()> {
        self.loaded()?;
        if enabled {
            self.enabled.insert(id.clone());
        } else {
            self.enabled.remove(id);
        }
        Ok(())
    }

    pub fn level<T: TierSource + ?Sized>(&self, source: &T, policy: TierPolicy) -> Level {
        level_of(source, &self.enabled, policy)
    }

    /// Move one module to `target`; returns the level the draft now reads as
    pub fn set_level<T: TierSource + ?Sized>(&mut self, source: &T, target: Level, policy: TierPolicy) -> Result<Level> {
        self.loaded()?;
        Ok(set_level_of(source, &mut self.enabled, target, policy))
    }

    pub fn changes(&self) -> Changes {
        Changes {
            added: self.enabled.difference(&self.baseline).cloned().collect(),
            removed: self.baseline.difference(&self.enabled).cloned().collect(),
        }
    }

    /// Drop local edits
    pub fn discard(&mut self) {
        self.enabled = self.baseline.clone();
    }

    /// Back to Unloaded
    pub fn unload(&mut self) {
        *self = Self::default();
    }

    /// Persist the full id set. On failure the draft is re-hydrated from
    /// the store (or unloaded if that fails too) and the save error returned.
    pub fn save<S: RoleStore + ?Sized>(&mut self, store: &S) -> Result<()> {
        let role = self.loaded()?.to_string();
        match store.replace_role_permissions(&role, &self.enabled) {
            Ok(()) => {
                tracing::info!(role, count = self.enabled.len(), "role permissions saved");
                self.baseline = self.enabled.clone();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(role, error = %e, "save failed, reverting draft");
                if let Err(refetch) = self.hydrate(store, &role) {
                    tracing::error!(role, error = %refetch, "revert failed, draft unloaded");
                    self.unload();
                }
                Err(e)
            }
        }
    }

    fn loaded(&self) -> Result<&str> {
        self.role.as_deref().ok_or(TierError::NotLoaded)
    }
}
