//! Role editing session: store + catalog + key map + draft

use serde::Serialize;

use crate::catalog::{Catalog, PermissionId};
use crate::config::EngineConfig;
use crate::draft::RolePermissionDraft;
use crate::engine::TierPolicy;
use crate::error::{Result, TierError};
use crate::heuristic::{group_by_module, HeuristicGroup};
use crate::level::Level;
use crate::resolver::{resolve, KeyMap};
use crate::store::RoleStore;
use crate::tiers::{CatalogTiers, TierIds, TierSource};

/// Where a module's tiers come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelSource {
    Catalog,
    Heuristic,
}

/// One row of the module overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleLevel {
    pub module_key: String,
    pub label: String,
    pub level: Level,
    pub source: LevelSource,
}

/// A module's tier source, borrowed from the session
#[derive(Debug, Clone, Copy)]
pub enum ModuleTiers<'a> {
    Catalog(CatalogTiers<'a>),
    Heuristic(&'a HeuristicGroup),
}

impl ModuleTiers<'_> {
    pub fn source(&self) -> LevelSource {
        match self {
            ModuleTiers::Catalog(_) => LevelSource::Catalog,
            ModuleTiers::Heuristic(_) => LevelSource::Heuristic,
        }
    }
}

impl TierSource for ModuleTiers<'_> {
    fn module_key(&self) -> &str {
        match self {
            ModuleTiers::Catalog(c) => c.module_key(),
            ModuleTiers::Heuristic(h) => h.module_key(),
        }
    }

    fn label(&self) -> &str {
        match self {
            ModuleTiers::Catalog(c) => c.label(),
            ModuleTiers::Heuristic(h) => h.label(),
        }
    }

    fn tier_ids(&self) -> TierIds {
        match self {
            ModuleTiers::Catalog(c) => c.tier_ids(),
            ModuleTiers::Heuristic(h) => h.tier_ids(),
        }
    }
}

fn find_module<'a>(
    catalog: &'a Catalog,
    keys: &'a KeyMap,
    groups: &'a [HeuristicGroup],
    module: &str,
) -> Result<ModuleTiers<'a>> {
    if let Some(entry) = catalog.get(module) {
        return Ok(ModuleTiers::Catalog(CatalogTiers::new(entry, keys)));
    }
    groups
        .iter()
        .find(|g| g.module_key() == module)
        .map(ModuleTiers::Heuristic)
        .ok_or_else(|| TierError::UnknownModule(module.to_string()))
}

pub struct EditSession<S: RoleStore> {
    store: S,
    catalog: Catalog,
    keys: KeyMap,
    groups: Vec<HeuristicGroup>,
    policy: TierPolicy,
    draft: RolePermissionDraft,
}

impl<S: RoleStore> EditSession<S> {
    /// Load the deployment's permissions once and build the key map.
    /// Permissions no catalog entry lists are grouped by module prefix
    /// when `heuristic_fallback` is on; a prefix that names a catalog
    /// module stays with the catalog.
    pub fn open(store: S, catalog: Catalog, config: &EngineConfig) -> Result<Self> {
        let permissions = store.permissions()?;
        let keys = resolve(&permissions);

        for entry in catalog.entries() {
            let missing = keys.missing(entry);
            if !missing.is_empty() {
                tracing::debug!(module = %entry.module_key, ?missing, "catalog keys not deployed");
            }
        }

        let groups = if config.heuristic_fallback {
            group_by_module(permissions.iter().filter(|p| !catalog.contains_key(&p.key)))
                .into_iter()
                .filter(|g| catalog.get(g.module_key()).is_none())
                .collect()
        } else {
            Vec::new()
        };

        tracing::info!(
            permissions = permissions.len(),
            modules = catalog.len(),
            dynamic_modules = groups.len(),
            "edit session opened"
        );
        Ok(EditSession { store, catalog, keys, groups, policy: config.policy, draft: RolePermissionDraft::new() })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn key_map(&self) -> &KeyMap {
        &self.keys
    }

    pub fn heuristic_groups(&self) -> &[HeuristicGroup] {
        &self.groups
    }

    pub fn policy(&self) -> TierPolicy {
        self.policy
    }

    pub fn draft(&self) -> &RolePermissionDraft {
        &self.draft
    }

    pub fn module(&self, module: &str) -> Result<ModuleTiers<'_>> {
        find_module(&self.catalog, &self.keys, &self.groups, module)
    }

    /// Load a role into the draft, dropping unsaved edits
    pub fn select_role(&mut self, role: &str) -> Result<()> {
        self.draft.select_role(&self.store, role)
    }

    pub fn level(&self, module: &str) -> Result<Level> {
        Ok(self.draft.level(&self.module(module)?, self.policy))
    }

    /// Catalog modules in catalog order, then heuristic modules by key
    pub fn module_levels(&self) -> Vec<ModuleLevel> {
        let catalog = self.catalog.entries().iter().map(|e| ModuleTiers::Catalog(CatalogTiers::new(e, &self.keys)));
        let dynamic = self.groups.iter().map(ModuleTiers::Heuristic);
        catalog
            .chain(dynamic)
            .map(|m| ModuleLevel {
                module_key: m.module_key().to_string(),
                label: m.label().to_string(),
                level: self.draft.level(&m, self.policy),
                source: m.source(),
            })
            .collect()
    }

    pub fn set_level(&mut self, module: &str, target: Level) -> Result<Level> {
        let tiers = find_module(&self.catalog, &self.keys, &self.groups, module)?;
        self.draft.set_level(&tiers, target, self.policy)
    }

    /// Bulk edit: every module to the same level
    pub fn set_all_levels(&mut self, target: Level) -> Result<()> {
        let catalog = self.catalog.entries().iter().map(|e| ModuleTiers::Catalog(CatalogTiers::new(e, &self.keys)));
        let dynamic = self.groups.iter().map(ModuleTiers::Heuristic);
        for m in catalog.chain(dynamic) {
            self.draft.set_level(&m, target, self.policy)?;
        }
        Ok(())
    }

    pub fn toggle(&mut self, id: &PermissionId, enabled: bool) -> Result<()> {
        self.draft.toggle(id, enabled)
    }

    pub fn save(&mut self) -> Result<()> {
        self.draft.save(&self.store)
    }

    pub fn discard(&mut self) {
        self.draft.discard()
    }
}
