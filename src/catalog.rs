//! Permission records and the declarative module catalog

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::BUILTIN_CATALOG;
use crate::error::{Result, TierError};
use crate::level::Tier;

/// Backend identifier of a permission, unique per deployment
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionId(pub String);

impl PermissionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PermissionId {
    fn from(s: &str) -> Self {
        PermissionId(s.to_string())
    }
}

impl From<String> for PermissionId {
    fn from(s: String) -> Self {
        PermissionId(s)
    }
}

/// A permission known to a deployment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    /// Dotted `<module>.<action>` path
    pub key: String,
}

impl Permission {
    pub fn new(id: impl Into<PermissionId>, key: impl Into<String>) -> Self {
        Permission { id: id.into(), key: key.into() }
    }

    /// Leading dotted segment of the key
    pub fn module(&self) -> &str {
        crate::heuristic::module_of(&self.key)
    }
}

/// Catalog keys of one module, split by tier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierKeys {
    #[serde(default)]
    pub view: Vec<String>,
    #[serde(default)]
    pub manage: Vec<String>,
    #[serde(default)]
    pub admin: Vec<String>,
}

impl TierKeys {
    pub fn get(&self, tier: Tier) -> &[String] {
        match tier {
            Tier::View => &self.view,
            Tier::Manage => &self.manage,
            Tier::Admin => &self.admin,
        }
    }

    /// All keys of the module, view tier first
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.view.iter().chain(&self.manage).chain(&self.admin).map(String::as_str)
    }

    /// Tier a key is listed under, if any
    pub fn tier_of(&self, key: &str) -> Option<Tier> {
        Tier::ALL.into_iter().find(|t| self.get(*t).iter().any(|k| k == key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleCatalogEntry {
    #[serde(rename = "moduleKey", alias = "module_key")]
    pub module_key: String,
    pub label: String,
    pub levels: TierKeys,
}

fn owned(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

impl ModuleCatalogEntry {
    pub fn new(module_key: &str, label: &str, view: &[&str], manage: &[&str], admin: &[&str]) -> Self {
        ModuleCatalogEntry {
            module_key: module_key.to_string(),
            label: label.to_string(),
            levels: TierKeys { view: owned(view), manage: owned(manage), admin: owned(admin) },
        }
    }

    /// Reject entries whose tiers share a key
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for key in self.levels.all() {
            if !seen.insert(key) {
                return Err(TierError::OverlappingTiers {
                    module: self.module_key.clone(),
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Validated, ordered set of module entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<ModuleCatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<ModuleCatalogEntry>) -> Result<Self> {
        let mut modules = HashSet::new();
        for e in &entries {
            e.validate()?;
            if !modules.insert(e.module_key.as_str()) {
                return Err(TierError::DuplicateModule(e.module_key.clone()));
            }
        }
        Ok(Catalog { entries })
    }

    /// Catalog shipped with the crate
    pub fn builtin() -> Self {
        let entries = BUILTIN_CATALOG
            .iter()
            .map(|(m, l, v, ma, a)| ModuleCatalogEntry::new(m, l, v, ma, a))
            .collect();
        Catalog { entries }
    }

    /// Parse a JSON array of entries
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<ModuleCatalogEntry> = serde_json::from_str(json)?;
        Self::new(entries).inspect_err(|e| tracing::error!(error = %e, "catalog rejected"))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn entries(&self) -> &[ModuleCatalogEntry] {
        &self.entries
    }

    pub fn get(&self, module_key: &str) -> Option<&ModuleCatalogEntry> {
        self.entries.iter().find(|e| e.module_key == module_key)
    }

    /// Whether any entry lists this key
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.levels.tier_of(key).is_some())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
