//! permtier - tiered permission aggregation
//!
//! Maps flat sets of fine-grained permission ids onto coarse per-module
//! access levels (`none < view < manage < admin`) and back:
//! - [`infer_level`]: enabled ids + catalog entry -> level
//! - [`set_level`]: target level -> enable/disable toggles
//! - [`classify`]: naming heuristic for permissions with no catalog entry
//!
//! Editing state lives in an explicit [`RolePermissionDraft`]; persistence
//! goes through a [`RoleStore`] ([`MemoryStore`] or the LMDB-backed
//! [`LmdbStore`]).

pub mod catalog;
pub mod config;
pub mod constants;
pub mod db;
pub mod draft;
pub mod engine;
pub mod error;
pub mod heuristic;
pub mod keys;
pub mod level;
pub mod logging;
pub mod resolver;
pub mod session;
pub mod store;
pub mod tiers;

pub use catalog::{Catalog, ModuleCatalogEntry, Permission, PermissionId, TierKeys};
pub use config::{EngineConfig, LoggingConfig, StoreConfig};
pub use db::LmdbStore;
pub use draft::{Changes, DraftState, RolePermissionDraft};
pub use engine::{
    apply_tiers, infer_level, infer_level_with, infer_tiers, level_of, set_level, set_level_of, TierPolicy,
};
pub use error::{Result, TierError};
pub use heuristic::{classify, group_by_module, module_of, Classification, HeuristicGroup};
pub use level::{Level, Tier};
pub use logging::init_logging;
pub use resolver::{resolve, KeyMap};
pub use session::{EditSession, LevelSource, ModuleLevel, ModuleTiers};
pub use store::{MemoryStore, RoleStore};
pub use tiers::{CatalogTiers, TierIds, TierSource};
