//! Edit sessions over a store: overview, per-module and bulk edits, save

use std::collections::BTreeSet;

use permtier::*;
use tempfile::TempDir;

fn ids(list: &[&str]) -> BTreeSet<PermissionId> {
    list.iter().map(|s| PermissionId::from(*s)).collect()
}

fn catalog() -> Catalog {
    Catalog::new(vec![
        ModuleCatalogEntry::new(
            "products",
            "Products",
            &["products.read"],
            &["products.create", "products.update"],
            &["products.delete"],
        ),
        ModuleCatalogEntry::new("attributes", "Attributes", &["attributes.read"], &["attributes.manage"], &[]),
        // not deployed yet
        ModuleCatalogEntry::new("subscriptions", "Subscriptions", &["subscriptions.read"], &["subscriptions.update"], &[]),
    ])
    .unwrap()
}

fn permissions() -> Vec<Permission> {
    vec![
        Permission::new("p1", "products.read"),
        Permission::new("p2", "products.create"),
        Permission::new("p3", "products.update"),
        Permission::new("p4", "products.delete"),
        Permission::new("a1", "attributes.read"),
        Permission::new("a2", "attributes.manage"),
        Permission::new("l1", "loyalty.read"),
        Permission::new("l2", "loyalty.points.adjust"),
        Permission::new("l3", "loyalty.export"),
        // uncatalogued key under a catalog module prefix
        Permission::new("p9", "products.archive"),
    ]
}

fn store() -> MemoryStore {
    let store = MemoryStore::with_permissions(permissions());
    store.replace_role_permissions("merch", &ids(&["p1", "p2", "a1", "l1"])).unwrap();
    store
}

fn open(store: MemoryStore) -> EditSession<MemoryStore> {
    EditSession::open(store, catalog(), &EngineConfig::default()).unwrap()
}

fn level_map(session: &EditSession<MemoryStore>) -> Vec<(String, Level, LevelSource)> {
    session.module_levels().into_iter().map(|m| (m.module_key, m.level, m.source)).collect()
}

// === Opening ===

#[test]
fn test_open_builds_key_map_and_groups() {
    let session = open(store());
    assert_eq!(session.key_map().len(), 10);
    assert_eq!(session.key_map().get("attributes.manage"), Some(&PermissionId::from("a2")));
    let groups: Vec<_> = session.heuristic_groups().iter().map(|g| g.module_key().to_string()).collect();
    // "products" prefix stays with the catalog
    assert_eq!(groups, vec!["loyalty".to_string()]);
    assert!(matches!(session.module("products").unwrap(), ModuleTiers::Catalog(_)));
    assert!(matches!(session.module("loyalty").unwrap(), ModuleTiers::Heuristic(_)));
    assert!(matches!(session.module("nope"), Err(TierError::UnknownModule(_))));
}

#[test]
fn test_open_without_heuristic_fallback() {
    let cfg = EngineConfig { heuristic_fallback: false, ..EngineConfig::default() };
    let session = EditSession::open(store(), catalog(), &cfg).unwrap();
    assert!(session.heuristic_groups().is_empty());
    assert_eq!(session.module_levels().len(), 3);
}

// === Overview ===

#[test]
fn test_module_levels() {
    let mut session = open(store());
    session.select_role("merch").unwrap();
    assert_eq!(
        level_map(&session),
        vec![
            ("products".to_string(), Level::Manage, LevelSource::Catalog),
            ("attributes".to_string(), Level::View, LevelSource::Catalog),
            // nothing deployed: vacuously admin under the default policy
            ("subscriptions".to_string(), Level::Admin, LevelSource::Catalog),
            ("loyalty".to_string(), Level::View, LevelSource::Heuristic),
        ]
    );
}

#[test]
fn test_strict_policy_overview() {
    let cfg = EngineConfig { policy: TierPolicy::Strict, ..EngineConfig::default() };
    let mut session = EditSession::open(store(), catalog(), &cfg).unwrap();
    session.select_role("merch").unwrap();
    assert_eq!(session.level("subscriptions").unwrap(), Level::None);
    assert_eq!(session.level("products").unwrap(), Level::Manage);
}

// === Edits ===

#[test]
fn test_set_level_per_module() {
    let mut session = open(store());
    session.select_role("merch").unwrap();

    assert_eq!(session.set_level("products", Level::View).unwrap(), Level::View);
    // loyalty has no admin-only keys, so manage reads back as admin
    assert_eq!(session.set_level("loyalty", Level::Manage).unwrap(), Level::Admin);
    assert_eq!(session.draft().enabled(), &ids(&["p1", "a1", "l1", "l2", "l3"]));
    assert_eq!(session.draft().state(), DraftState::Dirty);
    assert!(session.set_level("nope", Level::View).is_err());
}

#[test]
fn test_bulk_edit() {
    let mut session = open(store());
    session.select_role("merch").unwrap();
    session.toggle(&PermissionId::from("p9"), true).unwrap();

    session.set_all_levels(Level::Admin).unwrap();
    assert!(session.module_levels().iter().all(|m| m.level == Level::Admin));
    // uncatalogued ids under a catalog prefix are left alone
    assert_eq!(session.draft().enabled(), &ids(&["p1", "p2", "p3", "p4", "a1", "a2", "l1", "l2", "l3", "p9"]));

    session.set_all_levels(Level::None).unwrap();
    assert_eq!(session.draft().enabled(), &ids(&["p9"]));
}

#[test]
fn test_edits_require_role() {
    let mut session = open(store());
    assert!(matches!(session.set_level("products", Level::View), Err(TierError::NotLoaded)));
    assert!(matches!(session.set_all_levels(Level::View), Err(TierError::NotLoaded)));
}

// === Save / discard ===

#[test]
fn test_save_and_reopen() {
    let mut session = open(store());
    session.select_role("merch").unwrap();
    session.set_level("attributes", Level::Admin).unwrap();
    session.save().unwrap();
    assert_eq!(session.draft().state(), DraftState::Hydrated);
    assert_eq!(session.store().role_permissions("merch").unwrap(), ids(&["p1", "p2", "a1", "a2", "l1"]));

    session.select_role("merch").unwrap();
    assert_eq!(session.level("attributes").unwrap(), Level::Admin);
}

#[test]
fn test_discard() {
    let mut session = open(store());
    session.select_role("merch").unwrap();
    session.set_all_levels(Level::None).unwrap();
    session.discard();
    assert_eq!(session.level("products").unwrap(), Level::Manage);
    assert_eq!(session.draft().state(), DraftState::Hydrated);
}

#[test]
fn test_session_over_lmdb() {
    let dir = TempDir::new().unwrap();
    let store = LmdbStore::open(dir.path()).unwrap();
    for p in permissions() {
        store.put_permission(&p).unwrap();
    }

    let mut session = EditSession::open(&store, catalog(), &EngineConfig::default()).unwrap();
    session.select_role("support").unwrap();
    session.set_level("products", Level::View).unwrap();
    session.set_level("loyalty", Level::Manage).unwrap();
    session.save().unwrap();

    assert_eq!(store.role_permissions("support").unwrap(), ids(&["p1", "l1", "l2", "l3"]));
    assert_eq!(store.roles().unwrap(), vec!["support".to_string()]);
}

#[test]
fn test_module_level_serializes() {
    let row = ModuleLevel {
        module_key: "products".into(),
        label: "Products".into(),
        level: Level::Manage,
        source: LevelSource::Catalog,
    };
    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json["level"], "manage");
    assert_eq!(json["source"], "catalog");
}
