//! Role permission draft lifecycle

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};

use permtier::*;

fn ids(list: &[&str]) -> BTreeSet<PermissionId> {
    list.iter().map(|s| PermissionId::from(*s)).collect()
}

fn pid(s: &str) -> PermissionId {
    PermissionId::from(s)
}

/// Memory store whose saves and fetches can be made to fail
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_save: AtomicBool,
    fail_fetch: AtomicBool,
}

impl RoleStore for FlakyStore {
    fn permissions(&self) -> Result<Vec<Permission>> {
        self.inner.permissions()
    }

    fn put_permission(&self, permission: &Permission) -> Result<()> {
        self.inner.put_permission(permission)
    }

    fn roles(&self) -> Result<Vec<String>> {
        self.inner.roles()
    }

    fn role_permissions(&self, role: &str) -> Result<BTreeSet<PermissionId>> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(TierError::Storage("fetch refused".into()));
        }
        self.inner.role_permissions(role)
    }

    fn replace_role_permissions(&self, role: &str, ids: &BTreeSet<PermissionId>) -> Result<()> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(TierError::Storage("save refused".into()));
        }
        self.inner.replace_role_permissions(role, ids)
    }
}

fn setup() -> FlakyStore {
    let store = FlakyStore::default();
    store.inner.replace_role_permissions("editor", &ids(&["p1", "p2"])).unwrap();
    store.inner.replace_role_permissions("viewer", &ids(&["p1"])).unwrap();
    store
}

// === States ===

#[test]
fn test_unloaded_rejects_edits() {
    let store = setup();
    let mut draft = RolePermissionDraft::new();
    assert_eq!(draft.state(), DraftState::Unloaded);
    assert!(matches!(draft.toggle(&pid("p1"), true), Err(TierError::NotLoaded)));
    assert!(matches!(draft.save(&store), Err(TierError::NotLoaded)));
    assert_eq!(draft.role(), None);
}

#[test]
fn test_hydrate_then_dirty() {
    let store = setup();
    let mut draft = RolePermissionDraft::new();
    draft.hydrate(&store, "editor").unwrap();
    assert_eq!(draft.state(), DraftState::Hydrated);
    assert_eq!(draft.role(), Some("editor"));
    assert_eq!(draft.enabled(), &ids(&["p1", "p2"]));

    draft.toggle(&pid("p3"), true).unwrap();
    assert_eq!(draft.state(), DraftState::Dirty);
    assert!(draft.is_enabled(&pid("p3")));

    // undoing the only edit is clean again
    draft.toggle(&pid("p3"), false).unwrap();
    assert_eq!(draft.state(), DraftState::Hydrated);
}

#[test]
fn test_changes() {
    let store = setup();
    let mut draft = RolePermissionDraft::new();
    draft.hydrate(&store, "editor").unwrap();
    assert!(draft.changes().is_empty());
    draft.toggle(&pid("p2"), false).unwrap();
    draft.toggle(&pid("p9"), true).unwrap();
    let changes = draft.changes();
    assert_eq!(changes.added, ids(&["p9"]));
    assert_eq!(changes.removed, ids(&["p2"]));
}

#[test]
fn test_role_switch_discards_edits() {
    let store = setup();
    let mut draft = RolePermissionDraft::new();
    draft.hydrate(&store, "editor").unwrap();
    draft.toggle(&pid("p7"), true).unwrap();

    draft.select_role(&store, "viewer").unwrap();
    assert_eq!(draft.state(), DraftState::Hydrated);
    assert_eq!(draft.enabled(), &ids(&["p1"]));

    draft.select_role(&store, "editor").unwrap();
    assert!(!draft.is_enabled(&pid("p7")));
}

#[test]
fn test_unknown_role_hydrates_empty() {
    let store = setup();
    let mut draft = RolePermissionDraft::new();
    draft.hydrate(&store, "new-role").unwrap();
    assert_eq!(draft.state(), DraftState::Hydrated);
    assert!(draft.enabled().is_empty());
}

#[test]
fn test_discard() {
    let store = setup();
    let mut draft = RolePermissionDraft::new();
    draft.hydrate(&store, "editor").unwrap();
    draft.toggle(&pid("p1"), false).unwrap();
    draft.discard();
    assert_eq!(draft.state(), DraftState::Hydrated);
    assert_eq!(draft.enabled(), &ids(&["p1", "p2"]));
    draft.unload();
    assert_eq!(draft.state(), DraftState::Unloaded);
}

// === Save ===

#[test]
fn test_save_persists_full_set() {
    let store = setup();
    let mut draft = RolePermissionDraft::new();
    draft.hydrate(&store, "editor").unwrap();
    draft.toggle(&pid("p1"), false).unwrap();
    draft.toggle(&pid("p5"), true).unwrap();
    draft.save(&store).unwrap();

    assert_eq!(draft.state(), DraftState::Hydrated);
    assert!(draft.changes().is_empty());
    assert_eq!(store.role_permissions("editor").unwrap(), ids(&["p2", "p5"]));
    // other roles untouched
    assert_eq!(store.role_permissions("viewer").unwrap(), ids(&["p1"]));
}

#[test]
fn test_failed_save_reverts() {
    let store = setup();
    let mut draft = RolePermissionDraft::new();
    draft.hydrate(&store, "editor").unwrap();
    draft.toggle(&pid("p8"), true).unwrap();

    store.fail_save.store(true, Ordering::SeqCst);
    assert!(matches!(draft.save(&store), Err(TierError::Storage(m)) if m == "save refused"));
    assert_eq!(draft.state(), DraftState::Hydrated);
    assert_eq!(draft.enabled(), &ids(&["p1", "p2"]));
    assert_eq!(draft.role(), Some("editor"));
}

#[test]
fn test_failed_save_picks_up_concurrent_write() {
    let store = setup();
    let mut draft = RolePermissionDraft::new();
    draft.hydrate(&store, "editor").unwrap();
    draft.toggle(&pid("p8"), true).unwrap();

    // another operator saved meanwhile; our save then fails
    store.inner.replace_role_permissions("editor", &ids(&["p4"])).unwrap();
    store.fail_save.store(true, Ordering::SeqCst);
    assert!(draft.save(&store).is_err());
    assert_eq!(draft.enabled(), &ids(&["p4"]));
}

#[test]
fn test_failed_save_and_refetch_unloads() {
    let store = setup();
    let mut draft = RolePermissionDraft::new();
    draft.hydrate(&store, "editor").unwrap();
    draft.toggle(&pid("p8"), true).unwrap();

    store.fail_save.store(true, Ordering::SeqCst);
    store.fail_fetch.store(true, Ordering::SeqCst);
    assert!(matches!(draft.save(&store), Err(TierError::Storage(m)) if m == "save refused"));
    assert_eq!(draft.state(), DraftState::Unloaded);
}

#[test]
fn test_failed_hydrate_keeps_draft() {
    let store = setup();
    let mut draft = RolePermissionDraft::new();
    draft.hydrate(&store, "editor").unwrap();
    draft.toggle(&pid("p8"), true).unwrap();

    store.fail_fetch.store(true, Ordering::SeqCst);
    assert!(draft.select_role(&store, "viewer").is_err());
    assert_eq!(draft.role(), Some("editor"));
    assert_eq!(draft.state(), DraftState::Dirty);
}

#[test]
fn test_last_save_wins() {
    let store = setup();
    let mut a = RolePermissionDraft::new();
    let mut b = RolePermissionDraft::new();
    a.hydrate(&store, "editor").unwrap();
    b.hydrate(&store, "editor").unwrap();
    a.toggle(&pid("pa"), true).unwrap();
    b.toggle(&pid("pb"), true).unwrap();
    a.save(&store).unwrap();
    b.save(&store).unwrap();
    assert_eq!(store.role_permissions("editor").unwrap(), ids(&["p1", "p2", "pb"]));
}

// === Levels through the draft ===

#[test]
fn test_draft_levels() {
    let entry = ModuleCatalogEntry::new(
        "products",
        "Products",
        &["products.read"],
        &["products.create", "products.update"],
        &["products.delete"],
    );
    let keys = resolve(&[
        Permission::new("p1", "products.read"),
        Permission::new("p2", "products.create"),
        Permission::new("p3", "products.update"),
        Permission::new("p4", "products.delete"),
    ]);
    let source = CatalogTiers::new(&entry, &keys);
    let store = setup();
    let mut draft = RolePermissionDraft::new();
    assert!(draft.set_level(&source, Level::View, TierPolicy::Vacuous).is_err());

    draft.hydrate(&store, "editor").unwrap();
    assert_eq!(draft.level(&source, TierPolicy::Vacuous), Level::Manage);
    assert_eq!(draft.set_level(&source, Level::Admin, TierPolicy::Vacuous).unwrap(), Level::Admin);
    assert_eq!(draft.enabled(), &ids(&["p1", "p2", "p3", "p4"]));
    assert_eq!(draft.state(), DraftState::Dirty);
}
