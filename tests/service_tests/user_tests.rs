//! Tests for user lifecycle in UserService
//!
//! These tests verify:
//! - Find-or-create semantics and case folding
//! - Last-login refresh
//! - Caller resolution and the Unauthenticated error
//! - Admin checks
//! - Library card queries
//! - Store failures propagate unchanged

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use patronkv::{
    Config, EntityKind, FixedClock, MemoryStore, PatronError, RecordKey, RecordStore, Registry,
    StaticIdentity, UserService,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

type Service<S> = UserService<S, StaticIdentity>;

fn setup_service(identity: StaticIdentity) -> (Arc<FixedClock>, Service<Arc<MemoryStore>>) {
    let clock = Arc::new(FixedClock::new(noon()));
    let service = UserService::new(Arc::new(MemoryStore::new()), identity, &Config::default())
        .unwrap()
        .with_clock(clock.clone());
    (clock, service)
}

/// A store whose operations can be switched off one at a time
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_gets: AtomicBool,
    fail_puts: AtomicBool,
    fail_deletes: AtomicBool,
    fail_lists: AtomicBool,
}

impl FlakyStore {
    fn check(flag: &AtomicBool, op: &str) -> patronkv::Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(PatronError::StoreUnavailable(format!("{op} failed")))
        } else {
            Ok(())
        }
    }
}

fn setup_flaky() -> (Arc<FlakyStore>, Service<Arc<FlakyStore>>) {
    let store = Arc::new(FlakyStore::default());
    let service = UserService::new(store.clone(), StaticIdentity::anonymous(), &Config::default())
        .unwrap()
        .with_clock(Arc::new(FixedClock::new(noon())));
    (store, service)
}

fn assert_unavailable<T: std::fmt::Debug>(result: patronkv::Result<T>) {
    match result {
        Err(PatronError::StoreUnavailable(_)) => {}
        other => panic!("expected StoreUnavailable, got {other:?}"),
    }
}

impl RecordStore for FlakyStore {
    fn get(&self, key: &RecordKey) -> patronkv::Result<Option<Vec<u8>>> {
        Self::check(&self.fail_gets, "get")?;
        self.inner.get(key)
    }

    fn put(&self, key: RecordKey, value: Vec<u8>) -> patronkv::Result<()> {
        Self::check(&self.fail_puts, "put")?;
        self.inner.put(key, value)
    }

    fn delete(&self, key: &RecordKey) -> patronkv::Result<bool> {
        Self::check(&self.fail_deletes, "delete")?;
        self.inner.delete(key)
    }

    fn list_by_ancestor(
        &self,
        kind: EntityKind,
        owner: &str,
    ) -> patronkv::Result<Vec<(RecordKey, Vec<u8>)>> {
        Self::check(&self.fail_lists, "list")?;
        self.inner.list_by_ancestor(kind, owner)
    }

    fn allocate_id(&self, kind: EntityKind) -> patronkv::Result<u64> {
        self.inner.allocate_id(kind)
    }
}

// =============================================================================
// Find-or-Create Tests
// =============================================================================

#[test]
fn test_find_or_create_then_find() {
    let (_clock, service) = setup_service(StaticIdentity::anonymous());

    let created = service.find_or_create("Ann@Example.COM").unwrap();
    let found = service.find("Ann@Example.COM").unwrap().unwrap();

    assert_eq!(created.email(), "ann@example.com");
    assert_eq!(found.email(), "ann@example.com");
    assert_eq!(found, created);
}

#[test]
fn test_find_or_create_sets_last_login_on_creation() {
    let (_clock, service) = setup_service(StaticIdentity::anonymous());

    let user = service.find_or_create("ann@example.com").unwrap();

    assert_eq!(user.last_login, noon());
}

#[test]
fn test_find_or_create_is_case_insensitive() {
    let (_clock, service) = setup_service(StaticIdentity::anonymous());

    let upper = service.find_or_create("A@b.com").unwrap();
    let lower = service.find_or_create("a@b.com").unwrap();

    assert_eq!(upper.email(), lower.email());
    assert_eq!(service.records().store().len(), 1);
}

#[test]
fn test_second_login_refreshes_last_login() {
    let (clock, service) = setup_service(StaticIdentity::anonymous());

    let first = service.find_or_create("ann@example.com").unwrap();
    clock.advance(Duration::minutes(30));
    let second = service.find_or_create("ann@example.com").unwrap();

    assert!(second.last_login >= first.last_login);
    assert_eq!(second.last_login, noon() + Duration::minutes(30));
    assert_eq!(service.records().store().len(), 1);

    let stored = service.find("ann@example.com").unwrap().unwrap();
    assert_eq!(stored.last_login, second.last_login);
}

#[test]
fn test_find_does_not_create_or_touch() {
    let (clock, service) = setup_service(StaticIdentity::anonymous());

    assert!(service.find("ann@example.com").unwrap().is_none());
    assert!(service.records().store().is_empty());

    service.find_or_create("ann@example.com").unwrap();
    clock.advance(Duration::hours(1));

    let found = service.find("ann@example.com").unwrap().unwrap();
    assert_eq!(found.last_login, noon());
}

#[test]
fn test_any_identity_string_round_trips() {
    let (_clock, service) = setup_service(StaticIdentity::anonymous());

    for identity in ["", "   ", "MiXeD Case", "ÄNN@example.com"] {
        let created = service.find_or_create(identity).unwrap();
        let found = service.find(identity).unwrap().unwrap();

        assert_eq!(created.email(), identity.to_lowercase());
        assert_eq!(found, created);
    }
}

#[test]
fn test_empty_caller_identity_resolves() {
    let (_clock, service) = setup_service(StaticIdentity::caller(""));

    let user = service.find_or_create_caller().unwrap();

    assert_eq!(user.email(), "");
    assert!(service.find("").unwrap().is_some());
}

// =============================================================================
// Caller Resolution Tests
// =============================================================================

#[test]
fn test_find_or_create_caller_lowercases() {
    let (_clock, service) = setup_service(StaticIdentity::caller("Ann@Example.com"));

    let user = service.find_or_create_caller().unwrap();

    assert_eq!(user.email(), "ann@example.com");
    assert!(service.find("ann@example.com").unwrap().is_some());
}

#[test]
fn test_find_or_create_caller_unauthenticated() {
    let (_clock, service) = setup_service(StaticIdentity::anonymous());

    let err = service.find_or_create_caller().unwrap_err();

    assert!(matches!(err, PatronError::Unauthenticated));
    assert!(service.records().store().is_empty());
}

// =============================================================================
// Admin Tests
// =============================================================================

#[test]
fn test_is_admin_false_when_unauthenticated() {
    let (_clock, service) = setup_service(StaticIdentity::anonymous().with_admin(true));
    assert!(!service.is_admin());
}

#[test]
fn test_is_admin_mirrors_provider() {
    let (_clock, admin) = setup_service(StaticIdentity::admin("root@example.com"));
    let (_clock, plain) = setup_service(StaticIdentity::caller("ann@example.com"));

    assert!(admin.is_admin());
    assert!(!plain.is_admin());
}

#[test]
fn test_is_admin_has_no_side_effects() {
    let (_clock, service) = setup_service(StaticIdentity::admin("root@example.com"));
    service.is_admin();
    assert!(service.records().store().is_empty());
}

// =============================================================================
// Library Card Tests
// =============================================================================

#[test]
fn test_library_cards_empty() {
    let (_clock, service) = setup_service(StaticIdentity::anonymous());
    let user = service.find_or_create("ann@example.com").unwrap();

    assert!(service.library_cards(&user).unwrap().is_empty());
}

#[test]
fn test_library_cards_scoped_to_user() {
    let (_clock, service) = setup_service(StaticIdentity::anonymous());
    let ann = service.find_or_create("ann@example.com").unwrap();
    let bob = service.find_or_create("bob@example.com").unwrap();

    service.add_library_card(&ann, "east").unwrap();
    service.add_library_card(&ann, "west").unwrap();
    service.add_library_card(&bob, "east").unwrap();

    let mut filters: Vec<String> = service
        .library_cards(&ann)
        .unwrap()
        .into_iter()
        .map(|c| c.filter().to_string())
        .collect();
    filters.sort();

    assert_eq!(filters, vec!["east", "west"]);
    assert_eq!(service.library_cards(&bob).unwrap().len(), 1);
}

#[test]
fn test_library_card_lookup() {
    let (_clock, service) = setup_service(StaticIdentity::anonymous());
    let ann = service.find_or_create("ann@example.com").unwrap();
    let bob = service.find_or_create("bob@example.com").unwrap();

    service.add_library_card(&ann, "east").unwrap();

    let card = service.library_card(&ann, "east").unwrap().unwrap();
    assert_eq!(card.owner(), "ann@example.com");
    assert_eq!(card.filter(), "east");

    assert!(service.library_card(&ann, "west").unwrap().is_none());
    assert!(service.library_card(&bob, "east").unwrap().is_none());
}

#[test]
fn test_add_library_card_same_filter_replaces() {
    let (_clock, service) = setup_service(StaticIdentity::anonymous());
    let ann = service.find_or_create("ann@example.com").unwrap();

    service.add_library_card(&ann, "east").unwrap();
    service.add_library_card(&ann, "east").unwrap();

    assert_eq!(service.library_cards(&ann).unwrap().len(), 1);
}

// =============================================================================
// Error Propagation Tests
// =============================================================================

#[test]
fn test_failed_put_propagates() {
    let (store, service) = setup_flaky();

    store.fail_puts.store(true, Ordering::SeqCst);
    assert_unavailable(service.find_or_create("ann@example.com"));

    store.fail_puts.store(false, Ordering::SeqCst);
    assert!(service.find("ann@example.com").unwrap().is_none());
}

#[test]
fn test_failed_get_propagates() {
    let (store, service) = setup_flaky();
    service.find_or_create("ann@example.com").unwrap();

    store.fail_gets.store(true, Ordering::SeqCst);

    assert_unavailable(service.find("ann@example.com"));
    assert_unavailable(service.find_or_create("ann@example.com"));
}

#[test]
fn test_failed_delete_propagates_from_vacation_ends() {
    let (store, service) = setup_flaky();
    let ann = service.find_or_create("ann@example.com").unwrap();
    let expired = service
        .add_vacation(&ann, noon() - Duration::days(3), noon() - Duration::days(1))
        .unwrap();

    store.fail_deletes.store(true, Ordering::SeqCst);

    assert_unavailable(service.vacation_ends(&ann));
    let scan = service.scan_vacations(&ann, noon()).unwrap();
    assert_unavailable(service.prune_expired(&scan));

    store.fail_deletes.store(false, Ordering::SeqCst);
    let remaining = service.all_vacations(&ann).unwrap();
    assert_eq!(remaining, vec![expired]);
}

#[test]
fn test_failed_list_propagates() {
    let (store, service) = setup_flaky();
    let ann = service.find_or_create("ann@example.com").unwrap();
    service.add_library_card(&ann, "east").unwrap();
    service
        .add_vacation(&ann, noon() - Duration::days(3), noon() - Duration::days(1))
        .unwrap();

    store.fail_lists.store(true, Ordering::SeqCst);

    assert_unavailable(service.library_cards(&ann));
    assert_unavailable(service.all_vacations(&ann));
    assert_unavailable(service.vacation_ends(&ann));

    store.fail_lists.store(false, Ordering::SeqCst);
    assert_eq!(service.library_cards(&ann).unwrap().len(), 1);
    assert_eq!(service.all_vacations(&ann).unwrap().len(), 1);
}

#[test]
fn test_config_without_user_kind_rejected() {
    let config = Config::builder()
        .registry(Registry::empty().register(EntityKind::Vacation))
        .build();

    let result = UserService::new(MemoryStore::new(), StaticIdentity::anonymous(), &config);

    assert!(matches!(result, Err(PatronError::Config(_))));
}
