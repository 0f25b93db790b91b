use jiff::Timestamp;
use kalinga_core::models::category::Category;
use kalinga_core::models::client::{
    ClientCondition, ClientId, ClientStatus, NewClient, Position, StatusTransition,
};
use kalinga_core::models::session::WorkerId;
use kalinga_core::models::visit_record::{FieldValues, NewVisitRecord, RecordId};
use kalinga_storage::error::StorageError;
use kalinga_storage::store::RecordStore;
use serde_json::json;

const WORKER: WorkerId = WorkerId(7);

fn ts(s: &str) -> Timestamp {
    s.parse().unwrap()
}

fn new_client(name: &str) -> NewClient {
    NewClient {
        name: name.to_string(),
        address: "Purok 3, Barangay San Roque".to_string(),
        ..NewClient::default()
    }
}

fn values(pairs: &[(&str, serde_json::Value)]) -> FieldValues {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn worker_registration_is_active_and_intake_is_pending() {
    let mut store = RecordStore::new();
    let now = ts("2024-06-01T08:00:00Z");

    let registered = store.register_client(new_client("Ana"), WORKER, now).unwrap();
    let intake = store.submit_intake(new_client("Ben"), now).unwrap();

    assert_eq!(registered.status, ClientStatus::Active);
    assert_eq!(registered.worker_id, Some(WORKER));
    assert_eq!(intake.status, ClientStatus::Pending);
    assert_eq!(intake.worker_id, None);
    assert_ne!(registered.id, intake.id);
}

#[test]
fn registration_requires_name() {
    let mut store = RecordStore::new();
    let result = store.register_client(new_client("  "), WORKER, ts("2024-06-01T08:00:00Z"));
    assert!(matches!(result, Err(StorageError::Invalid(_))));
}

#[test]
fn deactivated_client_moves_between_queues() {
    let mut store = RecordStore::new();
    let now = ts("2024-06-01T08:00:00Z");
    let client = store.register_client(new_client("Ana"), WORKER, now).unwrap();

    let (updated, transition) = store
        .set_status(client.id, ClientStatus::Inactive, ts("2024-06-02T08:00:00Z"))
        .unwrap();
    assert_eq!(transition, StatusTransition::Deactivate);
    assert_eq!(updated.updated_at, ts("2024-06-02T08:00:00Z"));

    let active = store.list_clients(Some(WORKER), Some(ClientStatus::Active));
    let inactive = store.list_clients(Some(WORKER), Some(ClientStatus::Inactive));
    assert!(active.iter().all(|c| c.id != client.id));
    assert!(inactive.iter().any(|c| c.id == client.id));
}

#[test]
fn invalid_transition_is_rejected_without_change() {
    let mut store = RecordStore::new();
    let now = ts("2024-06-01T08:00:00Z");
    let client = store.register_client(new_client("Ana"), WORKER, now).unwrap();

    let err = store
        .set_status(client.id, ClientStatus::Pending, now)
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidTransition { .. }));
    assert_eq!(store.client(client.id).unwrap().status, ClientStatus::Active);
}

#[test]
fn activated_intake_joins_the_assigned_workers_lists() {
    let mut store = RecordStore::new();
    let now = ts("2024-06-01T08:00:00Z");
    let intake = store.submit_intake(new_client("Ben"), now).unwrap();

    store.set_status(intake.id, ClientStatus::Active, now).unwrap();
    assert!(store.list_clients(Some(WORKER), Some(ClientStatus::Active)).is_empty());

    let assigned = store.assign_worker(intake.id, WORKER, ts("2024-06-02T08:00:00Z")).unwrap();
    assert_eq!(assigned.worker_id, Some(WORKER));
    assert_eq!(assigned.updated_at, ts("2024-06-02T08:00:00Z"));

    let active = store.list_clients(Some(WORKER), Some(ClientStatus::Active));
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, intake.id);

    store.enroll(intake.id, Category::Diabetes, Some(WORKER), now).unwrap();
    assert_eq!(store.category_roster(Category::Diabetes, Some(WORKER)).len(), 1);
}

#[test]
fn list_clients_scopes_by_worker() {
    let mut store = RecordStore::new();
    let now = ts("2024-06-01T08:00:00Z");
    store.register_client(new_client("Ana"), WORKER, now).unwrap();
    store.register_client(new_client("Ben"), WorkerId(8), now).unwrap();

    assert_eq!(store.list_clients(Some(WORKER), None).len(), 1);
    assert_eq!(store.list_clients(None, None).len(), 2);
}

#[test]
fn condition_and_position_updates() {
    let mut store = RecordStore::new();
    let now = ts("2024-06-01T08:00:00Z");
    let client = store.register_client(new_client("Ana"), WORKER, now).unwrap();

    let moved = store
        .update_condition(client.id, ClientCondition::Transfer, now)
        .unwrap();
    assert_eq!(moved.condition, ClientCondition::Transfer);

    let placed = store
        .update_position(
            client.id,
            Position {
                latitude: 14.5995,
                longitude: 120.9842,
            },
            now,
        )
        .unwrap();
    assert!(placed.position.is_some());

    let bad = store.update_position(
        client.id,
        Position {
            latitude: 95.0,
            longitude: 0.0,
        },
        now,
    );
    assert!(matches!(bad, Err(StorageError::InvalidPosition { .. })));
}

#[test]
fn enroll_is_idempotent_and_roster_lists_active_only() {
    let mut store = RecordStore::new();
    let now = ts("2024-06-01T08:00:00Z");
    let ana = store.register_client(new_client("Ana"), WORKER, now).unwrap();
    let ben = store.register_client(new_client("Ben"), WORKER, now).unwrap();

    let first = store.enroll(ana.id, Category::Pregnant, Some(WORKER), now).unwrap();
    let again = store
        .enroll(ana.id, Category::Pregnant, Some(WORKER), ts("2024-07-01T08:00:00Z"))
        .unwrap();
    assert_eq!(first, again);

    store.enroll(ben.id, Category::Pregnant, Some(WORKER), now).unwrap();
    store.set_status(ben.id, ClientStatus::Inactive, now).unwrap();

    let roster = store.category_roster(Category::Pregnant, Some(WORKER));
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].id, ana.id);
    assert!(store.category_roster(Category::Diabetes, None).is_empty());
}

#[test]
fn enroll_unknown_client_fails() {
    let mut store = RecordStore::new();
    let err = store
        .enroll(ClientId(99), Category::Pregnant, None, ts("2024-06-01T08:00:00Z"))
        .unwrap_err();
    assert!(matches!(err, StorageError::ClientNotFound(ClientId(99))));
}

#[test]
fn records_are_returned_in_visit_order_per_pair() {
    let mut store = RecordStore::new();
    let now = ts("2024-06-01T08:00:00Z");
    let client = store.register_client(new_client("Ana"), WORKER, now).unwrap();

    assert!(store.records_for(Category::Pregnant, client.id).unwrap().is_empty());

    for visit in ["2024-06-01", "2024-07-01"] {
        store
            .create_record(
                Category::Pregnant,
                NewVisitRecord {
                    client_id: client.id,
                    values: values(&[("visit_date", json!(visit))]),
                },
                now,
            )
            .unwrap();
    }
    store
        .create_record(
            Category::Diabetes,
            NewVisitRecord {
                client_id: client.id,
                values: FieldValues::new(),
            },
            now,
        )
        .unwrap();

    let records = store.records_for(Category::Pregnant, client.id).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].values["visit_date"], json!("2024-06-01"));
    assert_eq!(records[1].values["visit_date"], json!("2024-07-01"));

    // First submission enrolled the client.
    assert!(store.enrollment(client.id, Category::Diabetes).is_some());
}

#[test]
fn records_for_unknown_client_is_not_found() {
    let store = RecordStore::new();
    let err = store.records_for(Category::Pregnant, ClientId(42)).unwrap_err();
    assert!(matches!(err, StorageError::ClientNotFound(_)));
}

#[test]
fn update_merges_sent_keys_and_bumps_updated_at() {
    let mut store = RecordStore::new();
    let created = ts("2024-06-01T08:00:00Z");
    let client = store.register_client(new_client("Ana"), WORKER, created).unwrap();
    let record = store
        .create_record(
            Category::Hypertension,
            NewVisitRecord {
                client_id: client.id,
                values: values(&[("bp_systolic", json!(140)), ("bp_diastolic", json!(90))]),
            },
            created,
        )
        .unwrap();

    let later = ts("2024-06-15T08:00:00Z");
    let updated = store
        .update_record(
            Category::Hypertension,
            record.id,
            values(&[("bp_systolic", json!(130))]),
            later,
        )
        .unwrap();
    assert_eq!(updated.values["bp_systolic"], json!(130));
    assert_eq!(updated.values["bp_diastolic"], json!(90));
    assert_eq!(updated.created_at, created);
    assert_eq!(updated.updated_at, later);
}

#[test]
fn update_with_no_changes_only_moves_updated_at() {
    let mut store = RecordStore::new();
    let created = ts("2024-06-01T08:00:00Z");
    let client = store.register_client(new_client("Ana"), WORKER, created).unwrap();
    let record = store
        .create_record(
            Category::Newborn,
            NewVisitRecord {
                client_id: client.id,
                values: values(&[("apgar", json!(9))]),
            },
            created,
        )
        .unwrap();

    let later = ts("2024-06-02T08:00:00Z");
    let updated = store
        .update_record(Category::Newborn, record.id, record.values.clone(), later)
        .unwrap();
    assert_eq!(updated.values, record.values);
    assert_eq!(updated.updated_at, later);
}

#[test]
fn update_in_the_wrong_category_is_not_found() {
    let mut store = RecordStore::new();
    let now = ts("2024-06-01T08:00:00Z");
    let client = store.register_client(new_client("Ana"), WORKER, now).unwrap();
    let record = store
        .create_record(
            Category::Newborn,
            NewVisitRecord {
                client_id: client.id,
                values: FieldValues::new(),
            },
            now,
        )
        .unwrap();

    let err = store
        .update_record(Category::Pregnant, record.id, FieldValues::new(), now)
        .unwrap_err();
    assert!(matches!(err, StorageError::RecordNotFound { .. }));
    let missing = store
        .update_record(Category::Newborn, RecordId(999), FieldValues::new(), now)
        .unwrap_err();
    assert!(matches!(missing, StorageError::RecordNotFound { .. }));
}
