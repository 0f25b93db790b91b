use jiff::Timestamp;
use kalinga_core::models::category::Category;
use kalinga_core::models::client::NewClient;
use kalinga_core::models::session::WorkerId;
use kalinga_core::models::visit_record::{FieldValues, NewVisitRecord};
use kalinga_storage::state::{load_snapshot, save_snapshot};
use kalinga_storage::store::RecordStore;

#[test]
fn missing_snapshot_is_an_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = load_snapshot(&dir.path().join("store.json")).unwrap();
    assert!(store.list_clients(None, None).is_empty());
}

#[test]
fn snapshot_survives_a_reload_and_keeps_id_counters() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("store.json");
    let now: Timestamp = "2024-06-01T08:00:00Z".parse().unwrap();

    let mut store = RecordStore::new();
    let client = store
        .register_client(
            NewClient {
                name: "Ana".to_string(),
                address: "Purok 1".to_string(),
                ..NewClient::default()
            },
            WorkerId(3),
            now,
        )
        .unwrap();
    store
        .create_record(
            Category::Tuberculosis,
            NewVisitRecord {
                client_id: client.id,
                values: FieldValues::new(),
            },
            now,
        )
        .unwrap();
    save_snapshot(&path, &store).unwrap();
    assert!(!path.with_extension("json.tmp").exists());

    let mut reloaded = load_snapshot(&path).unwrap();
    assert_eq!(reloaded.client(client.id).unwrap(), &client);
    assert_eq!(reloaded.records_for(Category::Tuberculosis, client.id).unwrap().len(), 1);

    let next = reloaded
        .submit_intake(
            NewClient {
                name: "Ben".to_string(),
                address: "Purok 2".to_string(),
                ..NewClient::default()
            },
            now,
        )
        .unwrap();
    assert!(next.id > client.id);
}

#[test]
fn corrupt_snapshot_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, b"{ not json").unwrap();
    assert!(load_snapshot(&path).is_err());
}
