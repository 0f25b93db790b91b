mod common;

use jiff::Timestamp;

use common::{Fault, StoreGateway, WORKER, admin, worker};
use kalinga_core::models::category::Category;
use kalinga_core::models::client::{
    ClientCondition, ClientId, ClientStatus, NewClient, Position, StatusTransition,
};
use kalinga_core::models::session::{Session, WorkerId};
use kalinga_forms::schema::ValidationIssue;
use kalinga_outreach::OutreachError;
use kalinga_outreach::directory::{self, CategoryRoster, QueuePhase, StatusQueue};

fn new_client(name: &str) -> NewClient {
    NewClient {
        name: name.to_string(),
        address: "Sitio Malinis".to_string(),
        phone: Some("0917 555 0101".to_string()),
        ..NewClient::default()
    }
}

#[tokio::test]
async fn roster_lists_enrolled_clients_and_searches() {
    let gateway = StoreGateway::new();
    let maria = gateway.seed_client("Maria Santos");
    let jose = gateway.seed_client("Jose Rizal");
    gateway.seed_client("Not Enrolled");
    directory::enroll(&gateway, worker(), maria.id, Category::Tuberculosis).await.unwrap();
    directory::enroll(&gateway, worker(), jose.id, Category::Tuberculosis).await.unwrap();

    let mut roster = CategoryRoster::new(Category::Tuberculosis);
    assert!(!roster.is_loaded());
    roster.fetch(&gateway, worker()).await.unwrap();

    assert!(roster.is_loaded());
    assert_eq!(roster.clients().len(), 2);
    let hits = roster.search("  SANTOS ");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, maria.id);
    assert_eq!(roster.search("").len(), 2);
    assert!(roster.search("cebu").is_empty());
}

#[tokio::test]
async fn worker_roster_excludes_other_workers_clients() {
    let gateway = StoreGateway::new();
    let mine = gateway.seed_client("Maria Santos");
    let theirs = gateway.with_store(|s| {
        s.register_client(new_client("Ana Cruz"), WorkerId(99), Timestamp::now())
            .unwrap()
    });
    for id in [mine.id, theirs.id] {
        directory::enroll(&gateway, admin(), id, Category::Hypertension).await.unwrap();
    }

    let mut roster = CategoryRoster::new(Category::Hypertension);
    roster.fetch(&gateway, worker()).await.unwrap();
    assert_eq!(roster.clients().len(), 1);
    assert_eq!(roster.clients()[0].id, mine.id);

    roster.fetch(&gateway, admin()).await.unwrap();
    assert_eq!(roster.clients().len(), 2);
}

#[tokio::test]
async fn unauthorized_fetch_clears_roster() {
    let gateway = StoreGateway::new();
    let client = gateway.seed_client("Maria Santos");
    directory::enroll(&gateway, worker(), client.id, Category::Diabetes).await.unwrap();

    let mut roster = CategoryRoster::new(Category::Diabetes);
    roster.fetch(&gateway, worker()).await.unwrap();
    assert_eq!(roster.clients().len(), 1);

    gateway.fail("category_roster", Fault::Unauthorized);
    let err = roster.fetch(&gateway, worker()).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(roster.clients().is_empty());
    assert!(!roster.is_loaded());
}

#[tokio::test]
async fn deactivated_client_moves_between_queues() {
    let gateway = StoreGateway::new();
    let maria = gateway.seed_client("Maria Santos");
    let jose = gateway.seed_client("Jose Rizal");

    let mut active = StatusQueue::new(ClientStatus::Active);
    let mut inactive = StatusQueue::new(ClientStatus::Inactive);
    active.fetch(&gateway, worker()).await.unwrap();
    inactive.fetch(&gateway, worker()).await.unwrap();
    assert_eq!(active.clients().len(), 2);
    assert!(inactive.clients().is_empty());

    let updated = active
        .transition(&gateway, worker(), maria.id, StatusTransition::Deactivate)
        .await
        .unwrap();
    assert_eq!(updated.status, ClientStatus::Inactive);
    assert!(!active.contains(maria.id));
    assert!(active.contains(jose.id));
    assert_eq!(
        active.phase(),
        &QueuePhase::Confirmed {
            client_id: maria.id,
            transition: StatusTransition::Deactivate,
        }
    );

    inactive.fetch(&gateway, worker()).await.unwrap();
    assert!(inactive.contains(maria.id));
    assert!(!(active.contains(maria.id) && inactive.contains(maria.id)));

    inactive
        .transition(&gateway, worker(), maria.id, StatusTransition::Restore)
        .await
        .unwrap();
    active.fetch(&gateway, worker()).await.unwrap();
    assert!(active.contains(maria.id));
    assert!(!inactive.contains(maria.id));
}

#[tokio::test]
async fn failed_transition_rolls_back() {
    let gateway = StoreGateway::new();
    let maria = gateway.seed_client("Maria Santos");

    let mut active = StatusQueue::new(ClientStatus::Active);
    active.fetch(&gateway, worker()).await.unwrap();
    gateway.fail("set_status", Fault::Network);

    let err = active
        .transition(&gateway, worker(), maria.id, StatusTransition::Deactivate)
        .await
        .unwrap_err();

    assert!(matches!(err, OutreachError::Network(_)));
    assert!(active.contains(maria.id));
    assert!(matches!(active.phase(), QueuePhase::RolledBack { client_id, .. } if *client_id == maria.id));
    assert_eq!(
        gateway.with_store(|s| s.client(maria.id).unwrap().status),
        ClientStatus::Active
    );
}

#[tokio::test]
async fn transition_must_fit_the_queue() {
    let gateway = StoreGateway::new();
    let maria = gateway.seed_client("Maria Santos");

    let mut active = StatusQueue::new(ClientStatus::Active);
    active.fetch(&gateway, worker()).await.unwrap();

    let err = active
        .transition(&gateway, worker(), maria.id, StatusTransition::Restore)
        .await
        .unwrap_err();
    assert!(matches!(err, OutreachError::InvalidState(_)));

    let err = active
        .transition(&gateway, worker(), ClientId(404), StatusTransition::Deactivate)
        .await
        .unwrap_err();
    assert!(matches!(err, OutreachError::InvalidState(_)));
    assert_eq!(gateway.calls("set_status"), 0);
}

#[tokio::test]
async fn pending_intake_is_activated_by_admin() {
    let gateway = StoreGateway::new();
    let intake = directory::submit_intake(&gateway, new_client("Lorna Dela Cruz")).await.unwrap();
    assert_eq!(intake.status, ClientStatus::Pending);
    assert_eq!(intake.worker_id, None);

    let mut pending = StatusQueue::new(ClientStatus::Pending);
    pending.fetch(&gateway, admin()).await.unwrap();
    assert!(pending.contains(intake.id));

    let err = pending
        .transition(&gateway, admin(), intake.id, StatusTransition::Activate)
        .await
        .unwrap_err();
    assert!(matches!(err, OutreachError::InvalidState(_)));
    assert_eq!(gateway.calls("set_status"), 0);
    assert!(pending.contains(intake.id));

    let activated = pending
        .activate(&gateway, admin(), intake.id, WORKER)
        .await
        .unwrap();
    assert_eq!(activated.status, ClientStatus::Active);
    assert_eq!(activated.worker_id, Some(WORKER));
    assert!(pending.clients().is_empty());

    let mut active = StatusQueue::new(ClientStatus::Active);
    active.fetch(&gateway, worker()).await.unwrap();
    assert!(active.contains(intake.id));

    directory::enroll(&gateway, worker(), intake.id, Category::Diabetes).await.unwrap();
    let mut roster = CategoryRoster::new(Category::Diabetes);
    roster.fetch(&gateway, worker()).await.unwrap();
    assert_eq!(roster.clients()[0].id, intake.id);
}

#[tokio::test]
async fn registration_is_validated_before_sending() {
    let gateway = StoreGateway::new();

    let err = directory::register_client(&gateway, worker(), NewClient {
        name: "   ".to_string(),
        address: "Sitio Malinis".to_string(),
        ..NewClient::default()
    })
    .await
    .unwrap_err();
    let OutreachError::Validation(issues) = err else {
        panic!("expected validation failure, got {err:?}");
    };
    assert_eq!(issues[0].field_id, "name");
    assert_eq!(issues[0].issue, ValidationIssue::Missing);

    let err = directory::submit_intake(&gateway, NewClient {
        name: "Lorna".to_string(),
        ..NewClient::default()
    })
    .await
    .unwrap_err();
    assert!(matches!(err, OutreachError::Validation(_)));

    assert_eq!(gateway.calls("register_client"), 0);
    assert_eq!(gateway.calls("submit_intake"), 0);

    let client = directory::register_client(&gateway, worker(), new_client("Lorna"))
        .await
        .unwrap();
    assert_eq!(client.status, ClientStatus::Active);
    assert_eq!(client.worker_id, Some(WORKER));
}

#[tokio::test]
async fn position_is_range_checked_locally() {
    let gateway = StoreGateway::new();
    let client = gateway.seed_client("Maria Santos");

    let err = directory::update_position(&gateway, worker(), client.id, Position {
        latitude: 91.0,
        longitude: 121.0,
    })
    .await
    .unwrap_err();
    assert!(matches!(err, OutreachError::Validation(_)));
    assert_eq!(gateway.calls("update_position"), 0);

    let position = Position {
        latitude: 10.3157,
        longitude: 123.8854,
    };
    let updated = directory::update_position(&gateway, worker(), client.id, position)
        .await
        .unwrap();
    assert_eq!(updated.position, Some(position));
}

#[tokio::test]
async fn condition_update_and_missing_client() {
    let gateway = StoreGateway::new();
    let client = gateway.seed_client("Maria Santos");

    let updated = directory::update_condition(&gateway, worker(), client.id, ClientCondition::Transfer)
        .await
        .unwrap();
    assert_eq!(updated.condition, ClientCondition::Transfer);

    let err = directory::update_condition(
        &gateway,
        Session::worker(WORKER),
        ClientId(999),
        ClientCondition::Deceased,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, OutreachError::ConflictNotFound(_)));
}
