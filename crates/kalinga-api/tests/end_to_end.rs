//! The field client's reconciliation flow against a live record store.

use serde_json::json;
use tokio::net::TcpListener;

use kalinga_api::router;
use kalinga_api::state::AppState;
use kalinga_core::models::category::Category;
use kalinga_core::models::client::{ClientCondition, ClientId, ClientStatus, NewClient, StatusTransition};
use kalinga_core::models::session::{Role, Session, WorkerId};
use kalinga_gateway::RecordGateway;
use kalinga_gateway::config::GatewayConfig;
use kalinga_gateway::error::GatewayError;
use kalinga_gateway::http::HttpGateway;
use kalinga_outreach::OutreachError;
use kalinga_outreach::directory::{self, StatusQueue};
use kalinga_outreach::form::FormMode;
use kalinga_outreach::reconcile::{Choice, LookupOutcome, Phase, Reconciler};

const WORKER: Session = Session {
    worker_id: WorkerId(7),
    role: Role::Worker,
};

async fn spawn_store() -> HttpGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(AppState::in_memory())).await.unwrap();
    });
    HttpGateway::new(&GatewayConfig::new(format!("http://{addr}"))).unwrap()
}

fn resident(name: &str) -> NewClient {
    NewClient {
        name: name.to_string(),
        address: "Purok 5, Barangay Poblacion".to_string(),
        ..NewClient::default()
    }
}

#[tokio::test]
async fn first_visit_then_choice_on_return() {
    let gateway = spawn_store().await;
    let client = directory::register_client(&gateway, WORKER, resident("Maria Santos"))
        .await
        .unwrap();

    let mut reconciler = Reconciler::default();
    let outcome = reconciler
        .open(&gateway, WORKER, client.identity(), Category::Pregnant)
        .await
        .unwrap();
    assert_eq!(outcome, LookupOutcome::FormOpened { assumed_empty: false });

    let form = reconciler.form_mut().unwrap();
    assert_eq!(form.mode(), FormMode::Create);
    form.set_input("visit_date", "2026-06-01").unwrap();
    form.set_input("lmp", "2026-03-01").unwrap();
    form.set_input("height_cm", "160").unwrap();
    form.set_input("weight_kg", "64").unwrap();
    let first = reconciler.submit(&gateway, WORKER).await.unwrap();
    assert_eq!(first.values.get("bmi"), Some(&json!(25.0)));

    let records = gateway
        .visit_records(WORKER, Category::Pregnant, client.id)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, first.id);

    let outcome = reconciler
        .open(&gateway, WORKER, client.identity(), Category::Pregnant)
        .await
        .unwrap();
    assert_eq!(outcome, LookupOutcome::ChoiceRequired { count: 1 });
    reconciler.choose(Choice::CreateNew).unwrap();
    let form = reconciler.form_mut().unwrap();
    form.set_input("visit_date", "2026-07-01").unwrap();
    form.set_input("lmp", "2026-03-01").unwrap();
    let second = reconciler.submit(&gateway, WORKER).await.unwrap();

    reconciler
        .open(&gateway, WORKER, client.identity(), Category::Pregnant)
        .await
        .unwrap();
    reconciler.choose(Choice::ProceedToExisting).unwrap();
    let entries = reconciler.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].record_id, first.id);
    assert_eq!(entries[1].record_id, second.id);

    reconciler.select(2).unwrap();
    let form = reconciler.form_mut().unwrap();
    assert_eq!(form.mode(), FormMode::Edit { record_id: second.id });
    form.set_input("risk_level", "moderate").unwrap();
    let amended = reconciler.submit(&gateway, WORKER).await.unwrap();
    assert_eq!(amended.id, second.id);
    assert_eq!(amended.values.get("risk_level"), Some(&json!("moderate")));
    assert_eq!(amended.values.get("visit_date"), Some(&json!("2026-07-01")));
    assert_eq!(reconciler.phase(), Phase::Idle);
}

#[tokio::test]
async fn unknown_client_lookup_is_not_found() {
    let gateway = spawn_store().await;
    let err = gateway
        .visit_records(WORKER, Category::Newborn, ClientId(42))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::NotFound(_)));
}

#[tokio::test]
async fn deactivation_round_trip() {
    let gateway = spawn_store().await;
    let client = directory::register_client(&gateway, WORKER, resident("Jose Rizal"))
        .await
        .unwrap();

    let mut active = StatusQueue::new(ClientStatus::Active);
    active.fetch(&gateway, WORKER).await.unwrap();
    assert!(active.contains(client.id));

    active
        .transition(&gateway, WORKER, client.id, StatusTransition::Deactivate)
        .await
        .unwrap();
    assert!(!active.contains(client.id));

    let mut inactive = StatusQueue::new(ClientStatus::Inactive);
    inactive.fetch(&gateway, WORKER).await.unwrap();
    assert!(inactive.contains(client.id));
}

#[tokio::test]
async fn foreign_worker_is_refused() {
    let gateway = spawn_store().await;
    let client = directory::register_client(&gateway, WORKER, resident("Ana Cruz"))
        .await
        .unwrap();

    let stranger = Session::worker(WorkerId(8));
    let err = directory::update_condition(
        &gateway,
        stranger,
        client.id,
        ClientCondition::Deceased,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, OutreachError::Rejected { status: 403, .. }));
}
