mod common;

use serde_json::json;

use common::{Fault, StoreGateway, values, worker};
use kalinga_core::models::category::Category;
use kalinga_forms::error::FormError;
use kalinga_forms::schema::ValidationIssue;
use kalinga_outreach::OutreachError;
use kalinga_outreach::form::{FormMode, FormSession};

#[test]
fn bmi_follows_height_and_weight() {
    let gateway = StoreGateway::new();
    let client = gateway.seed_client("Maria Santos");
    let mut form = FormSession::create(client.identity(), Category::Pregnant);

    form.set_field("height_cm", json!(160)).unwrap();
    assert!(form.value("bmi").is_none());
    form.set_field("weight_kg", json!(64)).unwrap();
    assert_eq!(form.value("bmi"), Some(&json!(25.0)));

    form.set_field("height_cm", json!(175)).unwrap();
    form.set_field("weight_kg", json!(70)).unwrap();
    assert_eq!(form.value("bmi"), Some(&json!(22.86)));
}

#[test]
fn bmi_keeps_last_value_on_zero_height() {
    let gateway = StoreGateway::new();
    let client = gateway.seed_client("Maria Santos");
    let mut form = FormSession::create(client.identity(), Category::SeniorCitizen);

    form.set_input("height_cm", "160").unwrap();
    form.set_input("weight_kg", "64").unwrap();
    form.set_field("height_cm", json!(0)).unwrap();

    assert_eq!(form.value("bmi"), Some(&json!(25.0)));
}

#[test]
fn identity_and_derived_fields_are_read_only() {
    let gateway = StoreGateway::new();
    let client = gateway.seed_client("Maria Santos");
    let mut form = FormSession::create(client.identity(), Category::Pregnant);

    assert!(matches!(form.set_field("bmi", json!(30)), Err(FormError::ReadOnly(_))));
    assert!(matches!(
        form.set_field("client_name", json!("Someone Else")),
        Err(FormError::ReadOnly(_))
    ));
    assert!(matches!(
        form.set_field("blood_type", json!("O")),
        Err(FormError::UnknownField { .. })
    ));
    assert!(matches!(
        form.set_input("lmp", "last tuesday"),
        Err(FormError::InvalidInput { .. })
    ));
    assert!(!form.is_dirty());
}

#[test]
fn view_shows_client_identity_read_only() {
    let gateway = StoreGateway::new();
    let client = gateway.seed_client("Maria Santos");
    let form = FormSession::create(client.identity(), Category::Newborn);

    let view = form.view();
    assert_eq!(view.title, "Essential Newborn Care");
    assert_eq!(view.mode, FormMode::Create);

    let identity = &view.sections[0];
    assert_eq!(identity.fields[0].value, Some(json!("Maria Santos")));
    assert_eq!(identity.fields[1].value, Some(json!("Purok 3, Barangay San Roque")));
    assert!(identity.fields.iter().all(|f| !f.editable));

    let visit = &view.sections[1];
    assert!(visit.fields.iter().any(|f| f.id == "visit_date" && f.editable && f.required));
}

#[tokio::test]
async fn invalid_form_is_not_sent() {
    let gateway = StoreGateway::new();
    let client = gateway.seed_client("Maria Santos");
    let mut form = FormSession::create(client.identity(), Category::Hypertension);
    form.set_input("visit_date", "2026-06-01").unwrap();
    form.set_input("bp_systolic", "400").unwrap();

    let err = form.submit(&gateway, worker()).await.unwrap_err();
    let OutreachError::Validation(issues) = err else {
        panic!("expected validation failure, got {err:?}");
    };
    assert!(issues.iter().any(|i| i.field_id == "bp_systolic" && i.issue == ValidationIssue::OutOfRange));
    assert!(issues.iter().any(|i| i.field_id == "bp_diastolic" && i.issue == ValidationIssue::Missing));

    assert_eq!(gateway.calls("create_record"), 0);
    assert!(form.last_error().is_some());
}

#[tokio::test]
async fn create_submission_leaves_identity_out() {
    let gateway = StoreGateway::new();
    let client = gateway.seed_client("Maria Santos");
    let mut form = FormSession::create(client.identity(), Category::Pregnant);
    form.set_input("visit_date", "2026-06-01").unwrap();
    form.set_input("lmp", "2026-03-01").unwrap();
    form.set_input("iron_folic", "yes").unwrap();

    let record = form.submit(&gateway, worker()).await.unwrap();

    assert_eq!(record.category, Category::Pregnant);
    assert_eq!(record.values.get("iron_folic"), Some(&json!(true)));
    assert!(!record.values.contains_key("client_name"));
    assert!(!record.values.contains_key("address"));
    assert!(!form.is_dirty());
    assert!(form.last_error().is_none());
}

#[tokio::test]
async fn unchanged_edit_resubmits_same_values() {
    let gateway = StoreGateway::new();
    let client = gateway.seed_client("Maria Santos");
    let stored = gateway.seed_record(
        Category::Pregnant,
        client.id,
        values(&[
            ("visit_date", json!("2026-04-02")),
            ("lmp", json!("2026-03-01")),
            ("height_cm", json!(160.0)),
            ("weight_kg", json!(64.0)),
            ("bmi", json!(25.0)),
        ]),
    );

    let mut form = FormSession::edit(client.identity(), &stored);
    assert_eq!(form.mode(), FormMode::Edit { record_id: stored.id });
    assert!(!form.is_dirty());

    let updated = form.submit(&gateway, worker()).await.unwrap();

    assert_eq!(updated.id, stored.id);
    assert_eq!(updated.values, stored.values);
    assert!(updated.updated_at >= stored.updated_at);
    assert_eq!(gateway.calls("update_record"), 1);
    assert_eq!(gateway.calls("create_record"), 0);
}

#[test]
fn edit_recomputes_stale_bmi() {
    let gateway = StoreGateway::new();
    let client = gateway.seed_client("Maria Santos");
    let stored = gateway.seed_record(
        Category::Diabetes,
        client.id,
        values(&[
            ("visit_date", json!("2026-04-02")),
            ("height_cm", json!(175)),
            ("weight_kg", json!(70)),
            ("bmi", json!(99.0)),
        ]),
    );

    let form = FormSession::edit(client.identity(), &stored);
    assert_eq!(form.value("bmi"), Some(&json!(22.86)));
}

#[tokio::test]
async fn edit_keeps_fields_outside_the_form() {
    let gateway = StoreGateway::new();
    let client = gateway.seed_client("Maria Santos");
    let stored = gateway.seed_record(
        Category::Pregnant,
        client.id,
        values(&[
            ("visit_date", json!("2026-04-02")),
            ("lmp", json!("2026-03-01")),
            ("legacy_note", json!("paper card #12")),
        ]),
    );

    let mut form = FormSession::edit(client.identity(), &stored);
    assert!(form.value("legacy_note").is_none());
    form.set_input("risk_level", "High").unwrap();
    assert!(form.is_dirty());

    let updated = form.submit(&gateway, worker()).await.unwrap();
    assert_eq!(updated.values.get("risk_level"), Some(&json!("high")));
    assert_eq!(updated.values.get("legacy_note"), Some(&json!("paper card #12")));
}

#[tokio::test]
async fn missing_record_on_edit_is_reported() {
    let gateway = StoreGateway::new();
    let client = gateway.seed_client("Maria Santos");
    let stored = gateway.seed_record(
        Category::Pregnant,
        client.id,
        values(&[("visit_date", json!("2026-04-02")), ("lmp", json!("2026-03-01"))]),
    );
    gateway.fail("update_record", Fault::NotFound);

    let mut form = FormSession::edit(client.identity(), &stored);
    let err = form.submit(&gateway, worker()).await.unwrap_err();

    assert!(matches!(err, OutreachError::ConflictNotFound(_)));
    assert_eq!(form.value("visit_date"), Some(&json!("2026-04-02")));
}

#[test]
fn cleared_field_is_not_a_change() {
    let gateway = StoreGateway::new();
    let client = gateway.seed_client("Maria Santos");
    let mut form = FormSession::create(client.identity(), Category::MentalHealth);

    form.set_input("remarks", "follow up in two weeks").unwrap();
    assert!(form.is_dirty());
    form.set_input("remarks", "   ").unwrap();
    assert!(!form.is_dirty());
}
