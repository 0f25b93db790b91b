use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use kalinga_core::models::category::Category;
use kalinga_core::models::client::ClientId;
use kalinga_core::models::session::Session;
use kalinga_core::models::visit_record::{NewVisitRecord, RecordId, VisitRecord, VisitRecordUpdate};

use crate::audit::AuditEvent;
use crate::error::ApiError;
use crate::middleware::auth::authorize_client;
use crate::state::AppState;

/// Existing visit records of a client in this program, in visit order.
pub async fn list_client_records(
    State(state): State<AppState>,
    Extension(category): Extension<Category>,
    Extension(session): Extension<Session>,
    Path(client_id): Path<u64>,
) -> Result<Json<Vec<VisitRecord>>, ApiError> {
    let client_id = ClientId(client_id);
    let store = state.store.lock().await;
    authorize_client(&session, store.client(client_id)?)?;
    Ok(Json(store.records_for(category, client_id)?))
}

pub async fn create_record(
    State(state): State<AppState>,
    Extension(category): Extension<Category>,
    Extension(session): Extension<Session>,
    Json(new): Json<NewVisitRecord>,
) -> Result<(StatusCode, Json<VisitRecord>), ApiError> {
    let record = state
        .commit(|store| {
            authorize_client(&session, store.client(new.client_id)?)?;
            Ok(store.create_record(category, new, jiff::Timestamp::now())?)
        })
        .await?;

    AuditEvent::new("create", category.slug(), record.id, Some(&session))
        .with_details(serde_json::json!({ "client_id": record.client_id }))
        .emit();
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_record(
    State(state): State<AppState>,
    Extension(category): Extension<Category>,
    Extension(session): Extension<Session>,
    Path(record_id): Path<u64>,
    Json(update): Json<VisitRecordUpdate>,
) -> Result<Json<VisitRecord>, ApiError> {
    let record_id = RecordId(record_id);
    let fields: Vec<String> = update.values.keys().cloned().collect();
    let record = state
        .commit(|store| {
            let owner = store.record(category, record_id)?.client_id;
            authorize_client(&session, store.client(owner)?)?;
            Ok(store.update_record(category, record_id, update.values, jiff::Timestamp::now())?)
        })
        .await?;

    AuditEvent::new("update", category.slug(), record_id, Some(&session))
        .with_details(serde_json::json!({ "fields": fields }))
        .emit();
    Ok(Json(record))
}
