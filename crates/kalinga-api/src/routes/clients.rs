use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use kalinga_core::models::client::{
    Client, ClientId, ClientListQuery, ConditionUpdate, NewClient, Position, StatusTransition,
    StatusUpdate,
};
use kalinga_core::models::session::Session;

use crate::audit::AuditEvent;
use crate::error::ApiError;
use crate::middleware::auth::{authorize_client, require_admin, worker_filter};
use crate::state::AppState;

/// Public self-service registration. The client waits for activation.
pub async fn submit_intake(
    State(state): State<AppState>,
    Json(new): Json<NewClient>,
) -> Result<(StatusCode, Json<Client>), ApiError> {
    let client = state
        .commit(|store| Ok(store.submit_intake(new, jiff::Timestamp::now())?))
        .await?;

    AuditEvent::new("intake", "client", client.id, None).emit();
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn register_client(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(new): Json<NewClient>,
) -> Result<(StatusCode, Json<Client>), ApiError> {
    let client = state
        .commit(|store| Ok(store.register_client(new, session.worker_id, jiff::Timestamp::now())?))
        .await?;

    AuditEvent::new("register", "client", client.id, Some(&session)).emit();
    Ok((StatusCode::CREATED, Json(client)))
}

/// One lifecycle queue. Pending intake has no enrolling worker, so workers
/// asking for the pending queue get only what they own, which is nothing.
pub async fn list_clients(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<ClientListQuery>,
) -> Result<Json<Vec<Client>>, ApiError> {
    let worker = worker_filter(&session, query.worker_id)?;
    let store = state.store.lock().await;
    Ok(Json(store.list_clients(worker, query.status)))
}

pub async fn update_status(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<u64>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Client>, ApiError> {
    let id = ClientId(id);
    let (client, transition) = state
        .commit(|store| {
            let current = store.client(id)?;
            let activating = StatusTransition::between(current.status, update.status)
                == Some(StatusTransition::Activate);
            if activating {
                require_admin(&session)?;
                if update.worker_id.or(current.worker_id).is_none() {
                    return Err(ApiError::BadRequest(format!(
                        "client {id} has no enrolling worker; activation needs worker_id"
                    )));
                }
            } else {
                authorize_client(&session, current)?;
                if update.worker_id.is_some() {
                    return Err(ApiError::BadRequest(
                        "worker_id is only accepted when activating intake".to_string(),
                    ));
                }
            }

            let now = jiff::Timestamp::now();
            let (mut client, transition) = store.set_status(id, update.status, now)?;
            if let Some(worker) = update.worker_id {
                client = store.assign_worker(id, worker, now)?;
            }
            Ok((client, transition))
        })
        .await?;

    AuditEvent::new("status", "client", id, Some(&session))
        .with_details(serde_json::json!({
            "transition": transition,
            "status": client.status,
            "worker_id": client.worker_id,
        }))
        .emit();
    Ok(Json(client))
}

pub async fn update_position(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<u64>,
    Json(position): Json<Position>,
) -> Result<Json<Client>, ApiError> {
    let id = ClientId(id);
    let client = state
        .commit(|store| {
            authorize_client(&session, store.client(id)?)?;
            Ok(store.update_position(id, position, jiff::Timestamp::now())?)
        })
        .await?;

    AuditEvent::new("position", "client", id, Some(&session)).emit();
    Ok(Json(client))
}

pub async fn update_condition(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(update): Json<ConditionUpdate>,
) -> Result<Json<Client>, ApiError> {
    let client = state
        .commit(|store| {
            authorize_client(&session, store.client(update.client_id)?)?;
            Ok(store.update_condition(update.client_id, update.condition, jiff::Timestamp::now())?)
        })
        .await?;

    AuditEvent::new("condition", "client", update.client_id, Some(&session))
        .with_details(serde_json::json!({ "condition": update.condition }))
        .emit();
    Ok(Json(client))
}
