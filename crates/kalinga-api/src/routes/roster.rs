use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use kalinga_core::models::category::Category;
use kalinga_core::models::client::{Client, RosterQuery};
use kalinga_core::models::enrollment::{EnrollRequest, Enrollment};
use kalinga_core::models::session::Session;

use crate::audit::AuditEvent;
use crate::error::ApiError;
use crate::middleware::auth::{authorize_client, worker_filter};
use crate::state::AppState;

pub(crate) fn check_category_name(category: Category, name: Option<&str>) -> Result<(), ApiError> {
    match name {
        None => Ok(()),
        Some(name) if Category::from_label(name) == Some(category) => Ok(()),
        Some(name) => Err(ApiError::BadRequest(format!(
            "category_name '{name}' does not match {}",
            category.label()
        ))),
    }
}

/// Active clients enrolled in this program.
pub async fn list_roster(
    State(state): State<AppState>,
    Extension(category): Extension<Category>,
    Extension(session): Extension<Session>,
    Query(query): Query<RosterQuery>,
) -> Result<Json<Vec<Client>>, ApiError> {
    check_category_name(category, query.category_name.as_deref())?;
    let worker = worker_filter(&session, query.worker_id)?;

    let store = state.store.lock().await;
    Ok(Json(store.category_roster(category, worker)))
}

pub async fn enroll(
    State(state): State<AppState>,
    Extension(category): Extension<Category>,
    Extension(session): Extension<Session>,
    Json(request): Json<EnrollRequest>,
) -> Result<(StatusCode, Json<Enrollment>), ApiError> {
    let enrollment = state
        .commit(|store| {
            let client = store.client(request.client_id)?;
            authorize_client(&session, client)?;
            let worker = client.worker_id.or(Some(session.worker_id));
            Ok(store.enroll(request.client_id, category, worker, jiff::Timestamp::now())?)
        })
        .await?;

    AuditEvent::new("enroll", category.slug(), request.client_id, Some(&session)).emit();
    Ok((StatusCode::CREATED, Json(enrollment)))
}
