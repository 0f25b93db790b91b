use axum::extract::{Query, State};
use axum::{Extension, Json};
use jiff::tz::TimeZone;

use kalinga_core::models::category::Category;
use kalinga_core::models::session::{Session, WorkerId};
use kalinga_core::models::statistics::{AgeSegmentation, StatsQuery, TimeSeries, TimeWindow, TotalCount};

use crate::error::ApiError;
use crate::middleware::auth::worker_filter;
use crate::routes::roster::check_category_name;
use crate::state::AppState;

/// Resolve the shared statistics query into a worker scope and window.
fn scope(
    category: Category,
    session: &Session,
    query: &StatsQuery,
) -> Result<(Option<WorkerId>, TimeWindow), ApiError> {
    check_category_name(category, query.category_name.as_deref())?;
    let worker = worker_filter(session, query.worker_id)?;
    let window = query.window()?;
    Ok((worker, window))
}

pub async fn count_total_clients(
    State(state): State<AppState>,
    Extension(category): Extension<Category>,
    Extension(session): Extension<Session>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<TotalCount>, ApiError> {
    let (worker, window) = scope(category, &session, &query)?;
    let store = state.store.lock().await;
    Ok(Json(store.total_count(category, worker, window, query.variant)))
}

pub async fn age_segmentation(
    State(state): State<AppState>,
    Extension(category): Extension<Category>,
    Extension(session): Extension<Session>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<AgeSegmentation>, ApiError> {
    let (worker, window) = scope(category, &session, &query)?;
    let today = jiff::Timestamp::now().to_zoned(TimeZone::UTC).date();
    let store = state.store.lock().await;
    Ok(Json(store.age_segmentation(category, worker, window, today)))
}

pub async fn new_registered(
    State(state): State<AppState>,
    Extension(category): Extension<Category>,
    Extension(session): Extension<Session>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<TimeSeries>, ApiError> {
    let (worker, window) = scope(category, &session, &query)?;
    let store = state.store.lock().await;
    Ok(Json(store.registrations(category, worker, window)))
}

/// Visit-record updates over time.
pub async fn category_data(
    State(state): State<AppState>,
    Extension(category): Extension<Category>,
    Extension(session): Extension<Session>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<TimeSeries>, ApiError> {
    let (worker, window) = scope(category, &session, &query)?;
    let store = state.store.lock().await;
    Ok(Json(store.updates(category, worker, window)))
}
