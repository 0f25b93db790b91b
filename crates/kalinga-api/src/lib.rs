//! kalinga-api
//!
//! HTTP record store: the REST surface the field client talks to. Clients,
//! enrollments and visit records live in a [`RecordStore`] behind a single
//! async mutex, optionally snapshotted to disk after every write.
//!
//! [`RecordStore`]: kalinga_storage::store::RecordStore

pub mod audit;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use axum::{Extension, Router};
use tower_http::cors::{Any, CorsLayer};

use kalinga_core::endpoints;
use kalinga_core::models::category::Category;

use state::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // No session required
    let public = Router::new()
        .route(endpoints::HEALTH, get(routes::health::health_check))
        .route(endpoints::FORMS, get(routes::forms::list_forms))
        .route("/forms/{slug}", get(routes::forms::get_form))
        .route(endpoints::CLIENT_INTAKE, post(routes::clients::submit_intake));

    let mut protected = Router::new()
        .route(
            endpoints::CLIENTS,
            get(routes::clients::list_clients).post(routes::clients::register_client),
        )
        .route("/clients/{id}/status", put(routes::clients::update_status))
        .route("/clients/{id}/position", put(routes::clients::update_position))
        .route(
            endpoints::UPDATE_CLIENT_CONDITION,
            post(routes::clients::update_condition),
        );
    for category in Category::ALL {
        protected = protected.merge(category_routes(category));
    }
    let protected = protected.route_layer(axum_mw::from_fn(middleware::auth::require_session));

    public
        .merge(protected)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}

/// Record, roster and statistics routes of one program. Handlers receive the
/// program as an `Extension<Category>`.
fn category_routes(category: Category) -> Router<AppState> {
    let slug = category.slug();
    Router::new()
        .route(&format!("/{slug}"), post(routes::records::create_record))
        .route(
            &format!("/{slug}/{{record_id}}"),
            put(routes::records::update_record),
        )
        .route(
            &format!("/{slug}-form/{{client_id}}"),
            get(routes::records::list_client_records),
        )
        .route(
            &endpoints::category_clients(category),
            get(routes::roster::list_roster).post(routes::roster::enroll),
        )
        .route(
            &endpoints::count_total_clients(category),
            get(routes::stats::count_total_clients),
        )
        .route(
            &endpoints::age_segmentation(category),
            get(routes::stats::age_segmentation),
        )
        .route(
            &endpoints::new_registered(category),
            get(routes::stats::new_registered),
        )
        .route(
            &endpoints::category_data(category),
            get(routes::stats::category_data),
        )
        .layer(Extension(category))
}
