use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use kalinga_core::endpoints::{WORKER_ID_HEADER, WORKER_ROLE_HEADER};
use kalinga_core::models::client::Client;
use kalinga_core::models::session::{Role, Session, WorkerId};

use crate::error::ApiError;

/// Session middleware.
///
/// Reads the worker id and role headers set by the field client and inserts
/// the resulting [`Session`] into request extensions. Credential checks
/// happen upstream of this service.
pub async fn require_session(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let session = session_from_headers(req.headers())?;
    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

pub fn session_from_headers(headers: &HeaderMap) -> Result<Session, ApiError> {
    let worker_id = header(headers, WORKER_ID_HEADER)?
        .parse::<u64>()
        .map_err(|_| ApiError::Unauthorized(format!("invalid {WORKER_ID_HEADER} header")))?;
    let role = header(headers, WORKER_ROLE_HEADER)?
        .parse::<Role>()
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    Ok(Session {
        worker_id: WorkerId(worker_id),
        role,
    })
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, ApiError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Unauthorized(format!("missing {name} header")))
}

pub fn require_admin(session: &Session) -> Result<(), ApiError> {
    if session.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden("administrator role required".to_string()))
    }
}

/// Administrators may touch any client; workers only the clients they enrolled.
pub fn authorize_client(session: &Session, client: &Client) -> Result<(), ApiError> {
    if session.is_admin() || client.worker_id == Some(session.worker_id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "client {} belongs to another worker",
            client.id
        )))
    }
}

/// Resolve the worker filter of a list or statistics query. Workers are
/// always scoped to themselves and may not ask for another worker's data.
pub fn worker_filter(session: &Session, requested: Option<u64>) -> Result<Option<WorkerId>, ApiError> {
    match session.worker_scope() {
        None => Ok(requested.map(WorkerId)),
        Some(own) if requested.is_none_or(|r| r == own.0) => Ok(Some(own)),
        Some(_) => Err(ApiError::Forbidden(
            "workers may only query their own clients".to_string(),
        )),
    }
}
