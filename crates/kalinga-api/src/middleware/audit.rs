use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use kalinga_core::endpoints::WORKER_ID_HEADER;

/// Logs every request with its outcome and latency.
pub async fn audit_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let worker = req
        .headers()
        .get(WORKER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        worker = worker.as_deref(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "api_request"
    );

    response
}
