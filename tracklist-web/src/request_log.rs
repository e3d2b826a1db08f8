//! Request logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Logs method, path, status and latency of every request.
///
/// The query string can carry search text, so the full URI is only logged
/// at trace level.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = started.elapsed().as_millis();
    tracing::trace!(%uri, "request uri");
    tracing::info!(
        status = response.status().as_u16(),
        "{} {} - {}ms",
        method,
        uri.path(),
        elapsed_ms
    );

    response
}
