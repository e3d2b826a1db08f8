//! API handlers for liveness and track resolution

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracklist_search::{Cancelled, ResolveParams};

use crate::server::AppState;

/// Body of the liveness route.
pub const LIVENESS_MESSAGE: &str = "API is running.";

/// Liveness probe.
pub async fn hello() -> &'static str {
    LIVENESS_MESSAGE
}

/// Resolves a query against every selected provider.
///
/// The resolve call runs under a child of the server's shutdown token. If the
/// client disconnects, axum drops this future and every provider call with
/// it; the drop guard cancels the token so nothing derived from it outlives
/// the request.
///
/// A query string that cannot be deserialized is answered with the same
/// `{"message": ...}` 400 body as a missing query.
pub async fn resolve(
    State(state): State<AppState>,
    params: Result<Query<ResolveParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return malformed_query(&rejection),
    };

    let cancel = state.shutdown.child_token();
    let _cancel_on_drop = cancel.clone().drop_guard();

    match state.resolver.resolve(&params, &cancel).await {
        Ok(response) => {
            let status = StatusCode::from_u16(response.status()).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, Json(response.body())).into_response()
        }
        Err(Cancelled) => {
            tracing::debug!("resolve cancelled by server shutdown");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

fn malformed_query(rejection: &QueryRejection) -> Response {
    let message = rejection.body_text();
    tracing::debug!(%message, "rejecting malformed query string");
    (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;
    use tracklist_core::TracklistConfig;
    use tracklist_search::testing::ScriptedTransport;
    use tracklist_search::{Provider, ProviderError, TrackResolver};

    use crate::server::{AppState, build_router};

    fn app(transport: &ScriptedTransport, shutdown: CancellationToken) -> Router {
        let resolver = TrackResolver::new(
            &TracklistConfig::for_testing(),
            Arc::new(transport.clone()),
        );
        build_router(AppState::new(resolver, shutdown))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_liveness() {
        let (status, body) = get(app(&ScriptedTransport::new(), CancellationToken::new()), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"API is running.");
    }

    #[tokio::test]
    async fn test_missing_query_is_bad_request() {
        let transport = ScriptedTransport::new();
        let (status, body) = get(app(&transport, CancellationToken::new()), "/resolve?q=").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"message": "Required ':q?' parameter is missing"}));
        assert_eq!(transport.dispatch_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_parameter_is_json_bad_request() {
        let transport = ScriptedTransport::new();
        let (status, body) = get(app(&transport, CancellationToken::new()), "/resolve?q=a&q=b").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("duplicate field"), "{message}");
        assert_eq!(body.as_object().unwrap().len(), 1);
        assert_eq!(transport.dispatch_count(), 0);
    }

    #[tokio::test]
    async fn test_resolve_returns_map_keyed_by_provider() {
        let transport = ScriptedTransport::new()
            .respond(Provider::SoundCloud, json!([{"id": 1}]))
            .fail(Provider::YouTube, ProviderError::Timeout { timeout_ms: 2000 });

        let (status, body) = get(
            app(&transport, CancellationToken::new()),
            "/resolve?q=daft%20punk&limit=500",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["soundcloud"], json!([{"id": 1}]));
        assert_eq!(body["youtube"]["kind"], "timeout");

        let limits: Vec<_> = transport.requests().iter().map(|r| r.limit).collect();
        assert_eq!(limits.len(), 2);
        assert!(limits.contains(&100) && limits.contains(&50));
    }

    #[tokio::test]
    async fn test_total_failure_status() {
        let transport = ScriptedTransport::new()
            .fail(
                Provider::SoundCloud,
                ProviderError::Http {
                    status: 401,
                    reason: "unauthorized".to_string(),
                },
            )
            .fail(
                Provider::YouTube,
                ProviderError::Transport {
                    reason: "connection refused".to_string(),
                },
            );

        let (status, _) = get(app(&transport, CancellationToken::new()), "/resolve?q=x").await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_resolve() {
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let (status, body) = get(app(&ScriptedTransport::new(), shutdown), "/resolve?q=x").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.is_empty());
    }
}
