//! Local stand-in for the provider APIs.
//!
//! Serves the provider paths on an ephemeral port. Behaviour is keyed off the
//! request so a single server covers every scenario:
//!
//! - `/tracks/` echoes its query parameters
//! - `/youtube/v3/search` answers 403 when `key=bad`, otherwise echoes
//! - `/search/` (Mixcloud) answers with a body that is not JSON
//! - `/v1/search/` echoes the `Authorization` header
//!
//! Any request whose `q` is `slow` sleeps for [`SLOW_DELAY`] first.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde_json::json;
use tokio::net::TcpListener;

pub const SLOW_DELAY: Duration = Duration::from_secs(5);

type Params = Query<HashMap<String, String>>;

pub struct MockProvider {
    address: SocketAddr,
}

impl MockProvider {
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/tracks/", get(soundcloud))
            .route("/youtube/v3/search", get(youtube))
            .route("/search/", get(mixcloud))
            .route("/v1/search/", get(spotify));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { address }
    }

    pub fn origin(&self) -> String {
        format!("http://{}", self.address)
    }
}

async fn stall_if_slow(params: &HashMap<String, String>) {
    if params.get("q").map(String::as_str) == Some("slow") {
        tokio::time::sleep(SLOW_DELAY).await;
    }
}

async fn soundcloud(Query(params): Params) -> Response {
    stall_if_slow(&params).await;
    Json(json!([{ "provider": "soundcloud", "params": params }])).into_response()
}

async fn youtube(Query(params): Params) -> Response {
    stall_if_slow(&params).await;
    if params.get("key").map(String::as_str) == Some("bad") {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": { "message": "API key not valid" } })),
        )
            .into_response();
    }
    Json(json!({ "kind": "youtube#searchListResponse", "params": params })).into_response()
}

async fn mixcloud(Query(params): Params) -> Response {
    stall_if_slow(&params).await;
    ([(header::CONTENT_TYPE, "text/html")], "<html>maintenance</html>").into_response()
}

async fn spotify(Query(params): Params, headers: HeaderMap) -> Response {
    stall_if_slow(&params).await;
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    Json(json!({ "tracks": { "items": [] }, "authorization": authorization, "params": params }))
        .into_response()
}
