//! The API served over TCP, resolving against the mock providers.

use std::net::SocketAddr;

use serde_json::Value;
use tokio::net::TcpListener;
use tracklist_core::TracklistConfig;
use tracklist_search::{CancellationToken, TrackResolver};
use tracklist_web::{AppState, build_router};

use crate::mock_provider::MockProvider;

struct RunningApi {
    address: SocketAddr,
    shutdown: CancellationToken,
    server: tokio::task::JoinHandle<()>,
}

impl RunningApi {
    async fn start(config: &TracklistConfig) -> Self {
        let resolver = TrackResolver::from_config(config).unwrap();
        let shutdown = CancellationToken::new();
        let app = build_router(AppState::new(resolver, shutdown.clone()));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let until = shutdown.clone();
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { until.cancelled().await })
                .await
                .unwrap();
        });

        Self {
            address,
            shutdown,
            server,
        }
    }

    fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.address, path_and_query)
    }

    async fn stop(self) {
        self.shutdown.cancel();
        self.server.await.unwrap();
    }
}

fn config_for(mock: &MockProvider) -> TracklistConfig {
    let mut config = TracklistConfig::for_testing();
    config.search.provider_origin = Some(mock.origin());
    config.providers.soundcloud_client_id = Some("sc-client".to_string());
    config.providers.youtube_api_key = Some("yt-key".to_string());
    config
}

#[tokio::test]
async fn test_liveness_over_tcp() {
    let mock = MockProvider::start().await;
    let api = RunningApi::start(&config_for(&mock)).await;

    let response = reqwest::get(api.url("/")).await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "API is running.");
    api.stop().await;
}

#[tokio::test]
async fn test_resolve_over_tcp() {
    let mock = MockProvider::start().await;
    let api = RunningApi::start(&config_for(&mock)).await;

    let response = reqwest::get(api.url("/resolve?q=aphex%20twin&limit=abc&mixcloud=1"))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("content-type"));
    let body: Value = response.json().await.unwrap();
    let keys: Vec<_> = body.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["soundcloud", "youtube", "mixcloud"]);
    assert_eq!(body["soundcloud"][0]["params"]["q"], "aphex twin");
    assert_eq!(body["soundcloud"][0]["params"]["limit"], "10");
    assert_eq!(body["mixcloud"]["kind"], "decode");
    api.stop().await;
}

#[tokio::test]
async fn test_missing_query_over_tcp() {
    let mock = MockProvider::start().await;
    let api = RunningApi::start(&config_for(&mock)).await;

    let response = reqwest::get(api.url("/resolve")).await.unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Required ':q?' parameter is missing");
    api.stop().await;
}

#[tokio::test]
async fn test_cors_headers_present() {
    let mock = MockProvider::start().await;
    let api = RunningApi::start(&config_for(&mock)).await;

    let response = reqwest::Client::new()
        .get(api.url("/"))
        .header("Origin", "http://example.com")
        .send()
        .await
        .unwrap();

    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );
    api.stop().await;
}
