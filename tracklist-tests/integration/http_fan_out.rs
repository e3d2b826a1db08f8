//! Resolver fan-out over real HTTP.

use std::time::{Duration, Instant};

use serde_json::Value;
use tracklist_core::{AggregationMode, TracklistConfig};
use tracklist_search::{CancellationToken, Provider, ResolveParams, TrackResolver};

use crate::mock_provider::{MockProvider, SLOW_DELAY};

fn config_for(mock: &MockProvider) -> TracklistConfig {
    let mut config = TracklistConfig::for_testing();
    config.search.provider_origin = Some(mock.origin());
    config.providers.soundcloud_client_id = Some("sc-client".to_string());
    config.providers.youtube_api_key = Some("yt-key".to_string());
    config.providers.spotify_token = Some("spotify-token".to_string());
    config
}

async fn resolve(config: &TracklistConfig, params: &ResolveParams) -> (u16, Value) {
    config.validate().unwrap();
    let resolver = TrackResolver::from_config(config).unwrap();
    let response = resolver
        .resolve(params, &CancellationToken::new())
        .await
        .unwrap();
    (response.status(), response.body())
}

#[tokio::test]
async fn test_default_selection_queries_soundcloud_and_youtube() {
    let mock = MockProvider::start().await;
    let config = config_for(&mock);

    let (status, body) = resolve(&config, &ResolveParams::new("daft punk")).await;

    assert_eq!(status, 200);
    let keys: Vec<_> = body.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["soundcloud", "youtube"]);

    let soundcloud = &body["soundcloud"][0]["params"];
    assert_eq!(soundcloud["q"], "daft punk");
    assert_eq!(soundcloud["limit"], "10");
    assert_eq!(soundcloud["client_id"], "sc-client");

    let youtube = &body["youtube"]["params"];
    assert_eq!(youtube["part"], "snippet");
    assert_eq!(youtube["key"], "yt-key");
    assert_eq!(youtube["maxResults"], "10");
}

#[tokio::test]
async fn test_limits_are_clamped_per_provider() {
    let mock = MockProvider::start().await;
    let config = config_for(&mock);
    let params = ResolveParams::new("x")
        .with_limit("500")
        .with_flag(Provider::Spotify, "1");

    let (status, body) = resolve(&config, &params).await;

    assert_eq!(status, 200);
    assert_eq!(body["soundcloud"][0]["params"]["limit"], "100");
    assert_eq!(body["youtube"]["params"]["maxResults"], "50");
    assert_eq!(body["spotify"]["params"]["limit"], "50");
    assert_eq!(body["spotify"]["params"]["type"], "track");
}

#[tokio::test]
async fn test_spotify_receives_bearer_token() {
    let mock = MockProvider::start().await;
    let config = config_for(&mock);
    let params = ResolveParams::new("x")
        .with_flag(Provider::SoundCloud, "false")
        .with_flag(Provider::YouTube, "false")
        .with_flag(Provider::Spotify, "yes");

    let (status, body) = resolve(&config, &params).await;

    assert_eq!(status, 200);
    assert_eq!(body["spotify"]["authorization"], "Bearer spotify-token");
}

#[tokio::test]
async fn test_undecodable_payload_is_isolated() {
    let mock = MockProvider::start().await;
    let config = config_for(&mock);
    let params = ResolveParams::new("x").with_flag(Provider::Mixcloud, "1");

    let (status, body) = resolve(&config, &params).await;

    assert_eq!(status, 200);
    let keys: Vec<_> = body.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["soundcloud", "youtube", "mixcloud"]);
    assert_eq!(body["mixcloud"]["kind"], "decode");
    assert!(body["soundcloud"].is_array());
}

#[tokio::test]
async fn test_provider_rejection_becomes_overall_status() {
    let mock = MockProvider::start().await;
    let mut config = config_for(&mock);
    config.providers.youtube_api_key = Some("bad".to_string());
    let params = ResolveParams::new("x").with_flag(Provider::SoundCloud, "false");

    let (status, body) = resolve(&config, &params).await;

    assert_eq!(status, 403);
    assert_eq!(body["youtube"]["kind"], "http");
    assert_eq!(body["youtube"]["statusCode"], 403);
    let message = body["youtube"]["message"].as_str().unwrap();
    assert!(message.starts_with("403 - "));
    assert!(!message.contains("bad"), "credential leaked: {message}");
}

#[tokio::test]
async fn test_slow_provider_times_out_without_blocking_others() {
    let mock = MockProvider::start().await;
    let mut config = config_for(&mock);
    config.search.provider_timeout = Duration::from_millis(300);

    let started = Instant::now();
    let (status, body) = resolve(&config, &ResolveParams::new("slow")).await;

    assert!(started.elapsed() < SLOW_DELAY);
    assert_eq!(status, 502);
    assert_eq!(body["soundcloud"]["kind"], "timeout");
    assert_eq!(body["youtube"]["kind"], "timeout");
}

#[tokio::test]
async fn test_unreachable_origin_is_bad_gateway() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let closed = listener.local_addr().unwrap();
    drop(listener);

    let mut config = TracklistConfig::for_testing();
    config.search.provider_origin = Some(format!("http://{closed}"));

    let (status, body) = resolve(&config, &ResolveParams::new("x")).await;

    assert_eq!(status, 502);
    assert_eq!(body["soundcloud"]["kind"], "transport");
    assert_eq!(body["youtube"]["kind"], "transport");
}

#[tokio::test]
async fn test_strict_mode_collapses_on_any_failure() {
    let mock = MockProvider::start().await;
    let mut config = config_for(&mock);
    config.search.aggregation_mode = AggregationMode::Strict;
    let params = ResolveParams::new("x").with_flag(Provider::Mixcloud, "1");

    let (status, body) = resolve(&config, &params).await;

    assert_eq!(status, 502);
    let body = body.as_object().unwrap();
    assert_eq!(body.len(), 1);
    assert!(body["message"].as_str().unwrap().starts_with("Decode error"));
}
