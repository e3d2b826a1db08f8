//! Centralized configuration for Tracklist.
//!
//! All tunable parameters and provider credentials are defined here and
//! loaded once at process start. Nothing mutates the configuration after
//! startup; components receive it explicitly instead of reading the
//! environment themselves.

use std::time::Duration;

use url::Url;

use crate::TracklistError;
use crate::mode::AggregationMode;

/// Central configuration for all Tracklist components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct TracklistConfig {
    pub server: ServerConfig,
    pub providers: ProviderCredentials,
    pub search: SearchConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the API binds to
    pub host: String,
    /// Listening port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Per-provider credentials.
///
/// A missing credential is not a configuration error: the affected provider
/// still gets queried and its rejection shows up in that provider's outcome.
#[derive(Clone, Default)]
pub struct ProviderCredentials {
    /// SoundCloud `client_id` query parameter
    pub soundcloud_client_id: Option<String>,
    /// YouTube Data API key
    pub youtube_api_key: Option<String>,
    /// Spotify bearer token
    pub spotify_token: Option<String>,
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn redact(value: &Option<String>) -> &'static str {
            if value.is_some() { "<set>" } else { "<unset>" }
        }

        f.debug_struct("ProviderCredentials")
            .field("soundcloud_client_id", &redact(&self.soundcloud_client_id))
            .field("youtube_api_key", &redact(&self.youtube_api_key))
            .field("spotify_token", &redact(&self.spotify_token))
            .finish()
    }
}

/// Fan-out and provider transport configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Deadline applied to each provider call independently
    pub provider_timeout: Duration,
    /// How provider failures affect the overall response
    pub aggregation_mode: AggregationMode,
    /// Replaces `https://<provider host>` for every provider when set
    pub provider_origin: Option<String>,
    /// User agent sent to providers
    pub user_agent: &'static str,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(10),
            aggregation_mode: AggregationMode::Partial,
            provider_origin: None,
            user_agent: "tracklist/0.1.0",
        }
    }
}

impl TracklistConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Unparseable numeric or enum values are ignored and the default is kept.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(host) = var("TRACKLIST_HOST") {
            config.server.host = host;
        }

        if let Some(port) = var("APP_PORT").and_then(|p| p.parse::<u16>().ok()) {
            config.server.port = port;
        }

        config.providers.soundcloud_client_id = var("SC_CLIENT_ID");
        config.providers.youtube_api_key = var("YT_API_KEY");
        config.providers.spotify_token = var("SPOTIFY_TOKEN");

        if let Some(seconds) = var("TRACKLIST_PROVIDER_TIMEOUT").and_then(|s| s.parse::<u64>().ok())
        {
            config.search.provider_timeout = Duration::from_secs(seconds);
        }

        if let Some(mode) = var("TRACKLIST_AGGREGATION_MODE").and_then(|m| m.parse().ok()) {
            config.search.aggregation_mode = mode;
        }

        config.search.provider_origin = var("TRACKLIST_PROVIDER_ORIGIN");

        config
    }

    /// Creates a configuration suited to tests: short deadlines, no credentials.
    pub fn for_testing() -> Self {
        Self {
            search: SearchConfig {
                provider_timeout: Duration::from_secs(2),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Checks values that cannot be caught by parsing alone.
    ///
    /// # Errors
    ///
    /// - `TracklistError::Configuration` - zero provider timeout, or a provider
    ///   origin that is not an absolute http(s) URL
    pub fn validate(&self) -> Result<(), TracklistError> {
        if self.search.provider_timeout.is_zero() {
            return Err(TracklistError::Configuration {
                reason: "provider timeout must be greater than zero".to_string(),
            });
        }

        if let Some(origin) = &self.search.provider_origin {
            let parsed = Url::parse(origin).map_err(|e| TracklistError::Configuration {
                reason: format!("invalid provider origin '{origin}': {e}"),
            })?;

            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(TracklistError::Configuration {
                    reason: format!("provider origin '{origin}' must use http or https"),
                });
            }
        }

        Ok(())
    }

    /// Socket address string the HTTP server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
