//! Provider transport: issuing a [`ProviderRequest`] and decoding its payload.

use async_trait::async_trait;
use serde_json::Value;
use tracklist_core::{SearchConfig, TracklistError};

use crate::errors::ProviderError;
use crate::registry::ProviderRequest;

/// Longest provider body excerpt carried in an HTTP error message.
const ERROR_EXCERPT_CHARS: usize = 200;

/// Trait for reaching search providers.
///
/// Implementations return the decoded JSON payload verbatim or a structured
/// [`ProviderError`]. They must not retry; the fan-out applies deadlines.
#[async_trait]
pub trait ProviderTransport: Send + Sync + std::fmt::Debug {
    /// Fetches and decodes the payload for one provider request.
    ///
    /// # Errors
    /// - `ProviderError::Transport` - Network connectivity issues
    /// - `ProviderError::Http` - Provider returned a non-success status
    /// - `ProviderError::Decode` - Body is not valid JSON
    async fn fetch(&self, request: &ProviderRequest) -> Result<Value, ProviderError>;
}

/// reqwest-backed transport used in production.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    origin: Option<String>,
}

impl HttpTransport {
    /// Creates a transport from search configuration.
    ///
    /// # Errors
    /// - `TracklistError::Configuration` - HTTP client could not be built
    pub fn new(config: &SearchConfig) -> Result<Self, TracklistError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| TracklistError::Configuration {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self::with_client(client, config.provider_origin.clone()))
    }

    /// Creates a transport around an existing client.
    pub fn with_client(client: reqwest::Client, origin: Option<String>) -> Self {
        Self { client, origin }
    }
}

#[async_trait]
impl ProviderTransport for HttpTransport {
    async fn fetch(&self, request: &ProviderRequest) -> Result<Value, ProviderError> {
        let url = request.url_with_origin(self.origin.as_deref());

        let mut builder = self.client.get(url);
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }

        // URLs are stripped from reqwest errors since they embed credentials.
        let response = builder
            .send()
            .await
            .map_err(|e| ProviderError::Transport {
                reason: e.without_url().to_string(),
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Transport {
                reason: e.without_url().to_string(),
            })?;

        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                reason: error_reason(status, &body),
            });
        }

        decode_payload(&body)
    }
}

/// Decodes a provider body as JSON.
///
/// # Errors
/// - `ProviderError::Decode` - Body is not valid JSON
pub fn decode_payload(body: &[u8]) -> Result<Value, ProviderError> {
    serde_json::from_slice(body).map_err(|e| ProviderError::Decode {
        reason: e.to_string(),
    })
}

fn error_reason(status: reqwest::StatusCode, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();

    if text.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Unknown status")
            .to_string();
    }

    let mut excerpt: String = text.chars().take(ERROR_EXCERPT_CHARS).collect();
    if text.chars().count() > ERROR_EXCERPT_CHARS {
        excerpt.push_str("...");
    }
    excerpt
}
