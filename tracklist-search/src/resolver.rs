//! Track resolution service: normalize, build requests, fan out, aggregate.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tracklist_core::{AggregationMode, ProviderCredentials, TracklistConfig, TracklistError};

use crate::aggregate::{AggregateResponse, aggregate};
use crate::errors::{Cancelled, NormalizationError};
use crate::query::{ResolveParams, normalize};
use crate::registry::requests_for;
use crate::scheduler::FanOut;
use crate::transport::{HttpTransport, ProviderTransport};

/// Status returned when the query itself is invalid.
pub const BAD_REQUEST: u16 = 400;

/// Outcome of a resolve call.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveResponse {
    /// The query failed normalization; no provider was contacted.
    Rejected(NormalizationError),
    /// Providers were queried and their outcomes merged.
    Aggregated(AggregateResponse),
}

impl ResolveResponse {
    /// Overall HTTP status.
    pub fn status(&self) -> u16 {
        match self {
            ResolveResponse::Rejected(_) => BAD_REQUEST,
            ResolveResponse::Aggregated(response) => response.status(),
        }
    }

    /// JSON body.
    pub fn body(&self) -> Value {
        match self {
            ResolveResponse::Rejected(error) => json!({ "message": error.to_string() }),
            ResolveResponse::Aggregated(response) => response.body(),
        }
    }

    /// Check if the response carries provider results with status 200.
    pub fn is_success(&self) -> bool {
        matches!(self, ResolveResponse::Aggregated(response) if response.is_success())
    }
}

/// Resolves free-text queries against every selected provider.
///
/// Holds the read-only process configuration; cheap to share behind `Arc`.
#[derive(Debug, Clone)]
pub struct TrackResolver {
    credentials: ProviderCredentials,
    fan_out: FanOut,
    mode: AggregationMode,
}

impl TrackResolver {
    /// Creates a resolver using a custom transport.
    pub fn new(config: &TracklistConfig, transport: Arc<dyn ProviderTransport>) -> Self {
        Self {
            credentials: config.providers.clone(),
            fan_out: FanOut::new(transport, config.search.provider_timeout),
            mode: config.search.aggregation_mode,
        }
    }

    /// Creates a resolver reaching providers over HTTP.
    ///
    /// # Errors
    /// - `TracklistError::Configuration` - HTTP client could not be built
    pub fn from_config(config: &TracklistConfig) -> Result<Self, TracklistError> {
        let transport = HttpTransport::new(&config.search)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// Aggregation mode this resolver applies.
    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    /// Resolves one query.
    ///
    /// # Errors
    /// - `Cancelled` - `cancel` fired before every provider answered
    pub async fn resolve(
        &self,
        params: &ResolveParams,
        cancel: &CancellationToken,
    ) -> Result<ResolveResponse, Cancelled> {
        let query = match normalize(params) {
            Ok(query) => query,
            Err(error) => {
                tracing::debug!(%error, "rejecting resolve request");
                return Ok(ResolveResponse::Rejected(error));
            }
        };

        tracing::trace!(query = query.text(), "resolving query");

        let requests = requests_for(&query, &self.credentials);
        tracing::debug!(
            providers = requests.len(),
            limit = query.limit(),
            "dispatching provider requests"
        );

        let outcomes = self.fan_out.execute(requests, cancel).await?;
        let response = aggregate(outcomes, self.mode);

        tracing::debug!(
            succeeded = response.succeeded(),
            failed = response.failed(),
            status = response.status(),
            "aggregation complete"
        );

        Ok(ResolveResponse::Aggregated(response))
    }
}
