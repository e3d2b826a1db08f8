//! Concurrent fan-out of provider requests.
//!
//! Every request becomes one future with its own deadline and failure
//! boundary. The futures are joined, never raced: a failing or slow provider
//! only ever affects its own outcome. All futures belong to the caller's
//! scope, so dropping the call or firing its cancellation token drops every
//! in-flight provider call with it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::aggregate::ProviderOutcome;
use crate::errors::{Cancelled, ProviderError};
use crate::registry::ProviderRequest;
use crate::transport::ProviderTransport;

/// Executes provider requests concurrently with per-provider deadlines.
#[derive(Debug, Clone)]
pub struct FanOut {
    transport: Arc<dyn ProviderTransport>,
    provider_timeout: Duration,
}

impl FanOut {
    /// Creates a fan-out over `transport`.
    pub fn new(transport: Arc<dyn ProviderTransport>, provider_timeout: Duration) -> Self {
        Self {
            transport,
            provider_timeout,
        }
    }

    /// Deadline applied to each provider call.
    pub fn provider_timeout(&self) -> Duration {
        self.provider_timeout
    }

    /// Dispatches every request at once and waits for all outcomes.
    ///
    /// Returns one outcome per request; order is unspecified.
    ///
    /// # Errors
    /// - `Cancelled` - `cancel` fired before every provider produced an
    ///   outcome; in-flight calls are dropped and no outcome is returned
    pub async fn execute(
        &self,
        requests: Vec<ProviderRequest>,
        cancel: &CancellationToken,
    ) -> Result<Vec<ProviderOutcome>, Cancelled> {
        let dispatched = requests.len();
        let calls = join_all(requests.into_iter().map(|request| self.dispatch(request)));

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(dispatched, "fan-out cancelled, dropping in-flight provider calls");
                Err(Cancelled)
            }
            outcomes = calls => Ok(outcomes),
        }
    }

    async fn dispatch(&self, request: ProviderRequest) -> ProviderOutcome {
        let provider = request.provider;
        let started = Instant::now();

        let result = match timeout(self.provider_timeout, self.transport.fetch(&request)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                timeout_ms: self.provider_timeout.as_millis() as u64,
            }),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => tracing::debug!(%provider, elapsed_ms, "provider responded"),
            Err(error) => tracing::warn!(%provider, elapsed_ms, %error, "provider call failed"),
        }

        ProviderOutcome { provider, result }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tracklist_core::ProviderCredentials;

    use super::*;
    use crate::query::{ProviderSelection, Query};
    use crate::registry::requests_for;
    use crate::testing::{ScriptedReply, ScriptedTransport};
    use crate::types::Provider;

    fn requests(providers: &[Provider]) -> Vec<ProviderRequest> {
        let selection = providers
            .iter()
            .fold(ProviderSelection::none(), |s, p| s.with(*p, true));
        let query = Query::new("test", 10, selection).unwrap();
        requests_for(&query, &ProviderCredentials::default())
    }

    fn fan_out(transport: &ScriptedTransport) -> FanOut {
        FanOut::new(Arc::new(transport.clone()), Duration::from_secs(10))
    }

    fn sorted(mut outcomes: Vec<ProviderOutcome>) -> Vec<ProviderOutcome> {
        outcomes.sort_by_key(|o| o.provider);
        outcomes
    }

    #[tokio::test]
    async fn test_one_outcome_per_request() {
        let transport = ScriptedTransport::new();
        let outcomes = fan_out(&transport)
            .execute(requests(&Provider::ALL), &CancellationToken::new())
            .await
            .unwrap();

        let providers: Vec<_> = sorted(outcomes).iter().map(|o| o.provider).collect();
        assert_eq!(providers, Provider::ALL.to_vec());
        assert_eq!(transport.dispatch_count(), 4);
    }

    #[tokio::test]
    async fn test_empty_request_list() {
        let transport = ScriptedTransport::new();
        let outcomes = fan_out(&transport)
            .execute(Vec::new(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(outcomes.is_empty());
        assert_eq!(transport.dispatch_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let transport = ScriptedTransport::new()
            .respond(Provider::SoundCloud, json!({"collection": []}))
            .fail(
                Provider::YouTube,
                ProviderError::Http {
                    status: 403,
                    reason: "quotaExceeded".to_string(),
                },
            );

        let outcomes = sorted(
            fan_out(&transport)
                .execute(
                    requests(&[Provider::SoundCloud, Provider::YouTube]),
                    &CancellationToken::new(),
                )
                .await
                .unwrap(),
        );

        assert_eq!(outcomes[0].result, Ok(json!({"collection": []})));
        assert_eq!(
            outcomes[1].result.as_ref().unwrap_err().status_code(),
            Some(403)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_applies_per_provider() {
        let transport = ScriptedTransport::new().script(
            Provider::YouTube,
            ScriptedReply::Payload(json!({})).after(Duration::from_secs(60)),
        );

        let outcomes = sorted(
            fan_out(&transport)
                .execute(
                    requests(&[Provider::SoundCloud, Provider::YouTube]),
                    &CancellationToken::new(),
                )
                .await
                .unwrap(),
        );

        assert!(outcomes[0].result.is_ok());
        assert_eq!(
            outcomes[1].result,
            Err(ProviderError::Timeout { timeout_ms: 10_000 })
        );
        assert_eq!(transport.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_run_concurrently() {
        let delay = Duration::from_secs(3);
        let mut transport = ScriptedTransport::new();
        for provider in Provider::ALL {
            transport = transport.script(provider, ScriptedReply::Payload(json!({})).after(delay));
        }

        let started = tokio::time::Instant::now();
        let outcomes = fan_out(&transport)
            .execute(requests(&Provider::ALL), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 4);
        assert!(started.elapsed() < delay * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_drops_in_flight_calls() {
        let transport = ScriptedTransport::new().script(
            Provider::SoundCloud,
            ScriptedReply::Payload(json!({})).after(Duration::from_secs(5)),
        );
        let fan_out = fan_out(&transport);
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let started = tokio::time::Instant::now();
        let result = fan_out
            .execute(requests(&[Provider::SoundCloud]), &cancel)
            .await;

        assert_eq!(result.unwrap_err(), Cancelled);
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(transport.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_already_cancelled_dispatches_nothing() {
        let transport = ScriptedTransport::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = fan_out(&transport)
            .execute(requests(&Provider::ALL), &cancel)
            .await;

        assert!(result.is_err());
        assert_eq!(transport.dispatch_count(), 0);
    }
}
