//! Merging provider outcomes into one response.

use serde_json::{Map, Value, json};
use tracklist_core::AggregationMode;

use crate::errors::ProviderError;
use crate::types::Provider;

/// Status used when every provider failed and none reported a usable status.
pub const BAD_GATEWAY: u16 = 502;

/// Status of a response carrying at least one provider payload.
pub const OK: u16 = 200;

/// Result of executing one provider request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderOutcome {
    /// Provider the outcome belongs to
    pub provider: Provider,
    /// Decoded payload, or the reason the call failed
    pub result: Result<Value, ProviderError>,
}

impl ProviderOutcome {
    /// Check if the provider returned a payload.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of one resolve call, keyed by provider in registry order.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResponse {
    outcomes: Vec<ProviderOutcome>,
    mode: AggregationMode,
}

/// Merges outcomes into a response.
///
/// Outcomes may arrive in any order; they are re-keyed into registry order.
pub fn aggregate(mut outcomes: Vec<ProviderOutcome>, mode: AggregationMode) -> AggregateResponse {
    outcomes.sort_by_key(|outcome| outcome.provider);
    AggregateResponse { outcomes, mode }
}

impl AggregateResponse {
    /// Outcomes in registry order.
    pub fn outcomes(&self) -> &[ProviderOutcome] {
        &self.outcomes
    }

    /// Number of providers that returned a payload.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of providers that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    fn errors(&self) -> impl Iterator<Item = &ProviderError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    /// Check if the response carries the per-provider map with status 200.
    pub fn is_success(&self) -> bool {
        match self.mode {
            AggregationMode::Partial => self.failed() == 0 || self.succeeded() > 0,
            AggregationMode::Strict => self.failed() == 0,
        }
    }

    /// Overall HTTP status.
    ///
    /// On failure: the first usable provider status in registry order,
    /// otherwise 502.
    pub fn status(&self) -> u16 {
        if self.is_success() {
            return OK;
        }

        self.errors()
            .find_map(ProviderError::status_code)
            .unwrap_or(BAD_GATEWAY)
    }

    /// Response body.
    ///
    /// Partial mode and successful strict responses map every provider name
    /// to its payload or error entry. A failed strict response carries only
    /// the first error message.
    pub fn body(&self) -> Value {
        if self.mode.is_strict()
            && let Some(error) = self.errors().next()
        {
            return json!({ "message": error.to_string() });
        }

        let entries: Map<String, Value> = self
            .outcomes
            .iter()
            .map(|outcome| {
                let value = match &outcome.result {
                    Ok(payload) => payload.clone(),
                    Err(error) => json!(error.to_body()),
                };
                (outcome.provider.as_str().to_string(), value)
            })
            .collect();

        Value::Object(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(provider: Provider) -> ProviderOutcome {
        ProviderOutcome {
            provider,
            result: Ok(json!({"from": provider.as_str()})),
        }
    }

    fn http(provider: Provider, status: u16) -> ProviderOutcome {
        ProviderOutcome {
            provider,
            result: Err(ProviderError::Http {
                status,
                reason: "rejected".to_string(),
            }),
        }
    }

    fn timeout(provider: Provider) -> ProviderOutcome {
        ProviderOutcome {
            provider,
            result: Err(ProviderError::Timeout { timeout_ms: 10_000 }),
        }
    }

    #[test]
    fn test_empty_selection_is_success() {
        let response = aggregate(Vec::new(), AggregationMode::Partial);

        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), json!({}));
    }

    #[test]
    fn test_partial_success_keeps_every_provider() {
        let response = aggregate(
            vec![http(Provider::YouTube, 403), ok(Provider::SoundCloud)],
            AggregationMode::Partial,
        );

        assert_eq!(response.status(), 200);
        assert_eq!(response.succeeded(), 1);
        assert_eq!(response.failed(), 1);
        assert_eq!(
            response.body(),
            json!({
                "soundcloud": {"from": "soundcloud"},
                "youtube": {"kind": "http", "message": "403 - rejected", "statusCode": 403},
            })
        );
    }

    #[test]
    fn test_body_keys_follow_registry_order() {
        let response = aggregate(
            vec![
                ok(Provider::Spotify),
                ok(Provider::YouTube),
                ok(Provider::SoundCloud),
            ],
            AggregationMode::Partial,
        );

        let body = response.body();
        let keys: Vec<_> = body.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["soundcloud", "youtube", "spotify"]);
    }

    #[test]
    fn test_all_failed_uses_first_status_in_registry_order() {
        let response = aggregate(
            vec![http(Provider::YouTube, 403), http(Provider::SoundCloud, 401)],
            AggregationMode::Partial,
        );

        assert_eq!(response.status(), 401);
        let body = response.body();
        assert!(body["soundcloud"]["message"].is_string());
        assert!(body["youtube"]["message"].is_string());
    }

    #[test]
    fn test_all_failed_skips_errors_without_status() {
        let response = aggregate(
            vec![timeout(Provider::SoundCloud), http(Provider::Mixcloud, 503)],
            AggregationMode::Partial,
        );
        assert_eq!(response.status(), 503);

        let response = aggregate(
            vec![timeout(Provider::SoundCloud), timeout(Provider::YouTube)],
            AggregationMode::Partial,
        );
        assert_eq!(response.status(), BAD_GATEWAY);
    }

    #[test]
    fn test_strict_mode_fails_on_any_error() {
        let response = aggregate(
            vec![ok(Provider::SoundCloud), http(Provider::YouTube, 403)],
            AggregationMode::Strict,
        );

        assert!(!response.is_success());
        assert_eq!(response.status(), 403);
        assert_eq!(response.body(), json!({"message": "403 - rejected"}));
    }

    #[test]
    fn test_strict_mode_success_returns_map() {
        let response = aggregate(vec![ok(Provider::SoundCloud)], AggregationMode::Strict);

        assert_eq!(response.status(), 200);
        assert_eq!(
            response.body(),
            json!({"soundcloud": {"from": "soundcloud"}})
        );
    }
}
