//! Error types for query normalization and provider calls.

use serde::Serialize;
use thiserror::Error;

/// Errors raised while turning raw request parameters into a [`Query`](crate::Query).
///
/// These abort a resolve call before any provider is contacted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    /// The `q` parameter was absent or empty.
    #[error("Required ':q?' parameter is missing")]
    MissingQuery,
}

/// Failure of a single provider call.
///
/// Always recovered into that provider's outcome; never aborts the
/// aggregation as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Connection to the provider could not be established or was interrupted.
    #[error("Transport error: {reason}")]
    Transport {
        /// The reason for the transport failure
        reason: String,
    },

    /// Provider answered with a non-success HTTP status.
    #[error("{status} - {reason}")]
    Http {
        /// HTTP status code returned by the provider
        status: u16,
        /// Response body excerpt or canonical reason phrase
        reason: String,
    },

    /// Provider body was not the JSON document it should be.
    #[error("Decode error: {reason}")]
    Decode {
        /// The reason the payload could not be decoded
        reason: String,
    },

    /// Provider did not answer within its deadline.
    #[error("Provider did not respond within {timeout_ms}ms")]
    Timeout {
        /// The deadline that elapsed
        timeout_ms: u64,
    },
}

/// Category of a [`ProviderError`], as exposed in response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    /// Network failure
    Transport,
    /// Non-success HTTP status
    Http,
    /// Undecodable payload
    Decode,
    /// Deadline exceeded
    Timeout,
}

/// Serializable error entry placed under a provider's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderErrorBody {
    /// Error category
    pub kind: ProviderErrorKind,
    /// Human readable message
    pub message: String,
    /// Status code reported by the provider, when there was one
    #[serde(rename = "statusCode", skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ProviderError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            ProviderError::Transport { .. } => ProviderErrorKind::Transport,
            ProviderError::Http { .. } => ProviderErrorKind::Http,
            ProviderError::Decode { .. } => ProviderErrorKind::Decode,
            ProviderError::Timeout { .. } => ProviderErrorKind::Timeout,
        }
    }

    /// Status code usable as an overall response status.
    ///
    /// Only HTTP errors in the 4xx and 5xx ranges qualify.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProviderError::Http { status, .. } if (400..=599).contains(status) => Some(*status),
            _ => None,
        }
    }

    /// Builds the body entry that represents this error in a response.
    pub fn to_body(&self) -> ProviderErrorBody {
        ProviderErrorBody {
            kind: self.kind(),
            message: self.to_string(),
            status_code: self.status_code(),
        }
    }
}

/// The resolve call was cancelled before every provider produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Aggregation cancelled before all providers responded")]
pub struct Cancelled;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_missing_query_message() {
        assert_eq!(
            NormalizationError::MissingQuery.to_string(),
            "Required ':q?' parameter is missing"
        );
    }

    #[test]
    fn test_status_code_only_for_error_statuses() {
        let not_found = ProviderError::Http {
            status: 404,
            reason: "Not Found".to_string(),
        };
        let redirect = ProviderError::Http {
            status: 304,
            reason: "Not Modified".to_string(),
        };

        assert_eq!(not_found.status_code(), Some(404));
        assert_eq!(redirect.status_code(), None);
        assert_eq!(ProviderError::Timeout { timeout_ms: 10 }.status_code(), None);
    }

    #[test]
    fn test_error_body_serialization() {
        let http = ProviderError::Http {
            status: 401,
            reason: "invalid client_id".to_string(),
        };
        assert_eq!(
            serde_json::to_value(http.to_body()).unwrap(),
            json!({"kind": "http", "message": "401 - invalid client_id", "statusCode": 401})
        );

        let timeout = ProviderError::Timeout { timeout_ms: 10_000 };
        assert_eq!(
            serde_json::to_value(timeout.to_body()).unwrap(),
            json!({"kind": "timeout", "message": "Provider did not respond within 10000ms"})
        );
    }

    #[test]
    fn test_errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProviderError>();
        assert_send_sync::<NormalizationError>();
        assert_send_sync::<Cancelled>();
    }
}
