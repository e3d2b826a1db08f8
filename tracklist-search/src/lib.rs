//! Tracklist Search - Concurrent multi-provider track search

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Fans a free-text query out to SoundCloud, YouTube, Mixcloud and Spotify
//! concurrently and merges every provider's payload or failure into one
//! response keyed by provider name. Provider payloads are passed through
//! verbatim.

pub mod aggregate;
pub mod errors;
pub mod query;
pub mod registry;
pub mod resolver;
pub mod scheduler;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod transport;
pub mod types;

// Re-export main types
pub use aggregate::{AggregateResponse, ProviderOutcome, aggregate};
pub use errors::{Cancelled, NormalizationError, ProviderError, ProviderErrorKind};
pub use query::{ProviderSelection, Query, ResolveParams, normalize};
pub use registry::{ProviderDescriptor, ProviderRequest, REGISTRY, requests_for};
pub use resolver::{ResolveResponse, TrackResolver};
pub use scheduler::FanOut;
pub use transport::{HttpTransport, ProviderTransport};
pub use types::Provider;

/// Re-exported so callers can cancel resolve calls without a direct
/// `tokio-util` dependency.
pub use tokio_util::sync::CancellationToken;
