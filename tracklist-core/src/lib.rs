//! Tracklist Core - Shared configuration, errors and tracing
//!
//! Everything here is loaded or initialised once at process start and is
//! read-only afterwards: the provider credentials, listener settings,
//! fan-out tuning and the tracing subscriber.

pub mod config;
pub mod mode;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::{ProviderCredentials, SearchConfig, ServerConfig, TracklistConfig};
pub use mode::AggregationMode;

/// Startup errors shared by the Tracklist binaries.
#[derive(Debug, thiserror::Error)]
pub enum TracklistError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TracklistError {
    /// Checks if this error is due to user-supplied settings.
    pub fn is_user_error(&self) -> bool {
        matches!(self, TracklistError::Configuration { .. })
    }
}

pub type Result<T> = std::result::Result<T, TracklistError>;
