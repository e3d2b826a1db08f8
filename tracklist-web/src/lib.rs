//! Tracklist Web - JSON API Server

#![deny(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Exposes the track resolver over HTTP: a liveness route and `/resolve`,
//! which fans a query out to every selected provider and returns one JSON
//! object keyed by provider name.

pub mod handlers;
pub mod request_log;
pub mod server;

// Re-export main types
pub use server::{AppState, WebError, build_router, run_server};
