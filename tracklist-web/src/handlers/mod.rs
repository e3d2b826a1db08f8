//! HTTP request handlers

pub mod api;

// Re-export handler functions
pub use api::{LIVENESS_MESSAGE, hello, resolve};
