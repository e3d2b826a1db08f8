//! Integration tests for Tracklist
//!
//! Drive the resolver and the API over real sockets against a local mock of
//! the four provider APIs.

#[path = "integration/mock_provider.rs"]
mod mock_provider;

#[path = "integration/http_fan_out.rs"]
mod http_fan_out;

#[path = "integration/api_server.rs"]
mod api_server;
