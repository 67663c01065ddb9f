//! HTTP layer shared by every store.
//!
//! One [`ApiClient`](client::ApiClient) per process funnels all requests to
//! the backend, applying timeouts, bearer tokens, retries and fallbacks.

/// Client wrapper around `reqwest`.
pub mod client;

/// Error taxonomy for backend calls.
pub mod errors;

/// Request builder consumed by the client.
pub mod request;

/// Timeout constants and helpers.
pub mod timeouts;
