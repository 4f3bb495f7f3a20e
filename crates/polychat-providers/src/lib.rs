//! LLM provider layer for Polychat.
//!
//! Provider identity is resolved through a typed factory over a static
//! registry; adding a vendor means adding a registry row, not a new client.
//!
//! # Architecture
//!
//! - [`registry`] — static specs for the supported vendors + lookup
//! - [`traits::LlmProvider`] — trait that all providers implement
//! - [`sse`] — incremental server-sent-events decoding
//! - [`http_provider::HttpProvider`] — generic OpenAI-compatible HTTP client
//! - [`http_provider::build_provider`] — factory from an enabled-model entry

pub mod http_provider;
pub mod registry;
pub mod sse;
pub mod traits;

// Re-export main types for convenience
pub use http_provider::{build_provider, HttpProvider};
pub use registry::{find_spec, ProviderSpec, PROVIDERS};
pub use traits::{DeltaStream, LlmProvider, RequestParams};
