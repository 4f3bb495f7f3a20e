//! The `LlmProvider` trait — the uniform generate/stream surface.
//!
//! Every backend implements this; dispatch holds `Arc<dyn LlmProvider>`
//! and never knows which vendor it is talking to. Tests substitute mock
//! implementations to exercise fan-out without a network.

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use polychat_core::types::{ChatReply, Message};

/// Per-request parameters, resolved from the model's config entry.
#[derive(Clone, Debug)]
pub struct RequestParams {
    /// Model identifier sent on the wire.
    pub model: String,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl Default for RequestParams {
    fn default() -> Self {
        RequestParams {
            model: String::new(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

/// A stream of incremental text deltas. An `Err` item terminates that
/// model's column; it never affects other models.
pub type DeltaStream = BoxStream<'static, anyhow::Result<String>>;

/// Trait that all LLM providers implement.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request and wait for the full reply.
    async fn chat(&self, messages: &[Message], params: &RequestParams)
        -> anyhow::Result<ChatReply>;

    /// Send a chat completion request and stream text deltas as they
    /// arrive. The stream ends after the terminal chunk or an error.
    fn stream_chat(&self, messages: Vec<Message>, params: RequestParams) -> DeltaStream;

    /// Vendor name for logging and display.
    fn display_name(&self) -> &str;
}
