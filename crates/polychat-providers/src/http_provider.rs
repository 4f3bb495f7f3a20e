//! Generic HTTP provider for OpenAI-compatible `/chat/completions` APIs.
//!
//! One client covers every vendor in the registry: the endpoints differ
//! only in base URL, auth key, and the max-tokens field spelling. Both the
//! blocking `chat` call and the SSE-based `stream_chat` live here.

use async_stream::try_stream;
use async_trait::async_trait;
use futures_util::StreamExt;
use tracing::{debug, error, warn};

use polychat_core::config::EnabledModel;
use polychat_core::types::{ChatCompletionRequest, ChatCompletionResponse, ChatReply, Message, StreamChunk};

use crate::registry::{find_spec, MaxTokensField, ProviderSpec};
use crate::sse::{SseDecoder, SseEvent};
use crate::traits::{DeltaStream, LlmProvider, RequestParams};

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// An LLM provider that talks to an OpenAI-compatible HTTP API.
pub struct HttpProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    /// Registry spec for this vendor.
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("provider", &self.spec.display_name)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl HttpProvider {
    /// Create a provider from a registry spec, an API key, and an optional
    /// base-URL override.
    pub fn new(spec: &'static ProviderSpec, api_key: String, api_base: Option<String>) -> Self {
        let api_base = api_base.unwrap_or_else(|| spec.default_api_base.to_string());

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client");

        HttpProvider {
            client,
            api_base,
            api_key,
            spec,
        }
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }

    /// Assemble the request body, spelling the token limit the way this
    /// vendor expects.
    fn request_body(
        &self,
        messages: Vec<Message>,
        params: &RequestParams,
        stream: bool,
    ) -> ChatCompletionRequest {
        let (max_tokens, max_output_tokens) = match self.spec.max_tokens_field {
            MaxTokensField::MaxTokens => (Some(params.max_tokens), None),
            MaxTokensField::MaxOutputTokens => (None, Some(params.max_tokens)),
        };

        ChatCompletionRequest {
            model: params.model.clone(),
            messages,
            temperature: Some(params.temperature),
            max_tokens,
            max_output_tokens,
            stream: stream.then_some(true),
        }
    }
}

#[async_trait]
impl LlmProvider for HttpProvider {
    async fn chat(
        &self,
        messages: &[Message],
        params: &RequestParams,
    ) -> anyhow::Result<ChatReply> {
        debug!(
            provider = self.spec.display_name,
            model = %params.model,
            messages = messages.len(),
            "calling LLM"
        );

        let body = self.request_body(messages.to_vec(), params, false);
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = self.spec.display_name, error = %e, "HTTP request failed");
                anyhow::anyhow!("error calling {}: {}", self.spec.display_name, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            error!(
                provider = self.spec.display_name,
                status = %status,
                body = %error_text,
                "API error"
            );
            anyhow::bail!(
                "{} returned {}: {}",
                self.spec.display_name,
                status,
                error_text
            );
        }

        let chat_resp: ChatCompletionResponse = response.json().await.map_err(|e| {
            anyhow::anyhow!("failed to parse {} response: {}", self.spec.display_name, e)
        })?;

        Ok(chat_resp.into())
    }

    fn stream_chat(&self, messages: Vec<Message>, params: RequestParams) -> DeltaStream {
        let body = self.request_body(messages, &params, true);
        let request = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body);
        let provider_name = self.spec.display_name;

        let stream = try_stream! {
            debug!(provider = provider_name, model = %params.model, "opening stream");
            let response = request.send().await?;

            // `response` moves into exactly one branch: the error-body read
            // consumes it on failure, the byte stream on success.
            let status = response.status();
            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "failed to read error body".to_string());
                error!(provider = provider_name, status = %status, body = %error_text, "API error");
                Err(anyhow::anyhow!(
                    "{provider_name} returned {status}: {error_text}"
                ))?;
            } else {
                let mut bytes = response.bytes_stream();
                let mut decoder = SseDecoder::new();

                'read: while let Some(chunk) = bytes.next().await {
                    let chunk = chunk?;
                    for event in decoder.feed(&chunk) {
                        let payload = match event {
                            SseEvent::Done => break 'read,
                            SseEvent::Data(payload) => payload,
                        };
                        match serde_json::from_str::<StreamChunk>(&payload) {
                            Ok(parsed) => {
                                if let Some(content) = parsed.content() {
                                    yield content.to_string();
                                }
                                if parsed.finish_reason().is_some() {
                                    break 'read;
                                }
                            }
                            Err(e) => {
                                warn!(provider = provider_name, error = %e, "skipping malformed chunk");
                            }
                        }
                    }
                }
                debug!(provider = provider_name, "stream closed");
            }
        };

        Box::pin(stream)
    }

    fn display_name(&self) -> &str {
        self.spec.display_name
    }
}

// ─────────────────────────────────────────────
// Factory
// ─────────────────────────────────────────────

/// Build a provider for one enabled model from the config.
///
/// Resolves the provider id against the registry and reads the API key from
/// the configured environment variable — a missing key fails here, before
/// any request is made, so dispatch can exclude the model up front.
pub fn build_provider(model: &EnabledModel) -> anyhow::Result<HttpProvider> {
    let spec = find_spec(&model.provider_id).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown provider '{}' (supported: {})",
            model.provider_id,
            crate::registry::PROVIDERS
                .iter()
                .map(|s| s.id)
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;

    let api_key = std::env::var(&model.api_key_env).map_err(|_| {
        anyhow::anyhow!(
            "API key not found in environment variable '{}'",
            model.api_key_env
        )
    })?;

    debug!(
        provider = spec.display_name,
        model = %model.name,
        api_base = model.api_base.as_deref().unwrap_or("default"),
        "creating LLM provider"
    );

    Ok(HttpProvider::new(spec, api_key, model.api_base.clone()))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
