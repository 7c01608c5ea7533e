//! Anthropic provider implementation for reactqa
//!
//! This module implements the Provider trait for the Anthropic Messages API.

use crate::config::ModelConfig;
use crate::error::{ReactQaError, Result};
use crate::providers::{CompletionRequest, CompletionResponse, Message, Provider, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// API version sent with every request
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API provider
///
/// # Examples
///
/// ```no_run
/// use reactqa::config::ModelConfig;
/// use reactqa::providers::{AnthropicProvider, CompletionRequest, Provider};
///
/// # async fn example() -> reactqa::error::Result<()> {
/// let config = ModelConfig {
///     api_key: Some("sk-ant-...".to_string()),
///     ..ModelConfig::default()
/// };
/// let provider = AnthropicProvider::new(&config)?;
/// let request = CompletionRequest::single(&config.model, "Hello!", 100);
/// let completion = provider.complete(&request).await?;
/// println!("{}", completion.text());
/// # Ok(())
/// # }
/// ```
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    endpoint: String,
}

/// Request body for POST /v1/messages
#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    max_tokens: u32,
    temperature: f32,
}

/// Response body from POST /v1/messages
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContentBlock>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: usize,
    #[serde(default)]
    output_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorResponse {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider
    ///
    /// # Arguments
    ///
    /// * `config` - Model configuration (API key, base URL, timeout)
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` if no API key is configured, or a
    /// provider error if the HTTP client cannot be built
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ReactQaError::MissingCredentials(
                    "ANTHROPIC_API_KEY not found in environment variables or provided"
                        .to_string(),
                )
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ReactQaError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        let endpoint = format!("{}/v1/messages", config.base_url.trim_end_matches('/'));
        tracing::debug!("Initialized Anthropic provider: endpoint={}", endpoint);

        Ok(Self {
            client,
            api_key,
            endpoint,
        })
    }

    fn error_message(body: &str) -> String {
        serde_json::from_str::<AnthropicErrorResponse>(body)
            .map(|wrapper| wrapper.error.message)
            .unwrap_or_else(|_| body.to_string())
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let body = AnthropicRequest {
            model: &request.model,
            messages: &request.messages,
            system: request.system.as_deref(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        tracing::debug!(
            "Sending Anthropic request: model={}, {} messages, max_tokens={}",
            request.model,
            request.messages.len(),
            request.max_tokens
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Anthropic request failed: {}", e);
                ReactQaError::Provider(format!("Anthropic request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Anthropic returned error {}: {}", status, error_text);
            return Err(ReactQaError::Provider(format!(
                "Anthropic returned error {}: {}",
                status,
                Self::error_message(&error_text)
            ))
            .into());
        }

        let parsed: AnthropicResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Anthropic response: {}", e);
            ReactQaError::Provider(format!("Failed to parse Anthropic response: {}", e))
        })?;

        let text = parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .unwrap_or_default();

        let message = Message::assistant(text);
        Ok(match parsed.usage {
            Some(usage) => {
                tracing::debug!(
                    "Anthropic usage: input_tokens={}, output_tokens={}",
                    usage.input_tokens,
                    usage.output_tokens
                );
                CompletionResponse::with_usage(
                    message,
                    TokenUsage::new(usage.input_tokens, usage.output_tokens),
                )
            }
            None => CompletionResponse::new(message),
        })
    }
}
