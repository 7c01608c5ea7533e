//! Provider module for reactqa
//!
//! This module contains the model provider abstraction, the Anthropic
//! implementation, the retry policy and the model gateway the agent uses.

pub mod anthropic;
pub mod base;
pub mod gateway;
pub mod retry;

pub use anthropic::AnthropicProvider;
pub use base::{CompletionRequest, CompletionResponse, Message, Provider, TokenUsage};
pub use gateway::{classify_question, validate_response, GeneratedAnswer, ModelGateway, QuestionType};
pub use retry::{retry_async, RetryPolicy};

use crate::config::Config;
use crate::error::Result;
use std::sync::Arc;

/// Create the model gateway described by the configuration
///
/// # Errors
///
/// Returns `MissingCredentials` if no Anthropic API key is configured
pub fn create_gateway(config: &Config) -> Result<ModelGateway> {
    let provider = AnthropicProvider::new(&config.model)?;
    Ok(ModelGateway::new(
        Arc::new(provider),
        &config.model,
        RetryPolicy::from(&config.retry),
    ))
}
