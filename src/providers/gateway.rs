//! Model gateway
//!
//! Wraps a [`Provider`] with the model settings and retry policy used by the
//! agent. Two request modes share the same policy: raw reasoning turns and
//! grounded answer synthesis.

use crate::config::ModelConfig;
use crate::error::Result;
use crate::prompts::{build_answer_prompt, system_prompt_for};
use crate::providers::retry::{retry_async, RetryPolicy};
use crate::providers::{CompletionRequest, Provider, TokenUsage};
use std::fmt;
use std::sync::Arc;

/// Characters of context forwarded to answer synthesis
pub const MAX_CONTEXT_CHARS: usize = 10_000;

/// Answers shorter than this (trimmed) fail validation
pub const MIN_ANSWER_CHARS: usize = 10;

const HISTORICAL_KEYWORDS: &[&str] = &[
    "when",
    "date",
    "year",
    "who invented",
    "founded",
    "discovered",
    "history",
];
const COMPARATIVE_KEYWORDS: &[&str] = &[
    "compare",
    "difference",
    "similar",
    "versus",
    "vs",
    "better",
    "worse",
];
const ANALYTICAL_KEYWORDS: &[&str] = &[
    "why",
    "how does",
    "explain",
    "analyze",
    "cause",
    "effect",
    "impact",
];

/// Question classification used to pick a system prompt variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    /// Chronology and origins
    Historical,
    /// Similarities and differences
    Comparative,
    /// Reasons and relationships
    Analytical,
    /// Specific facts (default)
    Factual,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestionType::Historical => "historical",
            QuestionType::Comparative => "comparative",
            QuestionType::Analytical => "analytical",
            QuestionType::Factual => "factual",
        };
        f.write_str(name)
    }
}

/// Classify a question by keyword
///
/// Keywords are matched as substrings of the lowercased question, checking
/// historical, then comparative, then analytical.
///
/// # Examples
///
/// ```
/// use reactqa::providers::gateway::{classify_question, QuestionType};
///
/// assert_eq!(classify_question("When was Rome founded?"), QuestionType::Historical);
/// assert_eq!(classify_question("What is the capital of Peru?"), QuestionType::Factual);
/// ```
pub fn classify_question(question: &str) -> QuestionType {
    let lowered = question.to_lowercase();
    let any = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));
    if any(HISTORICAL_KEYWORDS) {
        QuestionType::Historical
    } else if any(COMPARATIVE_KEYWORDS) {
        QuestionType::Comparative
    } else if any(ANALYTICAL_KEYWORDS) {
        QuestionType::Analytical
    } else {
        QuestionType::Factual
    }
}

/// A synthesized answer with metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAnswer {
    /// Answer text
    pub answer: String,
    /// Token usage reported by the provider
    pub usage: TokenUsage,
    /// Model that produced the answer
    pub model: String,
}

/// Quality check for a synthesized answer
pub fn validate_response(answer: &GeneratedAnswer) -> bool {
    answer.answer.trim().chars().count() >= MIN_ANSWER_CHARS
}

fn truncate_context(context: &str) -> &str {
    match context.char_indices().nth(MAX_CONTEXT_CHARS) {
        Some((byte_index, _)) => &context[..byte_index],
        None => context,
    }
}

/// Model gateway used by the agent loop
#[derive(Clone)]
pub struct ModelGateway {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    reasoning_max_tokens: u32,
    answer_max_tokens: u32,
    retry: RetryPolicy,
}

impl ModelGateway {
    /// Create a gateway over a provider
    pub fn new(provider: Arc<dyn Provider>, config: &ModelConfig, retry: RetryPolicy) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            temperature: config.temperature,
            reasoning_max_tokens: config.reasoning_max_tokens,
            answer_max_tokens: config.answer_max_tokens,
            retry,
        }
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Token budget for a reasoning turn
    pub fn reasoning_max_tokens(&self) -> u32 {
        self.reasoning_max_tokens
    }

    /// Token budget for answer synthesis
    pub fn answer_max_tokens(&self) -> u32 {
        self.answer_max_tokens
    }

    /// Run one reasoning turn
    ///
    /// Sends the prompt as a single user message with no system prompt and
    /// returns the raw completion text.
    ///
    /// # Errors
    ///
    /// Returns the provider's last error once retries are exhausted
    pub async fn generate_reasoning(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let request = CompletionRequest::single(&self.model, prompt, max_tokens)
            .with_temperature(self.temperature);
        let response = retry_async(&self.retry, "generate_reasoning", || {
            self.provider.complete(&request)
        })
        .await?;
        Ok(response.message.content)
    }

    /// Synthesize an answer grounded in `context`
    ///
    /// # Arguments
    ///
    /// * `question` - The user's question, also used for classification
    /// * `context` - Source text, cut to [`MAX_CONTEXT_CHARS`]
    /// * `max_tokens` - Token budget
    /// * `temperature` - Sampling temperature
    ///
    /// # Errors
    ///
    /// Returns the provider's last error once retries are exhausted
    pub async fn generate_answer(
        &self,
        question: &str,
        context: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<GeneratedAnswer> {
        let question_type = classify_question(question);
        tracing::debug!("Answer synthesis: question_type={}", question_type);

        let request = CompletionRequest::single(
            &self.model,
            build_answer_prompt(question, truncate_context(context)),
            max_tokens,
        )
        .with_system(system_prompt_for(question_type))
        .with_temperature(temperature);

        let response = retry_async(&self.retry, "generate_answer", || {
            self.provider.complete(&request)
        })
        .await?;

        let answer = if response.message.content.is_empty() {
            "No response generated".to_string()
        } else {
            response.message.content
        };

        Ok(GeneratedAnswer {
            answer,
            usage: response.usage.unwrap_or_default(),
            model: self.model.clone(),
        })
    }

    /// [`ModelGateway::generate_answer`] with the configured token budget
    /// and temperature
    pub async fn synthesize_answer(
        &self,
        question: &str,
        context: &str,
    ) -> Result<GeneratedAnswer> {
        self.generate_answer(question, context, self.answer_max_tokens, self.temperature)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockProvider;

    fn gateway(provider: Arc<MockProvider>) -> ModelGateway {
        ModelGateway::new(provider, &ModelConfig::default(), RetryPolicy::immediate(3))
    }

    #[test]
    fn test_classify_question() {
        assert_eq!(
            classify_question("Who invented the telephone?"),
            QuestionType::Historical
        );
        assert_eq!(
            classify_question("Compare Rust and Go"),
            QuestionType::Comparative
        );
        assert_eq!(
            classify_question("Why is the sky blue?"),
            QuestionType::Analytical
        );
        assert_eq!(
            classify_question("What is the tallest mountain?"),
            QuestionType::Factual
        );
    }

    #[test]
    fn test_classify_question_checks_historical_first() {
        // "why" is analytical but "year" wins
        assert_eq!(
            classify_question("Why did that year matter?"),
            QuestionType::Historical
        );
    }

    #[test]
    fn test_classify_question_matches_substrings() {
        // "vs" inside "canvas"
        assert_eq!(
            classify_question("Where is the canvas stored?"),
            QuestionType::Comparative
        );
    }

    #[test]
    fn test_validate_response() {
        let mut answer = GeneratedAnswer {
            answer: "   short   ".to_string(),
            usage: TokenUsage::default(),
            model: "m".to_string(),
        };
        assert!(!validate_response(&answer));
        answer.answer = "Paris is the capital.".to_string();
        assert!(validate_response(&answer));
    }

    #[test]
    fn test_truncate_context() {
        let long = "x".repeat(MAX_CONTEXT_CHARS + 50);
        assert_eq!(truncate_context(&long).len(), MAX_CONTEXT_CHARS);
        assert_eq!(truncate_context("short"), "short");
    }

    #[tokio::test]
    async fn test_generate_reasoning_sends_bare_prompt() {
        let provider = Arc::new(MockProvider::new(vec!["THOUGHT: hi\nFINAL ANSWER: 4"]));
        let text = gateway(provider.clone())
            .generate_reasoning("the prompt", 500)
            .await
            .unwrap();
        assert_eq!(text, "THOUGHT: hi\nFINAL ANSWER: 4");

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].system.is_none());
        assert_eq!(requests[0].messages[0].content, "the prompt");
        assert_eq!(requests[0].max_tokens, 500);
        assert_eq!(requests[0].temperature, 0.3);
    }

    #[tokio::test]
    async fn test_generate_reasoning_retries_transient_failure() {
        let provider = Arc::new(MockProvider::new(vec!["ok"]).failing_first(2));
        let text = gateway(provider.clone())
            .generate_reasoning("p", 10)
            .await
            .unwrap();
        assert_eq!(text, "ok");
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_generate_reasoning_surfaces_exhausted_retries() {
        let provider = Arc::new(MockProvider::new(vec!["never"]).failing_first(5));
        let err = gateway(provider.clone())
            .generate_reasoning("p", 10)
            .await
            .unwrap_err();
        assert_eq!(provider.call_count(), 3);
        assert!(err.to_string().contains("Provider error"));
    }

    #[tokio::test]
    async fn test_generate_answer_uses_classified_system_prompt() {
        let provider = Arc::new(MockProvider::new(vec!["Rome was founded in 753 BC."]));
        let answer = gateway(provider.clone())
            .generate_answer("When was Rome founded?", "context text", 1000, 0.3)
            .await
            .unwrap();
        assert_eq!(answer.answer, "Rome was founded in 753 BC.");
        assert_eq!(answer.model, "claude-sonnet-4-20250514");

        let requests = provider.requests();
        let system = requests[0].system.clone().unwrap();
        assert!(system.contains("historical questions"));
        assert!(requests[0].messages[0].content.contains("Context:\ncontext text"));
    }

    #[tokio::test]
    async fn test_generate_answer_empty_completion() {
        let provider = Arc::new(MockProvider::new(vec![""]));
        let answer = gateway(provider)
            .generate_answer("What?", "", 100, 0.0)
            .await
            .unwrap();
        assert_eq!(answer.answer, "No response generated");
        assert!(!validate_response(&answer));
    }

    #[tokio::test]
    async fn test_synthesize_answer_uses_configured_budget() {
        let provider = Arc::new(MockProvider::new(vec!["Paris is the capital of France."]));
        let config = ModelConfig {
            answer_max_tokens: 640,
            temperature: 0.1,
            ..ModelConfig::default()
        };
        let gateway = ModelGateway::new(provider.clone(), &config, RetryPolicy::none());
        assert_eq!(gateway.answer_max_tokens(), 640);

        let answer = gateway
            .synthesize_answer("What is the capital of France?", "Paris.")
            .await
            .unwrap();
        assert_eq!(answer.answer, "Paris is the capital of France.");

        let requests = provider.requests();
        assert_eq!(requests[0].max_tokens, 640);
        assert_eq!(requests[0].temperature, 0.1);
    }
}
