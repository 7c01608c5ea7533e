//! Test utilities for reactqa
//!
//! This module provides a scripted model provider, a fake search gateway,
//! temporary file helpers and assertion helpers shared by unit tests.

use crate::config::Config;
use crate::error::{ReactQaError, Result};
use crate::providers::{CompletionRequest, CompletionResponse, Message, Provider, TokenUsage};
use crate::search::{SearchGateway, SearchResult};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Panics
///
/// Panics if the directory cannot be created
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Create a test configuration with credentials filled in
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.model.api_key = Some("sk-ant-test".to_string());
    config.search.api_key = Some("google-test".to_string());
    config.search.engine_id = Some("engine-test".to_string());
    config
}

/// Create a test configuration YAML string
pub fn test_config_yaml() -> String {
    r#"
model:
  model: claude-3-haiku-20240307
  reasoning_max_tokens: 400
  temperature: 0.1

search:
  max_content_length: 2000
  fetch_timeout_seconds: 5

agent:
  max_steps: 8
  recursion_limit: 20
  tools:
    max_output_size: 8192

retry:
  max_attempts: 2
  initial_delay_ms: 10
  max_delay_ms: 20
"#
    .to_string()
}

/// Provider that replays scripted completions and records every request
///
/// When the script runs out the last completion is repeated.
#[derive(Debug, Default)]
pub struct MockProvider {
    responses: Vec<String>,
    fail_first: usize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    /// Script the completions returned in order
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: responses.into_iter().map(String::from).collect(),
            ..Self::default()
        }
    }

    /// Fail the first `n` calls with a provider error
    pub fn failing_first(mut self, n: usize) -> Self {
        self.fail_first = n;
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };

        if call <= self.fail_first {
            return Err(ReactQaError::Provider(format!("scripted failure {}", call)).into());
        }

        let index = (call - self.fail_first - 1).min(self.responses.len().saturating_sub(1));
        let text = self.responses.get(index).cloned().unwrap_or_default();
        Ok(CompletionResponse::with_usage(
            Message::assistant(text),
            TokenUsage::new(10, 5),
        ))
    }
}

/// Search gateway returning a fixed outcome
#[derive(Debug, Default)]
pub struct FakeSearch {
    result: Option<SearchResult>,
    failure: Option<String>,
    calls: Mutex<Vec<(String, Option<usize>)>>,
}

impl FakeSearch {
    /// Gateway that finds nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Gateway that always returns `result`
    pub fn with_result(result: SearchResult) -> Self {
        Self {
            result: Some(result),
            ..Self::default()
        }
    }

    /// Gateway that fails with a search error carrying `message`
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Queries received so far
    pub fn queries(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(q, _)| q.clone())
            .collect()
    }

    /// Content budget passed with the latest call, if any call was made
    pub fn last_max_length(&self) -> Option<Option<usize>> {
        self.calls.lock().unwrap().last().map(|(_, max)| *max)
    }
}

#[async_trait]
impl SearchGateway for FakeSearch {
    async fn search_and_extract(
        &self,
        query: &str,
        max_length: Option<usize>,
    ) -> Result<SearchResult> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), max_length));

        if let Some(message) = &self.failure {
            return Err(ReactQaError::Search(message.clone()).into());
        }
        match &self.result {
            Some(result) => Ok(result.clone()),
            None => Err(ReactQaError::Search(format!(
                "No Google search results found for query: {}",
                query
            ))
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "test.txt", "content");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    #[should_panic(expected = "does not contain")]
    fn test_assert_error_contains_wrong_message() {
        let result: Result<()> = Err(ReactQaError::Config("different error".to_string()).into());
        assert_error_contains(result, "not present");
    }

    #[test]
    fn test_test_config_is_valid() {
        let config = test_config();
        assert!(config.validate().is_ok());
        assert!(config.model.api_key.is_some());
    }

    #[test]
    fn test_test_config_yaml_parses() {
        let config: Config = serde_yaml::from_str(&test_config_yaml()).unwrap();
        assert_eq!(config.agent.max_steps, 8);
        assert_eq!(config.retry.max_attempts, 2);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_mock_provider_repeats_last_response() {
        let provider = MockProvider::new(vec!["one", "two"]);
        let request = CompletionRequest::single("m", "p", 10);
        let texts = [
            provider.complete(&request).await.unwrap().message.content,
            provider.complete(&request).await.unwrap().message.content,
            provider.complete(&request).await.unwrap().message.content,
        ];
        assert_eq!(texts, ["one", "two", "two"]);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_fake_search_records_calls() {
        let search = FakeSearch::failing("quota exceeded");
        assert_eq!(search.last_max_length(), None);
        let err = search.search_and_extract("rust", Some(50)).await.unwrap_err();
        assert_eq!(err.to_string(), "Search error: quota exceeded");
        assert_eq!(search.queries(), vec!["rust".to_string()]);
        assert_eq!(search.last_max_length(), Some(Some(50)));
    }
}
