//! Configuration management for reactqa
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, ReactQaError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for reactqa
///
/// Holds the model gateway, search gateway, agent loop and retry settings.
/// Credentials are optional here; the components that need them reject a
/// missing value at construction time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Language model settings
    #[serde(default)]
    pub model: ModelConfig,
    /// Web search settings
    #[serde(default)]
    pub search: SearchConfig,
    /// Agent loop settings
    #[serde(default)]
    pub agent: AgentConfig,
    /// Retry policy shared by both gateways
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Language model (Anthropic Messages API) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// API key, normally taken from `ANTHROPIC_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL (overridable for tests and proxies)
    #[serde(default = "default_model_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Token budget for a reasoning turn
    #[serde(default = "default_reasoning_max_tokens")]
    pub reasoning_max_tokens: u32,

    /// Token budget for a synthesized answer
    #[serde(default = "default_answer_max_tokens")]
    pub answer_max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-request timeout (seconds)
    #[serde(default = "default_model_timeout")]
    pub timeout_seconds: u64,
}

fn default_model_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_reasoning_max_tokens() -> u32 {
    500
}

fn default_answer_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.3
}

fn default_model_timeout() -> u64 {
    120
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_model_base_url(),
            model: default_model(),
            reasoning_max_tokens: default_reasoning_max_tokens(),
            answer_max_tokens: default_answer_max_tokens(),
            temperature: default_temperature(),
            timeout_seconds: default_model_timeout(),
        }
    }
}

/// Google Custom Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// API key, normally taken from `GOOGLE_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    /// Search engine (cx) identifier, normally from `GOOGLE_SEARCH_ENGINE_ID`
    #[serde(default)]
    pub engine_id: Option<String>,

    /// Search endpoint
    #[serde(default = "default_search_base_url")]
    pub base_url: String,

    /// Content budget for extracted page text (characters)
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,

    /// Timeout for fetching the top result page (seconds)
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,

    /// User agent sent when fetching the top result page
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_search_base_url() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

fn default_max_content_length() -> usize {
    3000
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            engine_id: None,
            base_url: default_search_base_url(),
            max_content_length: default_max_content_length(),
            fetch_timeout_seconds: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Agent loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// History length at which the termination policy forces a final answer
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Hard ceiling on loop state visits (reasoning turns plus tool runs)
    #[serde(default = "default_recursion_limit")]
    pub recursion_limit: usize,

    /// Tool execution settings
    #[serde(default)]
    pub tools: ToolsConfig,
}

fn default_max_steps() -> usize {
    10
}

fn default_recursion_limit() -> usize {
    25
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            recursion_limit: default_recursion_limit(),
            tools: ToolsConfig::default(),
        }
    }
}

/// Tool execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Maximum observation size in bytes before truncation
    #[serde(default = "default_max_output")]
    pub max_output_size: usize,
}

fn default_max_output() -> usize {
    16 * 1024
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            max_output_size: default_max_output(),
        }
    }
}

/// Retry policy configuration for gateway calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt (milliseconds)
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Upper bound for any single delay (milliseconds)
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay() -> u64 {
    2000
}

fn default_max_delay() -> u64 {
    10_000
}

impl RetryConfig {
    /// Initial backoff as a `Duration`
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Maximum backoff as a `Duration`
    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
        }
    }
}

impl Config {
    /// Load configuration from an optional file with environment overrides
    ///
    /// The CLI contributes only the file path; `-v` affects logging and
    /// output, not configuration.
    ///
    /// # Arguments
    ///
    /// * `path` - Optional path to a YAML configuration file (`-c`)
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) if Path::new(path).exists() => Self::from_file(path)?,
            Some(path) => {
                tracing::warn!("Config file not found at {}, using defaults", path);
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_vars();

        Ok(config)
    }

    /// Parse a configuration file
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ReactQaError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ReactQaError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        // Credentials
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            self.model.api_key = Some(key);
        }

        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            self.search.api_key = Some(key);
        }

        if let Ok(engine_id) = std::env::var("GOOGLE_SEARCH_ENGINE_ID") {
            self.search.engine_id = Some(engine_id);
        }

        // Endpoint and model overrides
        if let Ok(model) = std::env::var("REACTQA_MODEL") {
            self.model.model = model;
        }

        if let Ok(base_url) = std::env::var("REACTQA_ANTHROPIC_BASE_URL") {
            self.model.base_url = base_url;
        }

        if let Ok(base_url) = std::env::var("REACTQA_SEARCH_BASE_URL") {
            self.search.base_url = base_url;
        }

        // Agent overrides
        if let Ok(max_steps) = std::env::var("REACTQA_MAX_STEPS") {
            if let Ok(value) = max_steps.parse() {
                self.agent.max_steps = value;
            } else {
                tracing::warn!("Invalid REACTQA_MAX_STEPS: {}", max_steps);
            }
        }

        if let Ok(limit) = std::env::var("REACTQA_RECURSION_LIMIT") {
            if let Ok(value) = limit.parse() {
                self.agent.recursion_limit = value;
            } else {
                tracing::warn!("Invalid REACTQA_RECURSION_LIMIT: {}", limit);
            }
        }
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges.
    /// Credential presence is not checked here.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.model.model.trim().is_empty() {
            return Err(ReactQaError::Config("model.model cannot be empty".to_string()).into());
        }

        if self.model.reasoning_max_tokens == 0 || self.model.answer_max_tokens == 0 {
            return Err(ReactQaError::Config(
                "model token budgets must be greater than 0".to_string(),
            )
            .into());
        }

        if !(0.0..=1.0).contains(&self.model.temperature) {
            return Err(ReactQaError::Config(
                "model.temperature must be between 0.0 and 1.0".to_string(),
            )
            .into());
        }

        if self.agent.max_steps == 0 {
            return Err(
                ReactQaError::Config("agent.max_steps must be greater than 0".to_string()).into(),
            );
        }

        if self.agent.recursion_limit == 0 {
            return Err(ReactQaError::Config(
                "agent.recursion_limit must be greater than 0".to_string(),
            )
            .into());
        }

        if self.agent.recursion_limit > 1000 {
            return Err(ReactQaError::Config(
                "agent.recursion_limit must be less than or equal to 1000".to_string(),
            )
            .into());
        }

        if self.agent.tools.max_output_size == 0 {
            return Err(ReactQaError::Config(
                "agent.tools.max_output_size must be greater than 0".to_string(),
            )
            .into());
        }

        if self.search.max_content_length == 0 {
            return Err(ReactQaError::Config(
                "search.max_content_length must be greater than 0".to_string(),
            )
            .into());
        }

        if self.retry.max_attempts == 0 {
            return Err(
                ReactQaError::Config("retry.max_attempts must be at least 1".to_string()).into(),
            );
        }

        if self.retry.initial_delay_ms > self.retry.max_delay_ms {
            return Err(ReactQaError::Config(
                "retry.initial_delay_ms must not exceed retry.max_delay_ms".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model.model, "claude-sonnet-4-20250514");
        assert_eq!(config.model.reasoning_max_tokens, 500);
        assert_eq!(config.agent.max_steps, 10);
        assert_eq!(config.agent.recursion_limit, 25);
        assert_eq!(config.search.max_content_length, 3000);
        assert_eq!(config.search.fetch_timeout_seconds, 10);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.initial_delay(), Duration::from_secs(2));
        assert_eq!(config.retry.max_delay(), Duration::from_secs(10));
        assert!(config.model.api_key.is_none());
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_max_steps() {
        let mut config = Config::default();
        config.agent.max_steps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_recursion_limit() {
        let mut config = Config::default();
        config.agent.recursion_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_temperature_out_of_range() {
        let mut config = Config::default();
        config.model.temperature = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_attempts() {
        let mut config = Config::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_inverted_delays() {
        let mut config = Config::default();
        config.retry.initial_delay_ms = 20_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
model:
  model: claude-3-5-haiku-latest
  reasoning_max_tokens: 300
search:
  max_content_length: 1500
agent:
  max_steps: 6
retry:
  max_attempts: 2
  initial_delay_ms: 10
  max_delay_ms: 20
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.model.model, "claude-3-5-haiku-latest");
        assert_eq!(config.model.reasoning_max_tokens, 300);
        assert_eq!(config.model.answer_max_tokens, 1000);
        assert_eq!(config.search.max_content_length, 1500);
        assert_eq!(config.agent.max_steps, 6);
        assert_eq!(config.agent.recursion_limit, 25);
        assert_eq!(config.retry.max_attempts, 2);
    }

    #[test]
    fn test_config_from_empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.agent.max_steps, 10);
        assert_eq!(config.model.temperature, 0.3);
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "agent: [not, a, map]").unwrap();
        let result = Config::from_file(path.to_str().unwrap());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse config"));
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        let config = Config::load(Some("nonexistent.yaml")).unwrap();
        assert_eq!(config.agent.max_steps, 10);
    }

    #[test]
    #[serial]
    fn test_load_applies_env_over_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "agent:\n  max_steps: 6\n  recursion_limit: 30\n").unwrap();
        std::env::set_var("REACTQA_MAX_STEPS", "3");

        let config = Config::load(path.to_str()).unwrap();
        std::env::remove_var("REACTQA_MAX_STEPS");

        assert_eq!(config.agent.max_steps, 3);
        assert_eq!(config.agent.recursion_limit, 30);
    }

    #[test]
    #[serial]
    fn test_apply_env_vars_reads_credentials() {
        std::env::set_var("ANTHROPIC_API_KEY", "sk-test");
        std::env::set_var("GOOGLE_API_KEY", "g-test");
        std::env::set_var("GOOGLE_SEARCH_ENGINE_ID", "cx-test");
        std::env::set_var("REACTQA_MAX_STEPS", "4");

        let config = Config::load(None).unwrap();

        std::env::remove_var("ANTHROPIC_API_KEY");
        std::env::remove_var("GOOGLE_API_KEY");
        std::env::remove_var("GOOGLE_SEARCH_ENGINE_ID");
        std::env::remove_var("REACTQA_MAX_STEPS");

        assert_eq!(config.model.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.search.api_key.as_deref(), Some("g-test"));
        assert_eq!(config.search.engine_id.as_deref(), Some("cx-test"));
        assert_eq!(config.agent.max_steps, 4);
    }

    #[test]
    #[serial]
    fn test_apply_env_vars_ignores_invalid_numbers() {
        std::env::set_var("REACTQA_RECURSION_LIMIT", "lots");
        let config = Config::load(None).unwrap();
        std::env::remove_var("REACTQA_RECURSION_LIMIT");
        assert_eq!(config.agent.recursion_limit, 25);
    }
}
