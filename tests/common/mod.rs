use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reactqa::config::Config;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Configuration pointing both gateways at `server`, with instant retries
#[allow(dead_code)]
pub fn mock_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.model.api_key = Some("sk-ant-test".to_string());
    config.model.base_url = server.uri();
    config.search.api_key = Some("google-test".to_string());
    config.search.engine_id = Some("engine-test".to_string());
    config.search.base_url = format!("{}/customsearch/v1", server.uri());
    config.search.fetch_timeout_seconds = 2;
    config.retry.initial_delay_ms = 0;
    config.retry.max_delay_ms = 0;
    config
}

/// Anthropic Messages API response body carrying `text`
#[allow(dead_code)]
pub fn anthropic_body(text: &str) -> Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": "claude-sonnet-4-20250514",
        "content": [{ "type": "text", "text": text }],
        "stop_reason": "end_turn",
        "usage": { "input_tokens": 120, "output_tokens": 30 }
    })
}

/// Mount completions answered in order, one request each
///
/// The last completion keeps answering after the others are used up.
#[allow(dead_code)]
pub async fn mount_completions(server: &MockServer, texts: &[&str]) {
    for (i, text) in texts.iter().enumerate() {
        let mock = Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(anthropic_body(text)));
        let mock = if i + 1 < texts.len() {
            mock.up_to_n_times(1)
        } else {
            mock
        };
        mock.mount(server).await;
    }
}

/// Custom Search response with a single item
#[allow(dead_code)]
pub fn search_body(title: &str, link: &str, snippet: &str) -> Value {
    json!({
        "kind": "customsearch#search",
        "items": [{ "title": title, "link": link, "snippet": snippet }]
    })
}
