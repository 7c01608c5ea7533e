//! Google Custom Search gateway
//!
//! Queries the Custom Search JSON API for the single top result, then
//! fetches that page and extracts its visible text.

use super::extract::{extract_visible_text, truncate_chars};
use super::{SearchGateway, SearchResult};
use crate::config::SearchConfig;
use crate::error::{ReactQaError, Result};
use crate::providers::retry::{retry_async, RetryPolicy};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Snippet used when neither the page nor the search result has text
const NO_CONTENT: &str = "Content extraction failed";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: Option<String>,
}

/// Google Custom Search client
pub struct GoogleSearch {
    client: reqwest::Client,
    page_client: reqwest::Client,
    api_key: String,
    engine_id: String,
    base_url: Url,
    retry: RetryPolicy,
}

impl GoogleSearch {
    /// Create a new Google search gateway
    ///
    /// # Arguments
    ///
    /// * `config` - Search configuration (credentials, endpoint, timeouts)
    /// * `retry` - Backoff policy for the search call
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` if the API key or engine id is absent,
    /// or a configuration error if the endpoint is not a valid URL
    pub fn new(config: &SearchConfig, retry: RetryPolicy) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ReactQaError::MissingCredentials(
                    "Google API key is required. Set GOOGLE_API_KEY environment variable."
                        .to_string(),
                )
            })?;
        let engine_id = config
            .engine_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                ReactQaError::MissingCredentials(
                    "Google Search Engine ID is required. Set GOOGLE_SEARCH_ENGINE_ID environment variable."
                        .to_string(),
                )
            })?;
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ReactQaError::Config(format!("Invalid search base_url '{}': {}", config.base_url, e))
        })?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ReactQaError::Search(format!("Failed to create HTTP client: {}", e)))?;
        let page_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ReactQaError::Search(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!("Initialized Google search gateway: base_url={}", base_url);

        Ok(Self {
            client,
            page_client,
            api_key,
            engine_id,
            base_url,
            retry,
        })
    }

    async fn search_once(&self, query: &str) -> Result<SearchResponse> {
        let response = self
            .client
            .get(self.base_url.clone())
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", "1"),
            ])
            .send()
            .await
            .map_err(|e| ReactQaError::Search(format!("Search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Google search returned {}: {}", status, body);
            return Err(ReactQaError::Search(format!(
                "Search API returned {}: {}",
                status, body
            ))
            .into());
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(|e| ReactQaError::Search(format!("Failed to parse search response: {}", e)).into())
    }

    async fn fetch_page_text(&self, url: &str, max_length: Option<usize>) -> Result<String> {
        let response = self
            .page_client
            .get(url)
            .send()
            .await
            .map_err(|e| ReactQaError::Search(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReactQaError::Search(format!("HTTP {} for {}", status.as_u16(), url)).into());
        }

        let html = response
            .text()
            .await
            .map_err(|e| ReactQaError::Search(format!("Failed to read {}: {}", url, e)))?;
        let text = extract_visible_text(&html);
        if text.is_empty() {
            return Err(ReactQaError::Search(format!("No visible text at {}", url)).into());
        }

        Ok(match max_length {
            Some(limit) => truncate_chars(&text, limit),
            None => text,
        })
    }
}

#[async_trait]
impl SearchGateway for GoogleSearch {
    async fn search_and_extract(
        &self,
        query: &str,
        max_length: Option<usize>,
    ) -> Result<SearchResult> {
        tracing::debug!("Searching Google: {}", query);
        let response = retry_async(&self.retry, "google search", || self.search_once(query)).await?;

        let Some(top) = response.items.into_iter().next() else {
            return Err(ReactQaError::Search(format!(
                "No Google search results found for query: {}",
                query
            ))
            .into());
        };

        let content = match self.fetch_page_text(&top.link, max_length).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Content extraction failed, using snippet: {}", e);
                top.snippet
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| NO_CONTENT.to_string())
            }
        };

        Ok(SearchResult {
            title: top.title,
            url: top.link,
            content,
        })
    }
}
