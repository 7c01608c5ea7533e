//! Web-lookup tool

use super::{Tool, ToolExecutor, ToolParameter, ToolResult, TOOL_WEB_SEARCH};
use crate::search::SearchGateway;
use async_trait::async_trait;
use std::sync::Arc;

/// Content budget passed to the search gateway (characters)
pub const CONTENT_BUDGET: usize = 3000;

/// Searches the web and returns the top result's text
pub struct WebSearchTool {
    search: Arc<dyn SearchGateway>,
    max_length: usize,
}

impl WebSearchTool {
    /// Create a web search tool over the given gateway
    pub fn new(search: Arc<dyn SearchGateway>) -> Self {
        Self {
            search,
            max_length: CONTENT_BUDGET,
        }
    }

    /// Override the content budget
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }
}

#[async_trait]
impl ToolExecutor for WebSearchTool {
    fn tool_definition(&self) -> Tool {
        Tool::new(
            TOOL_WEB_SEARCH,
            "Searches the web for current information. Use for facts, news, general knowledge, \
             and any questions requiring up-to-date information from the internet.",
            vec![ToolParameter::required("query", "Search query")],
        )
    }

    async fn execute(&self, args: serde_json::Value) -> ToolResult {
        let Some(query) = args.get("query").and_then(|q| q.as_str()) else {
            return ToolResult::error(
                "Web search failed: missing required argument 'query'".to_string(),
            );
        };

        match self
            .search
            .search_and_extract(query, Some(self.max_length))
            .await
        {
            Ok(result) => ToolResult::success(format!(
                "Found information from {}:\n\n{}",
                result.title, result.content
            ))
            .with_metadata("url".to_string(), result.url),
            Err(e) => {
                tracing::warn!(query = %query, "Web search failed: {}", e);
                ToolResult::error(format!("Web search failed: {}", e))
            }
        }
    }
}
