//! Search gateway for reactqa
//!
//! Turns a query into the text of its top web result: search, fetch the
//! result page, extract visible text, fall back to the snippet.

pub mod extract;
pub mod google;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use google::GoogleSearch;

/// Top search result with its extracted (or fallback) content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title
    pub title: String,
    /// Result link
    pub url: String,
    /// Extracted page text, or the search snippet when extraction failed
    pub content: String,
}

/// Query to top-result content
///
/// Implementations raise only when the search itself fails or yields no
/// results; page extraction failures degrade to the snippet.
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Search and extract the top result
    ///
    /// # Arguments
    ///
    /// * `query` - Search query text
    /// * `max_length` - Content budget in characters, `None` for unlimited
    ///
    /// # Errors
    ///
    /// Returns error if the search call fails after retries or returns
    /// zero results
    async fn search_and_extract(&self, query: &str, max_length: Option<usize>)
        -> Result<SearchResult>;
}
