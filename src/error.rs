//! Error types for reactqa
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for reactqa operations
///
/// Tool-local failures never surface as this type; tools report them as
/// observation text. These variants cover configuration, the two external
/// gateways and the loop controller itself.
#[derive(Error, Debug)]
pub enum ReactQaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required credential or identifier was not configured
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Model provider errors (API calls, bad responses)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Search gateway errors (search API failures, zero results)
    #[error("Search error: {0}")]
    Search(String),

    /// The model selected a tool that is not registered
    #[error("Tool '{0}' not found")]
    UnknownTool(String),

    /// Agent exceeded its hard iteration ceiling
    #[error("Agent exceeded maximum iterations: limit={limit}, {message}")]
    MaxIterationsExceeded {
        /// The configured iteration limit
        limit: usize,
        /// Additional context about the failure
        message: String,
    },
}

/// Result type alias for reactqa operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
