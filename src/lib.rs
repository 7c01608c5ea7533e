//! reactqa - ReAct question-answering agent library
//!
//! This library provides a question-answering agent that reasons step by
//! step, calls tools (calculator, date and time, web search) and answers
//! from what the tools observed.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `agent`: Loop controller, session state, action parser and termination policy
//! - `providers`: Model provider abstraction, Anthropic client, retry and gateway
//! - `search`: Google Custom Search client and page text extraction
//! - `tools`: Tool contract, registry and the four built-in tools
//! - `prompts`: Reasoning and answer synthesis prompt text
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`, `commands`: Command-line interface and its handler
//!
//! # Example
//!
//! ```no_run
//! use reactqa::cli::Cli;
//! use reactqa::commands::ask::build_agent;
//! use reactqa::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cli = Cli::parse_args();
//!     let config = Config::load(cli.config.as_deref())?;
//!     config.validate()?;
//!
//!     let agent = build_agent(&config)?;
//!     let result = agent.run(&cli.question).await;
//!     println!("{}", result.answer);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod search;
pub mod tools;

// Re-export commonly used types
pub use agent::{Agent, QaResult};
pub use config::Config;
pub use error::{ReactQaError, Result};

#[cfg(test)]
pub mod test_utils;
