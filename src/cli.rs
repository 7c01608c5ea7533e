//! Command-line interface definition for reactqa
//!
//! This module defines the CLI structure using clap's derive API.

use clap::Parser;

/// reactqa - ask a question, get an answer researched with tools
///
/// The agent reasons about the question, calls calculator, date and web
/// search tools as needed, and prints the final answer.
#[derive(Parser, Debug, Clone)]
#[command(name = "reactqa")]
#[command(version, about, long_about = None)]
#[command(after_help = "Examples:
  reactqa \"What is 25 * 4 + 10?\"
  reactqa \"What day of the week is it today?\"
  reactqa -v \"Who is the current president of France?\"")]
pub struct Cli {
    /// The question to answer
    pub question: String,

    /// Show detailed reasoning steps and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to an optional YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
