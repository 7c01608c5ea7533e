//! Console progress output
//!
//! Progress goes to stderr so stdout carries only the answer.

use crate::agent::{Action, AgentObserver, QaResult, TerminationReason};
use crate::tools::ToolResult;
use colored::Colorize;
use serde_json::Value;

/// Lines of a multi-line tool output shown in progress
const MAX_OUTPUT_LINES: usize = 5;

/// Characters of a single-line tool output shown in progress
const MAX_OUTPUT_CHARS: usize = 100;

/// Observer printing loop progress to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleObserver;

/// Condense an observation for the progress display
pub fn format_tool_output(observation: &str) -> String {
    let lines: Vec<&str> = observation.lines().collect();
    if lines.len() > 1 {
        let mut out = String::from("   Output:");
        for line in lines.iter().take(MAX_OUTPUT_LINES) {
            if !line.trim().is_empty() {
                out.push_str(&format!("\n     {}", line));
            }
        }
        if lines.len() > MAX_OUTPUT_LINES {
            out.push_str(&format!(
                "\n     ... ({} more lines)",
                lines.len() - MAX_OUTPUT_LINES
            ));
        }
        out
    } else {
        let shown: String = observation.chars().take(MAX_OUTPUT_CHARS).collect();
        let ellipsis = if observation.chars().count() > MAX_OUTPUT_CHARS {
            "..."
        } else {
            ""
        };
        format!("   Output: {}{}", shown, ellipsis)
    }
}

impl AgentObserver for ConsoleObserver {
    fn on_question(&self, question: &str) {
        eprintln!("{} {}", "Question:".bold(), question);
    }

    fn on_reasoning(&self, thought: Option<&str>, _action: &Action) {
        if let Some(first_line) = thought.and_then(|t| t.lines().next()) {
            eprintln!("\n{} {}", "Thought:".cyan().bold(), first_line.trim());
        }
    }

    fn on_tool_start(&self, tool: &str, input: &Value) {
        eprintln!("\n{} {}", "Tool:".yellow().bold(), tool);
        eprintln!("   Input: {}", input);
    }

    fn on_tool_result(&self, _tool: &str, result: &ToolResult) {
        let output = format_tool_output(&result.to_message());
        if result.success {
            eprintln!("{}", output);
        } else {
            eprintln!("{}", output.red());
        }
    }

    fn on_termination_signal(&self, reason: TerminationReason) {
        eprintln!("\n{} {}", "Wrapping up:".magenta(), reason);
    }

    fn on_final_answer(&self, result: &QaResult) {
        if let Some(error) = &result.error {
            eprintln!("\n{} {}", "Error:".red().bold(), error);
        }
    }
}
