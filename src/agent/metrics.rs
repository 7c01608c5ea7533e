//! Metrics for agent runs
//!
//! [`MetricsObserver`] records loop events through the `metrics` facade.
//! Nothing is exported unless the embedding application installs a
//! recorder.
//!
//! # Metrics
//!
//! - `reactqa_questions_total`: Counter of runs started
//! - `reactqa_reasoning_turns_total`: Counter of reasoning turns
//! - `reactqa_tool_calls_total{tool}`: Counter of tool executions by tool
//! - `reactqa_tool_errors_total{tool}`: Counter of failed tool executions
//! - `reactqa_termination_signals_total{reason}`: Counter of forced answers
//! - `reactqa_answers_total{outcome}`: Counter of finished runs (`ok` or `error`)
//! - `reactqa_steps_per_answer`: Histogram of history length per run
//!
//! # Examples
//!
//! ```
//! use reactqa::agent::metrics::MetricsObserver;
//! use reactqa::agent::observer::AgentObserver;
//!
//! let observer = MetricsObserver::new();
//! observer.on_question("What is 2 + 2?");
//! ```

use super::observer::AgentObserver;
use super::parser::Action;
use super::state::QaResult;
use super::termination::TerminationReason;
use crate::tools::ToolResult;
use metrics::{histogram, increment_counter};
use serde_json::Value;

/// Observer that records counters and histograms
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObserver;

impl MetricsObserver {
    /// Create a metrics observer
    pub fn new() -> Self {
        Self
    }
}

impl AgentObserver for MetricsObserver {
    fn on_question(&self, _question: &str) {
        increment_counter!("reactqa_questions_total");
    }

    fn on_reasoning(&self, _thought: Option<&str>, _action: &Action) {
        increment_counter!("reactqa_reasoning_turns_total");
    }

    fn on_tool_start(&self, tool: &str, _input: &Value) {
        increment_counter!("reactqa_tool_calls_total", "tool" => tool.to_string());
    }

    fn on_tool_result(&self, tool: &str, result: &ToolResult) {
        if !result.success {
            increment_counter!("reactqa_tool_errors_total", "tool" => tool.to_string());
        }
    }

    fn on_termination_signal(&self, reason: TerminationReason) {
        increment_counter!("reactqa_termination_signals_total", "reason" => reason.as_str());
    }

    fn on_final_answer(&self, result: &QaResult) {
        let outcome = if result.error.is_some() { "error" } else { "ok" };
        increment_counter!("reactqa_answers_total", "outcome" => outcome);
        histogram!("reactqa_steps_per_answer", result.steps.len() as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_observer_without_recorder() {
        let observer = MetricsObserver::new();
        observer.on_question("q");
        observer.on_reasoning(None, &Action::NoDirective);
        observer.on_tool_start("calculator", &Value::Null);
        observer.on_tool_result("calculator", &ToolResult::error("e".to_string()));
        observer.on_termination_signal(TerminationReason::LoopDetected);
        observer.on_final_answer(&QaResult {
            question: "q".to_string(),
            answer: "a".to_string(),
            steps: vec![],
            error: None,
        });
    }
}
