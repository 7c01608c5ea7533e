//! Observation hooks for the agent loop
//!
//! The loop reports each transition to an [`AgentObserver`]. All methods
//! have no-op defaults so implementations override only what they need.

use super::parser::Action;
use super::state::QaResult;
use super::termination::TerminationReason;
use crate::tools::ToolResult;
use serde_json::Value;
use std::sync::Arc;

/// Receives loop events
pub trait AgentObserver: Send + Sync {
    /// A run started
    fn on_question(&self, _question: &str) {}

    /// A reasoning turn was parsed
    fn on_reasoning(&self, _thought: Option<&str>, _action: &Action) {}

    /// A tool is about to run
    fn on_tool_start(&self, _tool: &str, _input: &Value) {}

    /// A tool finished
    fn on_tool_result(&self, _tool: &str, _result: &ToolResult) {}

    /// The termination policy fired before a reasoning turn
    fn on_termination_signal(&self, _reason: TerminationReason) {}

    /// The run produced its result
    fn on_final_answer(&self, _result: &QaResult) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl AgentObserver for NoopObserver {}

/// Observer that emits structured `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl AgentObserver for TracingObserver {
    fn on_question(&self, question: &str) {
        tracing::info!(question = %question, "Answering question");
    }

    fn on_reasoning(&self, thought: Option<&str>, action: &Action) {
        let action = match action {
            Action::Tool { name, .. } => format!("tool:{}", name),
            Action::FinalAnswer(_) => "final_answer".to_string(),
            Action::NoDirective => "none".to_string(),
        };
        tracing::debug!(thought = thought.unwrap_or(""), action = %action, "Reasoning turn");
    }

    fn on_tool_start(&self, tool: &str, input: &Value) {
        tracing::debug!(tool = %tool, input = %input, "Executing tool");
    }

    fn on_tool_result(&self, tool: &str, result: &ToolResult) {
        if result.success {
            tracing::debug!(
                tool = %tool,
                truncated = result.truncated,
                self_sufficient = result.self_sufficient,
                "Tool succeeded"
            );
        } else {
            tracing::warn!(tool = %tool, error = result.error.as_deref().unwrap_or(""), "Tool failed");
        }
    }

    fn on_termination_signal(&self, reason: TerminationReason) {
        tracing::info!(reason = %reason, "Forcing final answer");
    }

    fn on_final_answer(&self, result: &QaResult) {
        tracing::info!(
            steps = result.steps.len(),
            error = result.error.as_deref().unwrap_or(""),
            "Run finished"
        );
    }
}

/// Fan-out to several observers, in insertion order
#[derive(Clone, Default)]
pub struct Observers {
    observers: Vec<Arc<dyn AgentObserver>>,
}

impl Observers {
    /// Create an empty fan-out
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer
    pub fn with(mut self, observer: Arc<dyn AgentObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Number of registered observers
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// True if no observers are registered
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl AgentObserver for Observers {
    fn on_question(&self, question: &str) {
        for o in &self.observers {
            o.on_question(question);
        }
    }

    fn on_reasoning(&self, thought: Option<&str>, action: &Action) {
        for o in &self.observers {
            o.on_reasoning(thought, action);
        }
    }

    fn on_tool_start(&self, tool: &str, input: &Value) {
        for o in &self.observers {
            o.on_tool_start(tool, input);
        }
    }

    fn on_tool_result(&self, tool: &str, result: &ToolResult) {
        for o in &self.observers {
            o.on_tool_result(tool, result);
        }
    }

    fn on_termination_signal(&self, reason: TerminationReason) {
        for o in &self.observers {
            o.on_termination_signal(reason);
        }
    }

    fn on_final_answer(&self, result: &QaResult) {
        for o in &self.observers {
            o.on_final_answer(result);
        }
    }
}
