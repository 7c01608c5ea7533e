//! Session state for a single question
//!
//! The loop controller owns one [`SessionState`] per run. The history of
//! executed tools is append-only and the final answer can be set once.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One executed tool call in the session history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Reasoning text that preceded the call (may be empty)
    pub thought: String,
    /// Tool name
    pub tool: String,
    /// Serialized JSON input
    pub tool_input: String,
    /// Tool output or error message
    pub observation: String,
    /// True when the tool marked its output as a complete answer
    pub self_sufficient: bool,
}

impl Step {
    /// Build a step, serializing the tool input
    pub fn new(
        thought: impl Into<String>,
        tool: impl Into<String>,
        input: &Value,
        observation: impl Into<String>,
        self_sufficient: bool,
    ) -> Self {
        Self {
            thought: thought.into(),
            tool: tool.into(),
            tool_input: input.to_string(),
            observation: observation.into(),
            self_sufficient,
        }
    }
}

/// Mutable state of one question's run
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    question: String,
    /// Most recent reasoning text
    pub thought: Option<String>,
    /// Tool selected by the latest reasoning turn
    pub tool_name: Option<String>,
    /// Input for the selected tool
    pub tool_input: Option<Value>,
    /// Most recent tool output
    pub observation: Option<String>,
    steps: Vec<Step>,
    final_answer: Option<String>,
    /// Error that ended the run, if any
    pub error: Option<String>,
}

impl SessionState {
    /// Start a session for `question`
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }

    /// The question being answered
    pub fn question(&self) -> &str {
        &self.question
    }

    /// History of executed tools, oldest first
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Append a step to the history
    pub fn record_step(&mut self, step: Step) {
        self.observation = Some(step.observation.clone());
        self.steps.push(step);
    }

    /// The final answer, once set
    pub fn final_answer(&self) -> Option<&str> {
        self.final_answer.as_deref()
    }

    /// Set the final answer
    ///
    /// Returns `false` and leaves the existing answer in place when one was
    /// already set.
    pub fn set_final_answer(&mut self, answer: impl Into<String>) -> bool {
        if self.final_answer.is_some() {
            return false;
        }
        self.final_answer = Some(answer.into());
        true
    }

    /// Record a tool selection from a reasoning turn
    pub fn select_tool(&mut self, name: impl Into<String>, input: Value) {
        self.tool_name = Some(name.into());
        self.tool_input = Some(input);
    }

    /// Clear the pending tool selection
    pub fn clear_tool(&mut self) {
        self.tool_name = None;
        self.tool_input = None;
    }

    /// Consume the session into its result
    ///
    /// `fallback` is used when no final answer was produced.
    pub fn into_result(self, fallback: &str) -> QaResult {
        QaResult {
            question: self.question,
            answer: self.final_answer.unwrap_or_else(|| fallback.to_string()),
            steps: self.steps,
            error: self.error,
        }
    }
}

/// Outcome of answering one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaResult {
    /// The question as asked
    pub question: String,
    /// Final answer text (never empty)
    pub answer: String,
    /// Executed tool steps, oldest first
    pub steps: Vec<Step>,
    /// Error that ended the run, if any
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_step_serializes_input() {
        let step = Step::new("t", "calculator", &json!({"expression": "2+2"}), "Result: 4", true);
        assert_eq!(step.tool_input, r#"{"expression":"2+2"}"#);
    }

    #[test]
    fn test_final_answer_is_set_once() {
        let mut state = SessionState::new("q");
        assert!(state.set_final_answer("first"));
        assert!(!state.set_final_answer("second"));
        assert_eq!(state.final_answer(), Some("first"));
    }

    #[test]
    fn test_record_step_appends_and_tracks_observation() {
        let mut state = SessionState::new("q");
        state.record_step(Step::new("", "datetime", &json!({}), "one", false));
        state.record_step(Step::new("", "datetime", &json!({}), "two", false));
        assert_eq!(state.steps().len(), 2);
        assert_eq!(state.steps()[0].observation, "one");
        assert_eq!(state.observation.as_deref(), Some("two"));
    }

    #[test]
    fn test_into_result_uses_fallback() {
        let state = SessionState::new("What?");
        let result = state.into_result("Unable to generate an answer");
        assert_eq!(result.question, "What?");
        assert_eq!(result.answer, "Unable to generate an answer");
        assert!(result.error.is_none());
    }
}
