//! Termination policy
//!
//! Decides, before a reasoning turn, whether the history already warrants a
//! final answer. The reason is injected into the next prompt as a directive.

use super::state::Step;
use std::fmt;

/// Number of identical trailing steps treated as a loop
pub const LOOP_WINDOW: usize = 3;

/// Why the policy asked for a final answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// The last tool output already answers the question
    CompleteAnswer,
    /// The same tool call repeated with the same input
    LoopDetected,
    /// The history reached its step budget
    MaxSteps,
}

impl TerminationReason {
    /// Stable label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::CompleteAnswer => "complete_answer",
            TerminationReason::LoopDetected => "loop_detected",
            TerminationReason::MaxSteps => "max_steps",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_loop(steps: &[Step]) -> bool {
    if steps.len() < LOOP_WINDOW {
        return false;
    }
    let recent = &steps[steps.len() - LOOP_WINDOW..];
    let first = &recent[0];
    recent
        .iter()
        .all(|s| s.tool == first.tool && s.tool_input == first.tool_input)
}

/// Check whether the loop should force a final answer
///
/// Checks run in order: complete answer, loop, step budget. An empty history
/// never forces.
pub fn should_force_final_answer(steps: &[Step], max_steps: usize) -> Option<TerminationReason> {
    let last = steps.last()?;
    if last.self_sufficient {
        Some(TerminationReason::CompleteAnswer)
    } else if is_loop(steps) {
        Some(TerminationReason::LoopDetected)
    } else if steps.len() >= max_steps {
        Some(TerminationReason::MaxSteps)
    } else {
        None
    }
}
