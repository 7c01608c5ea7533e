//! Prompt text for the model gateway
//!
//! This module provides the reasoning prompt that drives each loop turn and
//! the system prompt variants used for grounded answer synthesis.

pub mod answer_prompt;
pub mod reasoning_prompt;

pub use answer_prompt::{build_answer_prompt, system_prompt_for, SYSTEM_PROMPT};
pub use reasoning_prompt::{build_reasoning_prompt, directive_for};
