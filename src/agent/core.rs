//! Agent core implementation with the ReAct execution loop
//!
//! This module implements the loop that:
//! - Asks the model what to do next, given the question and history
//! - Executes the tool the model selected and records the observation
//! - Injects a termination directive when the history warrants an answer
//! - Enforces a hard ceiling on loop state visits

use super::observer::{AgentObserver, NoopObserver};
use super::parser::{parse_response, Action};
use super::state::{QaResult, SessionState, Step};
use super::termination::should_force_final_answer;
use crate::config::AgentConfig;
use crate::error::{ReactQaError, Result};
use crate::prompts::build_reasoning_prompt;
use crate::providers::ModelGateway;
use crate::tools::ToolRegistry;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Answer returned when the loop ends without a final answer
pub const NO_ANSWER: &str = "Unable to generate an answer";

/// Answer returned when the visit ceiling is exceeded
pub const TOO_MANY_STEPS_ANSWER: &str = "I apologize, but I wasn't able to complete the request as it required too many steps. Please try rephrasing your question or being more specific.";

fn error_answer(error: &str) -> String {
    format!(
        "I encountered an error while processing your request: {}",
        error
    )
}

/// Position in the loop state machine
#[derive(Debug, Clone, PartialEq)]
pub enum LoopState {
    /// Ask the model for the next action
    Reasoning,
    /// Run the selected tool
    ExecutingTool {
        /// Tool name
        name: String,
        /// Parsed tool input
        input: Value,
    },
    /// The run is finished
    Done,
}

/// The question-answering agent
///
/// Each call to [`Agent::run`] answers one question with a fresh session.
///
/// # Examples
///
/// ```ignore
/// use reactqa::agent::Agent;
/// use reactqa::config::AgentConfig;
///
/// # async fn example(gateway: reactqa::providers::ModelGateway, tools: reactqa::tools::ToolRegistry) -> reactqa::error::Result<()> {
/// let agent = Agent::new(gateway, tools, &AgentConfig::default())?;
/// let result = agent.run("What is 15 * 23 + 47?").await;
/// println!("{}", result.answer);
/// # Ok(())
/// # }
/// ```
pub struct Agent {
    gateway: ModelGateway,
    tools: ToolRegistry,
    config: AgentConfig,
    observer: Arc<dyn AgentObserver>,
}

impl Agent {
    /// Creates a new agent instance
    ///
    /// # Arguments
    ///
    /// * `gateway` - Model gateway used for reasoning turns
    /// * `tools` - The tool registry with available tools
    /// * `config` - Agent configuration (limits, output size)
    ///
    /// # Errors
    ///
    /// Returns `ReactQaError::Config` if either limit is zero
    pub fn new(gateway: ModelGateway, tools: ToolRegistry, config: &AgentConfig) -> Result<Self> {
        if config.recursion_limit == 0 {
            return Err(ReactQaError::Config(
                "recursion_limit must be greater than 0".to_string(),
            )
            .into());
        }
        if config.max_steps == 0 {
            return Err(
                ReactQaError::Config("max_steps must be greater than 0".to_string()).into(),
            );
        }

        Ok(Self {
            gateway,
            tools,
            config: config.clone(),
            observer: Arc::new(NoopObserver),
        })
    }

    /// Replace the observer that receives loop events
    pub fn with_observer(mut self, observer: Arc<dyn AgentObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Returns a reference to the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Answer a question
    ///
    /// Never fails: gateway errors and the visit ceiling are converted into
    /// an answer text with `error` set on the result.
    pub async fn run(&self, question: &str) -> QaResult {
        self.observer.on_question(question);
        let mut state = SessionState::new(question);

        if let Err(e) = self.drive(&mut state).await {
            let message = e.to_string();
            warn!("Run ended with error: {}", message);
            let answer = match e.downcast_ref::<ReactQaError>() {
                Some(ReactQaError::MaxIterationsExceeded { .. }) => {
                    TOO_MANY_STEPS_ANSWER.to_string()
                }
                _ => error_answer(&message),
            };
            state.error = Some(message);
            state.set_final_answer(answer);
        }

        let result = state.into_result(NO_ANSWER);
        self.observer.on_final_answer(&result);
        result
    }

    async fn drive(&self, state: &mut SessionState) -> Result<()> {
        let limit = self.config.recursion_limit;
        let mut current = LoopState::Reasoning;
        let mut visits = 0usize;

        loop {
            if current == LoopState::Done {
                return Ok(());
            }

            visits += 1;
            if visits > limit {
                return Err(ReactQaError::MaxIterationsExceeded {
                    limit,
                    message: format!("{} steps taken without a final answer", state.steps().len()),
                }
                .into());
            }

            current = match current {
                LoopState::Reasoning => self.reason(state).await?,
                LoopState::ExecutingTool { name, input } => {
                    self.execute_tool(state, name, input).await
                }
                LoopState::Done => LoopState::Done,
            };
        }
    }

    async fn reason(&self, state: &mut SessionState) -> Result<LoopState> {
        let directive = should_force_final_answer(state.steps(), self.config.max_steps);
        if let Some(reason) = directive {
            debug!("Termination signal: {}", reason);
            self.observer.on_termination_signal(reason);
        }

        let prompt = build_reasoning_prompt(
            state.question(),
            state.steps(),
            directive,
            &self.tools.tools_description(),
        );
        let text = self
            .gateway
            .generate_reasoning(&prompt, self.gateway.reasoning_max_tokens())
            .await?;

        let (thought, action) = parse_response(&text, state.question());
        self.observer.on_reasoning(thought.as_deref(), &action);
        state.thought = thought;

        Ok(match action {
            Action::Tool { name, input } => {
                state.select_tool(name.clone(), input.clone());
                LoopState::ExecutingTool { name, input }
            }
            Action::FinalAnswer(answer) => {
                state.clear_tool();
                state.set_final_answer(answer);
                LoopState::Done
            }
            Action::NoDirective => {
                state.clear_tool();
                LoopState::Done
            }
        })
    }

    async fn execute_tool(&self, state: &mut SessionState, name: String, input: Value) -> LoopState {
        let executor = match self.tools.get(&name) {
            Some(executor) => executor,
            None => {
                let error = ReactQaError::UnknownTool(name).to_string();
                warn!("{}", error);
                state.observation = Some(format!("Error: {}", error));
                state.set_final_answer(error_answer(&error));
                state.error = Some(error);
                return LoopState::Done;
            }
        };

        self.observer.on_tool_start(&name, &input);
        let result = executor
            .execute(input.clone())
            .await
            .truncate_if_needed(self.config.tools.max_output_size);
        self.observer.on_tool_result(&name, &result);

        let thought = state.thought.clone().unwrap_or_default();
        let self_sufficient = result.success && result.self_sufficient;
        state.record_step(Step::new(
            thought,
            name,
            &input,
            result.to_message(),
            self_sufficient,
        ));
        state.clear_tool();
        LoopState::Reasoning
    }
}
