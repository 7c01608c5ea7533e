//! Reasoning turn prompt
//!
//! The reasoning prompt carries the question, the replayed history, an
//! optional termination directive, the tool catalog and the response
//! format the action parser understands.

use crate::agent::state::Step;
use crate::agent::termination::TerminationReason;

const INSTRUCTIONS: &str = r#"Based on the question and any previous observations, reason about what to do next.

IMPORTANT: Check if you already have the complete answer from previous tool calls!
- If a tool has already provided the exact answer needed, provide your FINAL ANSWER immediately
- Do NOT call the same tool again with the same input
- Only use another tool if you need different or additional information

You can either:
1. Use a tool to gather more information (ONLY if needed)
2. Provide a final answer if you have enough information

Think step by step about what information is needed to answer the question.

NOTE: For weather questions without a specific location, you should acknowledge that you cannot provide current weather without knowing the location and provide a final answer explaining this limitation.

IMPORTANT: You MUST use tools to gather information. Do NOT try to answer without using tools first.

If you need to use a tool, respond in this format:
THOUGHT: [Your reasoning about what to do next]
TOOL: [tool_name]
INPUT: [For calculator: the expression, for web_search: the query, for datecalculator: just the number of days OR the target date string, for datetime: leave empty or specify format]

Only after you have used tools and gathered information, you can provide a final answer:
THOUGHT: [Your reasoning about why you can now answer]
FINAL ANSWER: [Your complete answer to the question based on the tool observations]

Rules:
- For ANY math calculation, you MUST use the calculator tool
- For current date/time questions (e.g., "what day is today"), use the datetime tool
- For date calculations (e.g., "what day will it be in X days" or "how many days until [date]"), use the datecalculator tool
- For ANY factual question, you MUST use the web_search tool
- NEVER provide an answer without first using the appropriate tool
- If a tool returns an error or unhelpful result after 2-3 attempts, provide the best answer you can based on available information
- If you see "Web search failed" multiple times, acknowledge the limitation and provide a final answer
- Weather questions require location - if no location is specified, explain this in your final answer
"#;

/// Directive paragraph injected when the termination policy fires
pub fn directive_for(reason: TerminationReason) -> &'static str {
    match reason {
        TerminationReason::CompleteAnswer => {
            "IMPORTANT: The previous tool call has already provided the complete answer to the question. You should now provide your FINAL ANSWER based on this information. Do NOT call the same tool again."
        }
        TerminationReason::LoopDetected => {
            "CRITICAL: STOP USING TOOLS! You are stuck in a loop. The same tool with the same input has been used multiple times. You MUST provide a FINAL ANSWER NOW. Do NOT use any more tools."
        }
        TerminationReason::MaxSteps => {
            "CRITICAL: MAXIMUM STEPS REACHED! You MUST provide a FINAL ANSWER NOW. Do NOT use any more tools."
        }
    }
}

/// Render the history replay, one block per step
fn render_steps(steps: &[Step]) -> String {
    let mut out = String::from("Previous steps:\n");
    for step in steps {
        if !step.thought.is_empty() {
            out.push_str(&format!("Thought: {}\n", step.thought));
        }
        out.push_str(&format!(
            "Tool used: {} with input: {}\n",
            step.tool, step.tool_input
        ));
        out.push_str(&format!("Observation: {}\n", step.observation));
        out.push('\n');
    }
    out
}

/// Build the prompt for one reasoning turn
///
/// # Arguments
///
/// * `question` - The user's question
/// * `steps` - History so far, replayed in order
/// * `directive` - Termination signal to inject, if any
/// * `tools_description` - Tool catalog, embedded verbatim
///
/// # Examples
///
/// ```
/// use reactqa::prompts::build_reasoning_prompt;
///
/// let prompt = build_reasoning_prompt(
///     "What is 2 + 2?",
///     &[],
///     None,
///     "- calculator: Performs mathematical calculations.",
/// );
/// assert!(prompt.starts_with("Question: What is 2 + 2?"));
/// assert!(prompt.contains("- calculator: Performs mathematical calculations."));
/// ```
pub fn build_reasoning_prompt(
    question: &str,
    steps: &[Step],
    directive: Option<TerminationReason>,
    tools_description: &str,
) -> String {
    let mut context = format!("Question: {}\n\n", question);

    if !steps.is_empty() {
        context.push_str(&render_steps(steps));
    }

    if let Some(reason) = directive {
        context.push_str("\n\n");
        context.push_str(directive_for(reason));
        context.push_str("\n\n");
    }

    format!(
        "{}\n\nAvailable tools:\n{}\n\n{}",
        context, tools_description, INSTRUCTIONS
    )
}
