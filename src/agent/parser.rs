//! Action parser for reasoning turns
//!
//! A reasoning turn is free text with `THOUGHT:`, `TOOL:`, `INPUT:` and
//! `FINAL ANSWER:` markers. Markers are located by first occurrence.
//! A tool selection takes precedence over a final answer unless the final
//! answer marker appears before the first `TOOL:`.

use crate::tools::{TOOL_CALCULATOR, TOOL_DATETIME, TOOL_DATE_CALCULATOR, TOOL_WEB_SEARCH};
use regex::Regex;
use serde_json::{json, Value};
use std::sync::OnceLock;

const THOUGHT: &str = "THOUGHT:";
const TOOL: &str = "TOOL:";
const INPUT: &str = "INPUT:";
const FINAL_ANSWER: &str = "FINAL ANSWER:";

/// What a reasoning turn asked for
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Run a tool with structured input
    Tool {
        /// Tool name as written by the model
        name: String,
        /// Parsed input arguments
        input: Value,
    },
    /// Finish with this answer
    FinalAnswer(String),
    /// Neither a usable tool call nor an answer
    NoDirective,
}

struct Patterns {
    query: Regex,
    target_date: Regex,
    days: Regex,
    integer: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        query: Regex::new(r#"\{['"]query['"]:\s*['"](.+?)['"]\}"#).expect("valid regex"),
        target_date: Regex::new(r#"\{['"]target_date['"]:\s*['"](.+?)['"]\}"#)
            .expect("valid regex"),
        days: Regex::new(r"^-?\d+$").expect("valid regex"),
        integer: Regex::new(r"\d+").expect("valid regex"),
    })
}

/// Index of the earliest of `markers` at or after `from`
fn next_marker(text: &str, from: usize, markers: &[&str]) -> usize {
    markers
        .iter()
        .filter_map(|m| text[from..].find(m).map(|i| from + i))
        .min()
        .unwrap_or(text.len())
}

fn extract_thought(text: &str) -> Option<String> {
    let start = text.find(THOUGHT)? + THOUGHT.len();
    let end = next_marker(text, start, &[TOOL, INPUT, FINAL_ANSWER]);
    let thought = text[start..end].trim();
    (!thought.is_empty()).then(|| thought.to_string())
}

/// Parse a reasoning turn into its thought and action
///
/// # Arguments
///
/// * `text` - Raw completion text
/// * `question` - The user's question, used when `INPUT:` is absent
///
/// # Examples
///
/// ```
/// use reactqa::agent::parser::{parse_response, Action};
/// use serde_json::json;
///
/// let (thought, action) = parse_response(
///     "THOUGHT: need math\nTOOL: calculator\nINPUT: 2 + 2",
///     "What is 2 + 2?",
/// );
/// assert_eq!(thought.as_deref(), Some("need math"));
/// assert_eq!(
///     action,
///     Action::Tool { name: "calculator".into(), input: json!({"expression": "2 + 2"}) }
/// );
/// ```
pub fn parse_response(text: &str, question: &str) -> (Option<String>, Action) {
    let thought = extract_thought(text);
    let tool_pos = text.find(TOOL);
    let answer_pos = text.find(FINAL_ANSWER);

    if let Some(tool_pos) = tool_pos {
        let answer_first = answer_pos.map_or(false, |a| a < tool_pos);
        if !answer_first {
            return (thought, parse_tool_turn(text, tool_pos, question));
        }
    }

    if let Some(answer_pos) = answer_pos {
        let answer = text[answer_pos + FINAL_ANSWER.len()..].trim();
        if !answer.is_empty() {
            return (thought, Action::FinalAnswer(answer.to_string()));
        }
    }

    (thought, Action::NoDirective)
}

fn parse_tool_turn(text: &str, tool_pos: usize, question: &str) -> Action {
    let name = text[tool_pos + TOOL.len()..]
        .lines()
        .next()
        .unwrap_or("")
        .trim();
    if name.is_empty() {
        return Action::NoDirective;
    }

    let input = match text.find(INPUT) {
        Some(input_pos) => {
            let start = input_pos + INPUT.len();
            let end = next_marker(text, start, &[THOUGHT, FINAL_ANSWER, TOOL]);
            parse_tool_input(name, text[start..end].trim())
        }
        None => parse_tool_input_from_question(name, question),
    };

    Action::Tool {
        name: name.to_string(),
        input,
    }
}

/// Strip one pair of matching outer quotes, then trim
fn clean_input(raw: &str) -> &str {
    let raw = raw.trim();
    let quoted = raw.len() >= 2
        && ((raw.starts_with('"') && raw.ends_with('"'))
            || (raw.starts_with('\'') && raw.ends_with('\'')));
    if quoted {
        raw[1..raw.len() - 1].trim()
    } else {
        raw
    }
}

/// Map raw `INPUT:` text to the named tool's arguments
///
/// Unknown tools get an empty object.
pub fn parse_tool_input(tool: &str, raw: &str) -> Value {
    let input = clean_input(raw);
    match tool {
        TOOL_CALCULATOR => json!({ "expression": input }),
        TOOL_DATETIME => {
            if input.is_empty() || input.eq_ignore_ascii_case("none") {
                json!({})
            } else {
                json!({ "format": input })
            }
        }
        TOOL_WEB_SEARCH => {
            let query = patterns()
                .query
                .captures(input)
                .and_then(|c| c.get(1))
                .map_or(input, |m| m.as_str());
            json!({ "query": query })
        }
        TOOL_DATE_CALCULATOR => {
            let target = patterns()
                .target_date
                .captures(input)
                .and_then(|c| c.get(1))
                .map_or(input, |m| m.as_str());
            if patterns().days.is_match(target) {
                if let Ok(days) = target.parse::<i64>() {
                    return json!({ "days": days });
                }
            }
            json!({ "target_date": target })
        }
        _ => json!({}),
    }
}

/// Derive tool arguments from the question when `INPUT:` is absent
pub fn parse_tool_input_from_question(tool: &str, question: &str) -> Value {
    if tool != TOOL_DATE_CALCULATOR {
        return json!({});
    }
    let lowered = question.to_lowercase();
    if lowered.contains("until") || lowered.contains("days to") {
        return json!({});
    }
    let days = patterns()
        .integer
        .find(question)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(0);
    json!({ "days": days })
}
