//! Current-time tool

use super::{Clock, Tool, ToolExecutor, ToolParameter, ToolResult, TOOL_DATETIME};
use async_trait::async_trait;
use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, NaiveDateTime};
use std::fmt::Write;
use std::sync::Arc;

/// Reports the current date and time from the injected clock
pub struct DateTimeTool {
    clock: Arc<dyn Clock>,
}

impl DateTimeTool {
    /// Create a new datetime tool
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl ToolExecutor for DateTimeTool {
    fn tool_definition(&self) -> Tool {
        Tool::new(
            TOOL_DATETIME,
            "Gets current date, time, day of week, and other temporal information. Use when \
             questions ask about 'today', 'current time', 'what day', etc.",
            vec![ToolParameter::optional(
                "format",
                "strftime-style format string for the output",
            )],
        )
    }

    async fn execute(&self, args: serde_json::Value) -> ToolResult {
        let now = self.clock.now();
        match args.get("format").and_then(|f| f.as_str()) {
            Some(format) if !format.is_empty() => match format_now(&now, format) {
                Some(rendered) => ToolResult::success(rendered),
                None => ToolResult::error(format!("Invalid format string '{}'", format)),
            },
            _ => ToolResult::success(summary(&now)).self_sufficient(),
        }
    }
}

fn summary(now: &NaiveDateTime) -> String {
    format!(
        "Current date and time:\n\
         - Date: {}\n\
         - Time: {}\n\
         - Day: {}\n\
         - Month: {}\n\
         - Year: {}\n\
         - Timezone: Local system time",
        now.format("%Y-%m-%d"),
        now.format("%H:%M:%S"),
        now.format("%A"),
        now.format("%B"),
        now.year()
    )
}

/// Format `now` with a strftime string, `None` if the string is unusable
fn format_now(now: &NaiveDateTime, format: &str) -> Option<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }
    let mut rendered = String::new();
    // Timezone specifiers have nothing to render on a naive time and fail here.
    write!(rendered, "{}", now.format_with_items(items.into_iter())).ok()?;
    Some(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::FixedClock;
    use chrono::NaiveDate;
    use serde_json::json;

    fn tool() -> DateTimeTool {
        let now = NaiveDate::from_ymd_opt(2025, 11, 27)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();
        DateTimeTool::new(Arc::new(FixedClock::new(now)))
    }

    #[tokio::test]
    async fn test_default_summary() {
        let result = tool().execute(json!({})).await;
        assert!(result.success);
        assert!(result.self_sufficient);
        assert_eq!(
            result.to_message(),
            "Current date and time:\n- Date: 2025-11-27\n- Time: 14:05:09\n- Day: Thursday\n\
             - Month: November\n- Year: 2025\n- Timezone: Local system time"
        );
    }

    #[tokio::test]
    async fn test_custom_format_is_not_self_sufficient() {
        let result = tool().execute(json!({"format": "%A, %d %B"})).await;
        assert!(result.success);
        assert!(!result.self_sufficient);
        assert_eq!(result.output, "Thursday, 27 November");
    }

    #[tokio::test]
    async fn test_empty_format_falls_back_to_summary() {
        let result = tool().execute(json!({"format": ""})).await;
        assert!(result.output.starts_with("Current date and time:"));
    }

    #[tokio::test]
    async fn test_invalid_format() {
        let result = tool().execute(json!({"format": "%Q"})).await;
        assert!(!result.success);
        assert_eq!(result.to_message(), "Error: Invalid format string '%Q'");
    }

    #[tokio::test]
    async fn test_timezone_format_on_naive_time_is_invalid() {
        let result = tool().execute(json!({"format": "%H:%M %z"})).await;
        assert_eq!(result.to_message(), "Error: Invalid format string '%H:%M %z'");
    }
}
