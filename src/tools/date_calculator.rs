//! Date-offset tool
//!
//! Two modes: offset today by a signed number of days, or count the days
//! between today and a target date written in one of several human formats.

use super::{Clock, Tool, ToolExecutor, ToolParameter, ToolResult, TOOL_DATE_CALCULATOR};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::{Arc, OnceLock};

/// Formats carrying a full calendar date
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%b. %d, %Y",
];

/// Date-time formats whose time part is discarded
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Formats without a year; the current year is assumed
const YEARLESS_FORMATS: &[&str] = &["%B %d", "%d %B", "%m/%d"];

fn ordinal_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("valid regex"))
}

fn leading_weekday() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tues|tue|wed|thurs|thur|thu|fri|sat|sun)\.?,?\s+",
        )
        .expect("valid regex")
    })
}

/// Parse a human-written date
///
/// Accepts ISO and slash/dash numeric dates, month-name dates with optional
/// ordinal suffixes and a leading weekday, ISO date-times, and year-less
/// month/day forms which resolve to `current_year`.
///
/// # Examples
///
/// ```
/// use reactqa::tools::date_calculator::parse_date;
///
/// let date = parse_date("Thursday, November 27th, 2025", 2024).unwrap();
/// assert_eq!(date.to_string(), "2025-11-27");
/// ```
pub fn parse_date(input: &str, current_year: i32) -> Option<NaiveDate> {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let without_weekday = leading_weekday().replace(&collapsed, "");
    let cleaned = ordinal_suffix().replace_all(&without_weekday, "$1");
    let text = cleaned.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    {
        return Some(date);
    }

    if let Some(datetime) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(datetime.date());
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.naive_local().date());
    }

    let with_year = format!("{} {}", text, current_year);
    YEARLESS_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(&with_year, &format!("{} %Y", fmt)).ok()
    })
}

fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %d, %Y").to_string()
}

/// Date arithmetic relative to the injected clock's today
pub struct DateCalculatorTool {
    clock: Arc<dyn Clock>,
}

impl DateCalculatorTool {
    /// Create a new date calculator tool
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    fn days_until(&self, today: NaiveDate, target_date: &str) -> ToolResult {
        let Some(target) = parse_date(target_date, today.year()) else {
            return ToolResult::error(format!(
                "Could not parse date '{}'. Please use formats like 'November 27, 2025' or '2025-11-27'",
                target_date
            ));
        };

        let diff = target.signed_duration_since(today).num_days();
        let heading = target.format("%B %d, %Y");
        if diff == 0 {
            ToolResult::success(format!("The target date {} is today!", heading))
        } else if diff > 0 {
            ToolResult::success(format!(
                "Days until {}:\n- Today: {}\n- Target: {}\n- Days until: {} days",
                heading,
                long_date(today),
                long_date(target),
                diff
            ))
            .self_sufficient()
        } else {
            ToolResult::success(format!(
                "Days since {}:\n- Today: {}\n- Target: {}\n- Days since: {} days ago",
                heading,
                long_date(today),
                long_date(target),
                diff.unsigned_abs()
            ))
            .self_sufficient()
        }
    }

    fn offset(&self, today: NaiveDate, days: i64) -> ToolResult {
        let target = if days >= 0 {
            today.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            today.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        let Some(target) = target else {
            return ToolResult::error(format!(
                "Invalid input. {} days is outside the supported date range",
                days
            ));
        };

        if days == 0 {
            return ToolResult::success(format!("Today is {}", long_date(today)));
        }

        let (label, tense) = if days > 0 {
            (format!("{} days from today", days), "will be")
        } else {
            (format!("{} days ago", days.unsigned_abs()), "was")
        };
        ToolResult::success(format!(
            "Date calculation:\n- Today: {}\n- {}: {}\n- That {} a {}",
            long_date(today),
            label,
            long_date(target),
            tense,
            target.format("%A")
        ))
        .self_sufficient()
    }
}

/// Read the `days` argument from a JSON number or numeric string
fn days_argument(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl ToolExecutor for DateCalculatorTool {
    fn tool_definition(&self) -> Tool {
        Tool::new(
            TOOL_DATE_CALCULATOR,
            "Calculates dates and days between dates. Use for: 1) 'what day will it be in X days' \
             (provide days=X), 2) 'how many days until [date]' (provide target_date='date string'). \
             Accepts either days (integer) OR target_date (date string like 'November 27, 2025' \
             or '2025-11-27').",
            vec![
                ToolParameter::optional("days", "Days to add (positive) or subtract (negative)"),
                ToolParameter::optional("target_date", "Date to count days until or since"),
            ],
        )
    }

    async fn execute(&self, args: serde_json::Value) -> ToolResult {
        let today = self.clock.today();

        match args.get("target_date") {
            Some(serde_json::Value::Null) | None => {}
            Some(serde_json::Value::String(s)) => return self.days_until(today, s),
            Some(other) => return self.days_until(today, &other.to_string()),
        }

        match args.get("days") {
            Some(serde_json::Value::Null) | None => {
                ToolResult::success(format!("Today is {}", long_date(today)))
            }
            Some(value) => match days_argument(value) {
                Some(days) => self.offset(today, days),
                None => ToolResult::error(format!(
                    "Invalid input. days must be an integer, got {}",
                    value
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::FixedClock;
    use chrono::Weekday;
    use serde_json::json;

    // Wednesday
    fn tool() -> DateCalculatorTool {
        DateCalculatorTool::new(Arc::new(FixedClock::on(2025, 1, 15).unwrap()))
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = ymd(2025, 11, 27);
        for input in [
            "2025-11-27",
            "2025/11/27",
            "11/27/2025",
            "11-27-2025",
            "November 27, 2025",
            "november 27 2025",
            "27 November 2025",
            "Nov 27, 2025",
            "November 27th, 2025",
            "Thursday, November 27, 2025",
            "2025-11-27T10:30:00",
            "2025-11-27 10:30",
            "2025-11-27T10:30:00+02:00",
            "  November   27,  2025 ",
        ] {
            assert_eq!(parse_date(input, 2024), Some(expected), "input: {}", input);
        }
    }

    #[test]
    fn test_parse_date_without_year_uses_current_year() {
        assert_eq!(parse_date("December 25", 2025), Some(ymd(2025, 12, 25)));
        assert_eq!(parse_date("4th July", 2026), Some(ymd(2026, 7, 4)));
        assert_eq!(parse_date("03/01", 2025), Some(ymd(2025, 3, 1)));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("", 2025), None);
        assert_eq!(parse_date("next christmas", 2025), None);
        assert_eq!(parse_date("2025-02-30", 2025), None);
    }

    #[tokio::test]
    async fn test_days_forward_reports_weekday() {
        let result = tool().execute(json!({"days": 10})).await;
        assert!(result.self_sufficient);
        assert_eq!(
            result.to_message(),
            "Date calculation:\n- Today: Wednesday, January 15, 2025\n\
             - 10 days from today: Saturday, January 25, 2025\n- That will be a Saturday"
        );
    }

    #[tokio::test]
    async fn test_days_backward() {
        let result = tool().execute(json!({"days": -3})).await;
        assert!(result.self_sufficient);
        assert!(result.output.contains("- 3 days ago: Sunday, January 12, 2025"));
        assert!(result.output.ends_with("That was a Sunday"));
    }

    #[tokio::test]
    async fn test_weekday_matches_offset_for_many_days() {
        let tool = tool();
        let today = ymd(2025, 1, 15);
        for days in [-400_i64, -30, -1, 1, 6, 7, 45, 365, 1000] {
            let result = tool.execute(json!({ "days": days })).await;
            let expected = if days > 0 {
                today + chrono::Duration::days(days)
            } else {
                today - chrono::Duration::days(-days)
            };
            let weekday = expected.format("%A").to_string();
            assert!(
                result.output.ends_with(&format!("a {}", weekday)),
                "days={} output={}",
                days,
                result.output
            );
        }
        assert_eq!(today.weekday(), Weekday::Wed);
    }

    #[tokio::test]
    async fn test_zero_days_is_today() {
        let result = tool().execute(json!({"days": 0})).await;
        assert!(!result.self_sufficient);
        assert_eq!(result.output, "Today is Wednesday, January 15, 2025");
    }

    #[tokio::test]
    async fn test_days_as_string() {
        let result = tool().execute(json!({"days": "2"})).await;
        assert!(result.output.contains("2 days from today: Friday, January 17, 2025"));
    }

    #[tokio::test]
    async fn test_days_not_integer() {
        let result = tool().execute(json!({"days": "soon"})).await;
        assert!(!result.success);
        assert!(result.to_message().starts_with("Error: Invalid input."));
    }

    #[tokio::test]
    async fn test_days_out_of_range() {
        let result = tool().execute(json!({"days": i64::MAX})).await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_no_arguments_reports_today() {
        let result = tool().execute(json!({})).await;
        assert_eq!(result.output, "Today is Wednesday, January 15, 2025");
    }

    #[tokio::test]
    async fn test_target_date_in_future() {
        let result = tool()
            .execute(json!({"target_date": "January 25, 2025"}))
            .await;
        assert!(result.self_sufficient);
        assert_eq!(
            result.output,
            "Days until January 25, 2025:\n- Today: Wednesday, January 15, 2025\n\
             - Target: Saturday, January 25, 2025\n- Days until: 10 days"
        );
    }

    #[tokio::test]
    async fn test_target_date_in_past() {
        let result = tool().execute(json!({"target_date": "2025-01-01"})).await;
        assert!(result.self_sufficient);
        assert!(result.output.starts_with("Days since January 01, 2025:"));
        assert!(result.output.ends_with("- Days since: 14 days ago"));
    }

    #[tokio::test]
    async fn test_target_date_today() {
        let result = tool().execute(json!({"target_date": "01/15/2025"})).await;
        assert!(!result.self_sufficient);
        assert_eq!(result.output, "The target date January 15, 2025 is today!");
    }

    #[tokio::test]
    async fn test_target_date_takes_precedence_over_days() {
        let result = tool()
            .execute(json!({"days": 3, "target_date": "2025-01-16"}))
            .await;
        assert!(result.output.starts_with("Days until January 16, 2025:"));
    }

    #[tokio::test]
    async fn test_unparseable_target_date() {
        let result = tool().execute(json!({"target_date": "someday"})).await;
        assert!(!result.success);
        assert_eq!(
            result.to_message(),
            "Error: Could not parse date 'someday'. Please use formats like \
             'November 27, 2025' or '2025-11-27'"
        );
    }
}
