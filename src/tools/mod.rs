//! Tools module for reactqa
//!
//! This module contains the tool descriptor types, the tool registry, and the
//! tool implementations the agent can invoke: arithmetic, current time, date
//! offsets and web lookup.

pub mod calculator;
pub mod clock;
pub mod date_calculator;
pub mod datetime;
pub mod web_search;

use crate::search::SearchGateway;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub use calculator::CalculatorTool;
pub use clock::{Clock, FixedClock, SystemClock};
pub use date_calculator::DateCalculatorTool;
pub use datetime::DateTimeTool;
pub use web_search::WebSearchTool;

/// Registry name of the arithmetic tool
pub const TOOL_CALCULATOR: &str = "calculator";
/// Registry name of the current-time tool
pub const TOOL_DATETIME: &str = "datetime";
/// Registry name of the date-offset tool
pub const TOOL_DATE_CALCULATOR: &str = "datecalculator";
/// Registry name of the web-lookup tool
pub const TOOL_WEB_SEARCH: &str = "web_search";

/// A named parameter accepted by a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name as it appears in the argument object
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Whether the tool refuses to run without it
    pub required: bool,
}

impl ToolParameter {
    /// Create a required parameter
    pub fn required(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            required: true,
        }
    }

    /// Create an optional parameter
    pub fn optional(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            required: false,
        }
    }
}

/// Tool definition structure
///
/// Describes a tool to the model. The description is embedded in the
/// reasoning prompt verbatim and is never parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Name of the tool (unique registry key)
    pub name: String,
    /// Description of what the tool does and when to use it
    pub description: String,
    /// Invocation contract
    pub parameters: Vec<ToolParameter>,
}

impl Tool {
    /// Create a new tool definition
    ///
    /// # Arguments
    ///
    /// * `name` - Tool name
    /// * `description` - Tool description
    /// * `parameters` - Named parameters the tool accepts
    pub fn new(name: &str, description: &str, parameters: Vec<ToolParameter>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
        }
    }
}

/// Tool result structure
///
/// Represents the outcome of a tool execution. Failures are carried as
/// data so the agent can reason about them on its next turn.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Whether the tool execution succeeded
    pub success: bool,
    /// Output from the tool
    pub output: String,
    /// Error message if execution failed
    pub error: Option<String>,
    /// Whether the output was truncated
    pub truncated: bool,
    /// The observation alone is enough to answer the question
    pub self_sufficient: bool,
    /// Additional metadata about the execution
    pub metadata: HashMap<String, String>,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(output: String) -> Self {
        Self {
            success: true,
            output,
            error: None,
            truncated: false,
            self_sufficient: false,
            metadata: HashMap::new(),
        }
    }

    /// Create a failed tool result
    ///
    /// The message is rendered as `Error: <message>` in the observation.
    pub fn error(error: String) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(error),
            truncated: false,
            self_sufficient: false,
            metadata: HashMap::new(),
        }
    }

    /// Mark the observation as a complete answer on its own
    pub fn self_sufficient(mut self) -> Self {
        self.self_sufficient = true;
        self
    }

    /// Add metadata to the result
    pub fn with_metadata(mut self, key: String, value: String) -> Self {
        self.metadata.insert(key, value);
        self
    }

    /// Truncate output if it exceeds the maximum size
    ///
    /// # Arguments
    ///
    /// * `max_size` - Maximum size in bytes; the cut lands on a char boundary
    pub fn truncate_if_needed(mut self, max_size: usize) -> Self {
        if self.output.len() > max_size {
            let mut cut = max_size;
            while !self.output.is_char_boundary(cut) {
                cut -= 1;
            }
            self.output.truncate(cut);
            self.output.push_str("\n... (truncated)");
            self.truncated = true;
        }
        self
    }

    /// Convert to the observation text fed back to the model
    pub fn to_message(&self) -> String {
        if self.success {
            if self.truncated {
                format!("{}\n(Output truncated to fit context window)", self.output)
            } else {
                self.output.clone()
            }
        } else {
            format!(
                "Error: {}",
                self.error.as_deref().unwrap_or("Unknown error")
            )
        }
    }
}

/// Tool executor trait for implementing tool execution logic
///
/// Execution is infallible at the type level. A tool that cannot do its job
/// returns [`ToolResult::error`] so the loop never aborts on a bad call.
///
/// # Examples
///
/// ```
/// use reactqa::tools::{Tool, ToolExecutor, ToolResult};
/// use async_trait::async_trait;
/// use serde_json::Value;
///
/// struct EchoTool;
///
/// #[async_trait]
/// impl ToolExecutor for EchoTool {
///     fn tool_definition(&self) -> Tool {
///         Tool::new("echo", "Echoes its arguments", vec![])
///     }
///
///     async fn execute(&self, args: Value) -> ToolResult {
///         ToolResult::success(args.to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Returns the tool descriptor
    fn tool_definition(&self) -> Tool;

    /// Executes the tool with the given named arguments
    ///
    /// # Arguments
    ///
    /// * `args` - JSON object of named parameters
    async fn execute(&self, args: serde_json::Value) -> ToolResult;
}

/// Tool registry for managing available tools
///
/// Lookups go through the map; the catalog listing follows registration
/// order so the prompt text is stable between runs.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolExecutor>>,
    order: Vec<String>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Create a registry holding the four standard tools
    ///
    /// Registers calculator, datetime, datecalculator and web_search, in
    /// that order, with the system clock.
    ///
    /// # Arguments
    ///
    /// * `search` - Search gateway used by the web lookup tool
    /// * `max_content_length` - Character budget for web lookup content
    pub fn with_default_tools(search: Arc<dyn SearchGateway>, max_content_length: usize) -> Self {
        Self::with_default_tools_and_clock(search, max_content_length, Arc::new(SystemClock))
    }

    /// Same as [`ToolRegistry::with_default_tools`] with an explicit clock
    pub fn with_default_tools_and_clock(
        search: Arc<dyn SearchGateway>,
        max_content_length: usize,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(TOOL_CALCULATOR, Arc::new(CalculatorTool::new()));
        registry.register(TOOL_DATETIME, Arc::new(DateTimeTool::new(clock.clone())));
        registry.register(
            TOOL_DATE_CALCULATOR,
            Arc::new(DateCalculatorTool::new(clock)),
        );
        registry.register(
            TOOL_WEB_SEARCH,
            Arc::new(WebSearchTool::new(search).with_max_length(max_content_length)),
        );
        registry
    }

    /// Register a tool executor in the registry
    ///
    /// Re-registering a name replaces the executor and keeps its original
    /// catalog position.
    pub fn register(&mut self, name: impl Into<String>, executor: Arc<dyn ToolExecutor>) {
        let name = name.into();
        if self.tools.insert(name.clone(), executor).is_none() {
            self.order.push(name);
        }
    }

    /// Get a tool executor by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolExecutor>> {
        self.tools.get(name).cloned()
    }

    /// Get all tool definitions in registration order
    pub fn all_definitions(&self) -> Vec<Tool> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|executor| executor.tool_definition())
            .collect()
    }

    /// Render the tool catalog embedded in every reasoning prompt
    ///
    /// One `- <name>: <description>` line per tool.
    pub fn tools_description(&self) -> String {
        self.all_definitions()
            .iter()
            .map(|tool| format!("- {}: {}", tool.name, tool.description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
