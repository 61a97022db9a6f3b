#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Built-in tools for the Warden agent runtime.
//!
//! Provides two tools as direct Rust function calls: `system_command` for
//! shell execution and `file_operation` for basic file management. Neither
//! tool consults the command gate; that happens at the dispatch boundary in
//! `warden-runtime` before a tool is ever invoked.

mod file_operation;
mod system_command;

pub use file_operation::FileOperationTool;
pub use system_command::SystemCommandTool;

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use warden_llm::LlmToolDefinition;

/// Default maximum output size in characters before truncation.
pub const DEFAULT_MAX_OUTPUT_CHARS: usize = 30_000;
/// Default shell command timeout (1 minute).
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);
/// Lower bound for any shell command timeout.
pub const MIN_COMMAND_TIMEOUT: Duration = Duration::from_secs(1);
/// Upper bound for any shell command timeout (10 minutes).
pub const MAX_COMMAND_TIMEOUT: Duration = Duration::from_secs(600);

/// A built-in tool that executes directly in-process.
#[async_trait::async_trait]
pub trait BuiltinTool: Send + Sync {
    /// Tool name as exposed to the model.
    fn name(&self) -> &'static str;

    /// Human-readable description for the LLM.
    fn description(&self) -> &'static str;

    /// JSON schema for tool input parameters.
    fn input_schema(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult;
}

/// Shared context available to all built-in tools.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Working directory for commands and relative file paths.
    pub cwd: PathBuf,
    /// Default timeout applied to shell commands.
    pub command_timeout: Duration,
    /// Output longer than this many characters is truncated.
    pub max_output_chars: usize,
}

impl ToolContext {
    /// Create a new tool context rooted at `cwd`.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            max_output_chars: DEFAULT_MAX_OUTPUT_CHARS,
        }
    }

    /// Set the default command timeout, capped at [`MAX_COMMAND_TIMEOUT`].
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout.min(MAX_COMMAND_TIMEOUT);
        self
    }

    /// Set the output truncation limit.
    #[must_use]
    pub fn with_max_output_chars(mut self, max: usize) -> Self {
        self.max_output_chars = max;
        self
    }

    /// Resolve `path` against the working directory.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.cwd.join(p)
        }
    }
}

/// Tool execution errors.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid arguments.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Execution failed.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// Path not found.
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Path already exists.
    #[error("Path already exists: {0}")]
    AlreadyExists(String),

    /// Timeout.
    #[error("Timeout after {0}s")]
    Timeout(u64),
}

/// Result type for tool execution.
pub type ToolResult = Result<String, ToolError>;

/// Registry of built-in tools for lookup and LLM definition export.
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn BuiltinTool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Create a registry with all default tools registered.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SystemCommandTool));
        registry.register(Box::new(FileOperationTool));
        registry
    }

    /// Register a tool, replacing any tool with the same name.
    pub fn register(&mut self, tool: Box<dyn BuiltinTool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn BuiltinTool> {
        self.tools.get(name).map(AsRef::as_ref)
    }

    /// Registered tool names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Export all tool definitions for the LLM.
    #[must_use]
    pub fn all_definitions(&self) -> Vec<LlmToolDefinition> {
        self.tools
            .values()
            .map(|t| {
                LlmToolDefinition::new(t.name())
                    .with_description(t.description())
                    .with_schema(t.input_schema())
            })
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Truncate output to stay within LLM context limits.
///
/// If `output` has more than `max_chars` characters it is cut at that
/// character and a notice is appended.
#[must_use]
pub fn truncate_output(output: String, max_chars: usize) -> String {
    let Some((cut, _)) = output.char_indices().nth(max_chars) else {
        return output;
    };
    let mut truncated = output[..cut].to_string();
    truncated.push_str(&format!(
        "\n\n... (output truncated, exceeded {max_chars} character limit)"
    ));
    truncated
}
