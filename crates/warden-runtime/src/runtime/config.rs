//! Runtime configuration types and defaults.

use std::time::Duration;

use warden_gate::DEFAULT_CONFIRMATION_WINDOW;
use warden_tools::{DEFAULT_COMMAND_TIMEOUT, DEFAULT_MAX_OUTPUT_CHARS};

/// Default maximum model round-trips with tool calls per user turn.
pub(super) const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

/// Configuration for the agent runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// System prompt.
    pub system_prompt: String,
    /// Maximum model round-trips with tool calls per user turn.
    pub max_tool_rounds: usize,
    /// How long a sensitive command stays confirmable.
    pub confirmation_window: chrono::Duration,
    /// Default timeout for shell commands.
    pub command_timeout: Duration,
    /// Tool output beyond this many characters is truncated.
    pub max_output_chars: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            system_prompt: String::new(),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            confirmation_window: DEFAULT_CONFIRMATION_WINDOW,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            max_output_chars: DEFAULT_MAX_OUTPUT_CHARS,
        }
    }
}
