//! Test fixtures for common types.

use std::sync::Arc;

use chrono::Duration;
use tempfile::TempDir;
use warden_gate::{GateSession, ManualClock};
use warden_llm::ToolCall;
use warden_tools::ToolContext;

/// A `system_command` tool call with a fixed ID.
#[must_use]
pub fn command_call(id: &str, command: &str) -> ToolCall {
    ToolCall::new(id, "system_command").with_arguments(serde_json::json!({ "command": command }))
}

/// A `file_operation` tool call.
#[must_use]
pub fn file_call(id: &str, operation: &str, file_path: &str, content: Option<&str>) -> ToolCall {
    let mut args = serde_json::json!({ "operation": operation, "file_path": file_path });
    if let Some(content) = content {
        args["content"] = serde_json::Value::String(content.to_string());
    }
    ToolCall::new(id, "file_operation").with_arguments(args)
}

/// A gate session driven by a manual clock, plus the clock.
#[must_use]
pub fn test_gate_session(window_secs: i64) -> (GateSession, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let session = GateSession::new()
        .with_window(Duration::seconds(window_secs))
        .with_clock(clock.clone());
    (session, clock)
}

/// A tool context rooted in a fresh temporary directory.
///
/// Keep the returned [`TempDir`] alive for as long as the context is used.
///
/// # Errors
///
/// Returns an error if the temporary directory cannot be created.
pub fn test_tool_context() -> std::io::Result<(TempDir, ToolContext)> {
    let dir = TempDir::new()?;
    let ctx = ToolContext::new(dir.path().to_path_buf());
    Ok((dir, ctx))
}
