//! System command tool: runs a command through the platform shell.

use crate::{
    BuiltinTool, MAX_COMMAND_TIMEOUT, MIN_COMMAND_TIMEOUT, ToolContext, ToolError, ToolResult,
    truncate_output,
};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Built-in tool for executing shell commands.
///
/// Callers must have cleared the command with the gate first.
pub struct SystemCommandTool;

#[async_trait::async_trait]
impl BuiltinTool for SystemCommandTool {
    fn name(&self) -> &'static str {
        "system_command"
    }

    fn description(&self) -> &'static str {
        "Executes a system shell command and returns its output. Destructive commands \
         (formatting drives, recursive deletes, partitioning, registry deletion) are refused. \
         Shutdown, restart and logoff require confirmation: resend the exact same command \
         to confirm. Optional timeout in seconds (max 600)."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The shell command to execute"
                },
                "timeout": {
                    "type": "integer",
                    "description": "Timeout in seconds (default: 60, min: 1, max: 600)"
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult {
        let command = args
            .get("command")
            .and_then(Value::as_str)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ToolError::InvalidArguments("command is required".into()))?;

        let timeout = args
            .get("timeout")
            .and_then(Value::as_u64)
            .map_or(ctx.command_timeout, Duration::from_secs)
            .clamp(MIN_COMMAND_TIMEOUT, MAX_COMMAND_TIMEOUT);

        debug!(command, timeout_secs = timeout.as_secs(), cwd = %ctx.cwd.display(), "Running system command");

        let result = tokio::time::timeout(timeout, run_shell(command, &ctx.cwd)).await;

        match result {
            Ok(Ok((stdout, stderr, exit_code))) => Ok(truncate_output(
                format_output(&stdout, &stderr, exit_code),
                ctx.max_output_chars,
            )),
            Ok(Err(e)) => Err(ToolError::ExecutionFailed(e.to_string())),
            Err(_) => Err(ToolError::Timeout(timeout.as_secs())),
        }
    }
}

/// Combine captured streams and exit status into the text relayed to the model.
fn format_output(stdout: &str, stderr: &str, exit_code: i32) -> String {
    let mut result_text = String::new();

    let stdout = stdout.trim_end();
    if !stdout.is_empty() {
        result_text.push_str(stdout);
    }

    let stderr = stderr.trim_end();
    if !stderr.is_empty() {
        if !result_text.is_empty() {
            result_text.push('\n');
        }
        result_text.push_str("STDERR:\n");
        result_text.push_str(stderr);
    }

    if exit_code != 0 {
        if !result_text.is_empty() {
            result_text.push('\n');
        }
        result_text.push_str("(exit code: ");
        result_text.push_str(&exit_code.to_string());
        result_text.push(')');
    }

    if result_text.is_empty() {
        result_text.push_str("(no output)");
    }

    result_text
}

fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

/// Run a shell command and capture stdout, stderr, and exit code.
async fn run_shell(command: &str, cwd: &Path) -> std::io::Result<(String, String, i32)> {
    let output = shell_command(command)
        .current_dir(cwd)
        .kill_on_drop(true)
        .output()
        .await?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    Ok((stdout, stderr, exit_code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ctx() -> ToolContext {
        ToolContext::new(std::env::temp_dir())
    }

    #[tokio::test]
    async fn test_echo() {
        let result = SystemCommandTool
            .execute(serde_json::json!({"command": "echo hello"}), &ctx())
            .await
            .unwrap();

        assert!(result.contains("hello"));
    }

    #[tokio::test]
    async fn test_exit_code() {
        let result = SystemCommandTool
            .execute(serde_json::json!({"command": "exit 42"}), &ctx())
            .await
            .unwrap();

        assert!(result.contains("(exit code: 42)"));
    }

    #[tokio::test]
    async fn test_stderr() {
        let result = SystemCommandTool
            .execute(serde_json::json!({"command": "echo oops 1>&2"}), &ctx())
            .await
            .unwrap();

        assert!(result.contains("STDERR:"));
        assert!(result.contains("oops"));
    }

    #[tokio::test]
    async fn test_runs_in_context_cwd() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
        let listing = if cfg!(windows) { "dir /b" } else { "ls" };

        let result = SystemCommandTool
            .execute(
                serde_json::json!({"command": listing}),
                &ToolContext::new(dir.path().to_path_buf()),
            )
            .await
            .unwrap();

        assert!(result.contains("marker.txt"));
    }

    #[tokio::test]
    async fn test_missing_or_empty_command() {
        for args in [serde_json::json!({}), serde_json::json!({"command": "  "})] {
            let err = SystemCommandTool.execute(args, &ctx()).await.unwrap_err();
            assert!(matches!(err, ToolError::InvalidArguments(_)));
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout() {
        let result = SystemCommandTool
            .execute(serde_json::json!({"command": "sleep 10", "timeout": 1}), &ctx())
            .await;

        assert!(matches!(result.unwrap_err(), ToolError::Timeout(1)));
    }

    #[tokio::test]
    async fn test_zero_timeout_is_raised_to_minimum() {
        let result = SystemCommandTool
            .execute(serde_json::json!({"command": "echo still runs", "timeout": 0}), &ctx())
            .await
            .unwrap();

        assert!(result.contains("still runs"));
    }

    #[tokio::test]
    async fn test_output_truncated() {
        let result = SystemCommandTool
            .execute(
                serde_json::json!({"command": "echo 0123456789abcdef"}),
                &ctx().with_max_output_chars(4),
            )
            .await
            .unwrap();

        assert!(result.starts_with("0123\n"));
        assert!(result.contains("output truncated"));
    }

    #[test]
    fn test_format_output() {
        assert_eq!(format_output("", "", 0), "(no output)");
        assert_eq!(format_output("ok\n", "", 0), "ok");
        assert_eq!(
            format_output("partial\n", "boom\n", 2),
            "partial\nSTDERR:\nboom\n(exit code: 2)"
        );
        assert_eq!(format_output("", "", 1), "(exit code: 1)");
    }
}
