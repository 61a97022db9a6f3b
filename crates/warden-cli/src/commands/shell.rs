//! Shell command - run commands by hand through the gate.
//!
//! No model is involved. Each line is dispatched as a `system_command` call,
//! so the same deny and confirmation rules apply as in a chat session.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use warden_config::Config;
use warden_gate::DecisionKind;
use warden_llm::ToolCall;
use warden_runtime::{AgentSession, SHELL_TOOL, ToolDispatcher, config_bridge};
use warden_tools::ToolRegistry;

use crate::repl::{ReadlineEvent, ReplEditor};
use crate::theme::{Theme, print_banner};

const SLASH_COMMANDS: &[&str] = &["/pending", "/exit"];

/// Run the gated shell.
pub(crate) async fn run_shell(workspace: &Path, cfg: &Config) -> Result<()> {
    let dispatcher = ToolDispatcher::new(
        Arc::new(config_bridge::to_rule_table(cfg)?),
        ToolRegistry::with_defaults(),
    );
    let mut session = AgentSession::from_config(
        &config_bridge::to_runtime_config(cfg),
        workspace.to_path_buf(),
    );

    print_banner("Gated shell: sensitive commands must be entered twice");
    println!("Type {} to quit\n", "/exit".cyan());

    let mut editor = ReplEditor::new("shell_history", "\x1b[1;33m$ \x1b[0m", SLASH_COMMANDS)?;
    let mut seq: u64 = 0;

    loop {
        let line = match editor.readline() {
            ReadlineEvent::Line(line) => line,
            ReadlineEvent::Interrupted => continue,
            ReadlineEvent::Eof => break,
        };

        match line.trim() {
            "" => continue,
            "/exit" | "exit" => break,
            "/pending" => {
                match session.gate.pending() {
                    Some(p) => println!("{}", Theme::warning(&p.command)),
                    None => println!("{}", Theme::dimmed("Nothing pending.")),
                }
                continue;
            },
            _ => {},
        }

        seq = seq.wrapping_add(1);
        // Every line is its own turn, so retyping a command confirms it.
        session.begin_turn();
        // The line is passed untrimmed: confirmation is byte-exact.
        let call = ToolCall::new(format!("shell-{seq}"), SHELL_TOOL)
            .with_arguments(serde_json::json!({ "command": line }));
        let result = dispatcher.dispatch(&mut session, &call).await;

        let decision = session.tool_log.drain().pop().and_then(|r| r.decision);
        match decision {
            Some(DecisionKind::Allow) => println!("{}", result.content),
            Some(kind) => println!("{} {}", Theme::decision(kind), strip_tag(&result.content)),
            None => println!("{}", Theme::error(&result.content)),
        }
    }

    session.end();
    println!("{}", Theme::dimmed("Goodbye!"));
    Ok(())
}

/// Drop the leading `[tag] ` from a decision's display text.
fn strip_tag(text: &str) -> String {
    match text.split_once("] ") {
        Some((tag, rest)) if tag.starts_with('[') => rest.to_string(),
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tag() {
        assert_eq!(strip_tag("[denied] no"), "no");
        assert_eq!(strip_tag("plain"), "plain");
    }
}
