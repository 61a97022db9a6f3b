//! Chat command - interactive agent session.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use warden_config::Config;
use warden_llm::OpenAiCompatProvider;
use warden_runtime::{AgentRuntime, ToolCallRecord, config_bridge};

use crate::repl::{ReadlineEvent, ReplEditor};
use crate::theme::{Theme, print_banner};

const SLASH_COMMANDS: &[&str] = &["/help", "/clear", "/tools", "/pending", "/exit"];

/// Run interactive chat mode.
pub(crate) async fn run_chat(workspace: &Path, cfg: &Config) -> Result<()> {
    let llm = OpenAiCompatProvider::new(config_bridge::to_provider_config(cfg));
    let runtime = AgentRuntime::new(
        llm,
        config_bridge::to_rule_table(cfg)?,
        config_bridge::to_runtime_config(cfg),
    );
    let mut session = runtime.create_session(workspace.to_path_buf());

    print_banner("Agent chat");
    println!(
        "{}  {}",
        Theme::kv("Model", &cfg.model.model),
        Theme::kv("Workspace", &workspace.display().to_string())
    );
    println!(
        "Type {} for commands, {} to quit\n",
        "/help".cyan(),
        "/exit".cyan()
    );

    let mut editor = ReplEditor::new("history", "\x1b[1;32m> \x1b[0m", SLASH_COMMANDS)?;
    let mut last_tools: Vec<ToolCallRecord> = Vec::new();

    loop {
        let input = match editor.readline() {
            ReadlineEvent::Line(line) => line,
            ReadlineEvent::Interrupted => continue,
            ReadlineEvent::Eof => break,
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/exit" | "/quit" | "exit" | "quit" => break,
            "/help" => {
                print_help();
                continue;
            },
            "/clear" => {
                runtime.clear_history(&mut session);
                last_tools.clear();
                println!("{}", Theme::info("Conversation cleared."));
                continue;
            },
            "/tools" => {
                print_tool_calls(&last_tools);
                continue;
            },
            "/pending" => {
                match session.gate.pending() {
                    Some(p) => println!(
                        "{}",
                        Theme::warning(&format!(
                            "Awaiting confirmation of `{}` until {}",
                            p.command,
                            p.expires_at.format("%H:%M:%S")
                        ))
                    ),
                    None => println!("{}", Theme::dimmed("Nothing pending.")),
                }
                continue;
            },
            other if other.starts_with('/') => {
                println!("{}", Theme::warning(&format!("Unknown command: {other}")));
                continue;
            },
            _ => {},
        }

        match runtime.run_turn(&mut session, input).await {
            Ok(outcome) => {
                for record in &outcome.tool_calls {
                    print_tool_line(record);
                }
                println!("\n{}\n", outcome.reply);
                if outcome.truncated {
                    println!("{}\n", Theme::warning("(reply cut off at the token limit)"));
                }
                last_tools = outcome.tool_calls;
            },
            Err(e) => {
                eprintln!("{}", Theme::error(&e.to_string()));
                // Keep what ran so /tools can still show it.
                last_tools = session.tool_log.drain();
            },
        }
    }

    runtime.end_session(&mut session);
    println!("{}", Theme::dimmed("Goodbye!"));
    Ok(())
}

fn print_help() {
    println!("{}", Theme::header("Commands"));
    println!("  /clear    Forget the conversation (a pending confirmation is kept)");
    println!("  /tools    Show the tool calls from the last turn");
    println!("  /pending  Show the command awaiting confirmation, if any");
    println!("  /exit     End the session");
}

fn print_tool_line(record: &ToolCallRecord) {
    let summary = record
        .arguments
        .get("command")
        .or_else(|| record.arguments.get("file_path"))
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    let tag = match record.decision {
        Some(kind) => Theme::decision(kind),
        None if record.is_error => Theme::error("error"),
        None => Theme::success("ok"),
    };
    println!("  {} {} {}", tag, record.tool.bold(), Theme::dimmed(summary));
}

fn print_tool_calls(records: &[ToolCallRecord]) {
    if records.is_empty() {
        println!("{}", Theme::dimmed("No tool calls in the last turn."));
        return;
    }
    for record in records {
        print_tool_line(record);
        println!(
            "    {}",
            Theme::dimmed(&record.timestamp.format("%H:%M:%S").to_string())
        );
        for line in record.output.lines().take(10) {
            println!("    {line}");
        }
    }
}
