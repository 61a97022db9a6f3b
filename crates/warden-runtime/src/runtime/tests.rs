use std::path::PathBuf;

use serde_json::json;
use warden_gate::{DecisionKind, RuleTable};
use warden_llm::MessageRole;
use warden_test::{MockLlmProvider, MockLlmTurn, MockToolCall};

use super::*;
use crate::error::RuntimeError;

fn runtime(turns: Vec<MockLlmTurn>) -> AgentRuntime<MockLlmProvider> {
    let config = RuntimeConfig {
        system_prompt: "be careful".into(),
        ..RuntimeConfig::default()
    };
    AgentRuntime::new(MockLlmProvider::new(turns), RuleTable::default(), config)
}

fn session(rt: &AgentRuntime<MockLlmProvider>) -> (tempfile::TempDir, AgentSession) {
    let dir = tempfile::TempDir::new().unwrap();
    let session = rt.create_session(dir.path().to_path_buf());
    (dir, session)
}

#[tokio::test]
async fn test_text_reply_ends_turn() {
    let rt = runtime(vec![MockLlmTurn::text("hello there")]);
    let (_dir, mut session) = session(&rt);

    let outcome = rt.run_turn(&mut session, "hi").await.unwrap();
    assert_eq!(outcome.reply, "hello there");
    assert!(outcome.tool_calls.is_empty());
    assert!(!outcome.truncated);
    assert_eq!(outcome.usage.total(), 150);
    assert_eq!(session.message_count(), 2);

    let request = rt.llm().last_request().unwrap();
    assert_eq!(request.system, "be careful");
    assert_eq!(request.tool_names, vec!["file_operation", "system_command"]);
}

#[tokio::test]
async fn test_sensitive_command_needs_second_turn() {
    let rt = runtime(vec![
        MockLlmTurn::command("shutdown /s /t 60"),
        MockLlmTurn::text("Please confirm."),
    ]);
    let (_dir, mut session) = session(&rt);

    let outcome = rt.run_turn(&mut session, "shut down in a minute").await.unwrap();
    assert_eq!(outcome.reply, "Please confirm.");
    assert_eq!(outcome.tool_calls.len(), 1);
    assert_eq!(
        outcome.tool_calls[0].decision,
        Some(DecisionKind::RequireConfirmation)
    );
    assert!(!outcome.tool_calls[0].executed());
    assert_eq!(
        session.gate.pending().unwrap().command,
        "shutdown /s /t 60"
    );

    // The model saw the confirmation text as the tool result.
    let request = rt.llm().last_request().unwrap();
    let results = request.tool_results();
    assert_eq!(results.len(), 1);
    assert!(results[0].content.starts_with("[confirmation required]"));
}

#[tokio::test]
async fn test_model_cannot_confirm_within_its_own_turn() {
    let command = "echo shutdown /s /t 60";
    let rt = runtime(vec![
        MockLlmTurn::tool_calls(vec![
            MockToolCall::with_id("a", "system_command", json!({ "command": command })),
            MockToolCall::with_id("b", "system_command", json!({ "command": command })),
        ]),
        MockLlmTurn::command(command),
        MockLlmTurn::text("Do you want me to shut down?"),
        MockLlmTurn::command(command),
        MockLlmTurn::text("Shutting down."),
    ]);
    let (_dir, mut session) = session(&rt);

    let outcome = rt.run_turn(&mut session, "shut down in a minute").await.unwrap();
    assert_eq!(outcome.tool_calls.len(), 3);
    for record in &outcome.tool_calls {
        assert_eq!(record.decision, Some(DecisionKind::RequireConfirmation));
        assert!(!record.executed());
    }
    assert!(session.gate.is_awaiting_confirmation());

    let outcome = rt.run_turn(&mut session, "yes, go ahead").await.unwrap();
    assert_eq!(outcome.tool_calls.len(), 1);
    assert_eq!(outcome.tool_calls[0].decision, Some(DecisionKind::Allow));
    assert!(outcome.tool_calls[0].executed());
    assert!(outcome.tool_calls[0].output.contains("shutdown"));
    assert!(session.gate.pending().is_none());
}

#[tokio::test]
async fn test_failed_turn_records_do_not_leak_into_next_turn() {
    let rt = runtime(vec![
        MockLlmTurn::command("echo a"),
        MockLlmTurn::error("upstream down"),
        MockLlmTurn::text("back again"),
    ]);
    let (_dir, mut session) = session(&rt);

    rt.run_turn(&mut session, "first").await.unwrap_err();
    assert_eq!(session.tool_log.len(), 1);

    let outcome = rt.run_turn(&mut session, "second").await.unwrap();
    assert_eq!(outcome.reply, "back again");
    assert!(outcome.tool_calls.is_empty());
}

#[tokio::test]
async fn test_truncated_reply_is_flagged() {
    let rt = runtime(vec![MockLlmTurn::truncated("The answer is")]);
    let (_dir, mut session) = session(&rt);

    let outcome = rt.run_turn(&mut session, "explain").await.unwrap();
    assert_eq!(outcome.reply, "The answer is");
    assert!(outcome.truncated);
}

#[tokio::test]
async fn test_denied_command_reported_to_model() {
    let rt = runtime(vec![
        MockLlmTurn::command("format C: /q"),
        MockLlmTurn::text("I can't do that."),
    ]);
    let (_dir, mut session) = session(&rt);

    let outcome = rt.run_turn(&mut session, "wipe C").await.unwrap();
    assert_eq!(outcome.tool_calls[0].decision, Some(DecisionKind::Deny));
    assert!(outcome.tool_calls[0].is_error);
    assert!(session.gate.pending().is_none());

    let request = rt.llm().last_request().unwrap();
    assert!(request.tool_results()[0].is_error);
}

#[tokio::test]
async fn test_multiple_calls_dispatched_in_order() {
    let rt = runtime(vec![
        MockLlmTurn::tool_calls(vec![
            MockToolCall::with_id(
                "a",
                "file_operation",
                json!({ "operation": "create", "file_path": "notes.txt", "content": "hi" }),
            ),
            MockToolCall::with_id(
                "b",
                "file_operation",
                json!({ "operation": "read", "file_path": "notes.txt" }),
            ),
        ]),
        MockLlmTurn::text("done"),
    ]);
    let (_dir, mut session) = session(&rt);

    let outcome = rt.run_turn(&mut session, "write notes").await.unwrap();
    let ids: Vec<_> = outcome.tool_calls.iter().map(|r| r.call_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(outcome.tool_calls[1].output, "hi");
    // user, assistant(tools), tool, tool, assistant
    assert_eq!(session.message_count(), 5);
    assert_eq!(session.messages[2].role, MessageRole::Tool);
}

#[tokio::test]
async fn test_tool_round_limit() {
    let config = RuntimeConfig {
        max_tool_rounds: 2,
        ..RuntimeConfig::default()
    };
    let llm = MockLlmProvider::new(vec![
        MockLlmTurn::command("echo 1"),
        MockLlmTurn::command("echo 2"),
        MockLlmTurn::command("echo 3"),
    ]);
    let rt = AgentRuntime::new(llm, RuleTable::default(), config);
    let (_dir, mut session) = session(&rt);

    let err = rt.run_turn(&mut session, "loop").await.unwrap_err();
    assert!(matches!(err, RuntimeError::MaxToolRoundsExceeded { max: 2 }));
    assert_eq!(rt.llm().call_count(), 3);
}

#[tokio::test]
async fn test_provider_error_propagates() {
    let rt = runtime(vec![MockLlmTurn::error("rate limited")]);
    let (_dir, mut session) = session(&rt);
    let err = rt.run_turn(&mut session, "hi").await.unwrap_err();
    assert!(matches!(err, RuntimeError::LlmError(_)));
}

#[tokio::test]
async fn test_clear_history_keeps_pending_confirmation() {
    let rt = runtime(vec![MockLlmTurn::command("reboot"), MockLlmTurn::text("confirm?")]);
    let (_dir, mut session) = session(&rt);
    rt.run_turn(&mut session, "reboot please").await.unwrap();

    rt.clear_history(&mut session);
    assert_eq!(session.message_count(), 0);
    assert!(session.gate.is_awaiting_confirmation());

    rt.end_session(&mut session);
    assert!(!session.gate.is_awaiting_confirmation());
    assert!(session.tool_log.is_empty());
}

#[test]
fn test_create_session_applies_config() {
    let config = RuntimeConfig {
        confirmation_window: chrono::Duration::seconds(15),
        max_output_chars: 500,
        ..RuntimeConfig::default()
    };
    let rt = AgentRuntime::new(MockLlmProvider::default(), RuleTable::default(), config);
    let session = rt.create_session(PathBuf::from("/work"));
    assert_eq!(session.gate.window(), chrono::Duration::seconds(15));
    assert_eq!(session.tool_ctx.max_output_chars, 500);
    assert_eq!(session.tool_ctx.cwd, PathBuf::from("/work"));
}
