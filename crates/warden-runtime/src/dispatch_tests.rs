use super::*;
use serde_json::json;
use tempfile::TempDir;
use warden_gate::GateSession;
use warden_test::{command_call, file_call};
use warden_tools::ToolContext;

fn setup() -> (TempDir, ToolDispatcher, AgentSession) {
    let dir = TempDir::new().unwrap();
    let dispatcher = ToolDispatcher::new(Arc::new(RuleTable::default()), ToolRegistry::with_defaults());
    let session = AgentSession::new(
        GateSession::new(),
        ToolContext::new(dir.path().to_path_buf()),
    );
    (dir, dispatcher, session)
}

#[tokio::test]
async fn test_denied_command_is_error_and_not_executed() {
    let (dir, dispatcher, mut session) = setup();
    let marker = dir.path().join("marker");
    std::fs::write(&marker, "x").unwrap();

    let call = command_call("c1", "rm -rf marker");
    let result = dispatcher.dispatch(&mut session, &call).await;

    assert!(result.is_error);
    assert!(result.content.starts_with("[denied]"));
    assert!(marker.exists());
    assert!(!session.gate.is_awaiting_confirmation());

    let records = session.tool_log.drain();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].decision, Some(DecisionKind::Deny));
    assert!(!records[0].executed());
}

#[tokio::test]
async fn test_confirmation_cycle_through_dispatch() {
    let (_dir, dispatcher, mut session) = setup();
    // Sensitive by rule, harmless to actually run.
    let command = "echo shutdown";

    let first = dispatcher.dispatch(&mut session, &command_call("c1", command)).await;
    assert!(!first.is_error);
    assert!(first.content.starts_with("[confirmation required]"));
    assert!(first.content.contains(command));
    assert_eq!(session.gate.pending().unwrap().command, command);

    session.begin_turn();
    let second = dispatcher.dispatch(&mut session, &command_call("c2", command)).await;
    assert!(!second.is_error);
    assert!(second.content.contains("shutdown"));
    assert!(!second.content.starts_with("[confirmation required]"));
    assert!(session.gate.pending().is_none());

    let records = session.tool_log.drain();
    assert_eq!(records[0].decision, Some(DecisionKind::RequireConfirmation));
    assert_eq!(records[1].decision, Some(DecisionKind::Allow));
    assert!(records[1].executed());
}

#[tokio::test]
async fn test_allowed_command_runs() {
    let (_dir, dispatcher, mut session) = setup();
    let result = dispatcher
        .dispatch(&mut session, &command_call("c1", "echo hello"))
        .await;
    assert!(!result.is_error);
    assert!(result.content.contains("hello"));
}

#[tokio::test]
async fn test_empty_command_rejected_without_gate() {
    let (_dir, dispatcher, mut session) = setup();
    dispatcher
        .dispatch(&mut session, &command_call("c1", "shutdown /s /t 60"))
        .await;
    assert!(session.gate.is_awaiting_confirmation());

    for call in [
        command_call("c2", ""),
        command_call("c3", "   "),
        ToolCall::new("c4", SHELL_TOOL).with_arguments(json!({})),
        ToolCall::new("c5", SHELL_TOOL).with_arguments(json!({ "command": 42 })),
    ] {
        let result = dispatcher.dispatch(&mut session, &call).await;
        assert!(result.is_error, "{:?}", call.arguments);
        assert!(result.content.contains("command"));
    }

    // The gate was never consulted, so the pending entry survives.
    assert_eq!(session.gate.pending().unwrap().command, "shutdown /s /t 60");
    let records = session.tool_log.drain();
    assert!(records[1..].iter().all(|r| r.decision.is_none()));
}

#[tokio::test]
async fn test_unknown_tool_is_error() {
    let (_dir, dispatcher, mut session) = setup();
    let call = ToolCall::new("c1", "web_search").with_arguments(json!({ "query": "rust" }));
    let result = dispatcher.dispatch(&mut session, &call).await;
    assert!(result.is_error);
    assert!(result.content.contains("Unknown tool: web_search"));
}

#[tokio::test]
async fn test_file_operation_bypasses_gate() {
    let (dir, dispatcher, mut session) = setup();
    let call = file_call("c1", "create", "shutdown.txt", Some("format c:"));
    let result = dispatcher.dispatch(&mut session, &call).await;
    assert!(!result.is_error, "{}", result.content);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("shutdown.txt")).unwrap(),
        "format c:"
    );
    assert!(!session.gate.is_awaiting_confirmation());
}

#[tokio::test]
async fn test_tool_error_becomes_error_result() {
    let (_dir, dispatcher, mut session) = setup();
    let call = file_call("c1", "read", "missing.txt", None);
    let result = dispatcher.dispatch(&mut session, &call).await;
    assert!(result.is_error);
    assert!(result.content.contains("Path not found"));
    assert!(!session.tool_log.records()[0].executed());
}

#[tokio::test]
async fn test_output_truncated_to_session_limit() {
    let (dir, dispatcher, mut session) = setup();
    session.tool_ctx = session.tool_ctx.clone().with_max_output_chars(10);
    std::fs::write(dir.path().join("big.txt"), "y".repeat(100)).unwrap();

    let result = dispatcher
        .dispatch(&mut session, &file_call("c1", "read", "big.txt", None))
        .await;
    assert!(result.content.contains("output truncated"));
}
