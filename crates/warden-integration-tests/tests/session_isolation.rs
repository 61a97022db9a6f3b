//! Sessions never see each other's pending confirmations.

use std::sync::Arc;

use chrono::Duration;
use futures::future::join_all;
use tempfile::TempDir;
use warden_gate::{CommandGate, DecisionKind, GateSession, ManualClock, RuleTable};
use warden_runtime::{AgentSession, ToolDispatcher};
use warden_test::{command_call, test_gate_session};
use warden_tools::{ToolContext, ToolRegistry};

#[test]
fn pending_state_is_per_session() {
    let gate = CommandGate::default();
    let mut alice = GateSession::new();
    let mut bob = GateSession::new();

    assert!(gate.evaluate(&mut alice, "reboot").requires_confirmation());
    // Bob sending the same string is his own first request.
    assert!(gate.evaluate(&mut bob, "reboot").requires_confirmation());
    // Bob confirming does not consume Alice's entry.
    bob.begin_turn();
    assert!(gate.evaluate(&mut bob, "reboot").is_allowed());
    assert!(alice.is_awaiting_confirmation());
    alice.begin_turn();
    assert!(gate.evaluate(&mut alice, "reboot").is_allowed());
}

#[test]
fn expiry_is_per_session_clock() {
    let gate = CommandGate::default();
    let (mut fast, clock) = test_gate_session(10);
    let mut slow = GateSession::new().with_clock(Arc::new(ManualClock::new()));

    assert!(gate.evaluate(&mut fast, "logoff").requires_confirmation());
    assert!(gate.evaluate(&mut slow, "logoff").requires_confirmation());

    clock.advance(Duration::seconds(11));
    assert!(!fast.is_awaiting_confirmation());
    assert!(slow.is_awaiting_confirmation());
    slow.begin_turn();
    assert!(gate.evaluate(&mut slow, "logoff").is_allowed());
}

#[tokio::test]
async fn concurrent_sessions_share_rules_not_state() {
    let dispatcher = Arc::new(ToolDispatcher::new(
        Arc::new(RuleTable::default()),
        ToolRegistry::with_defaults(),
    ));
    let dir = TempDir::new().unwrap();

    let tasks = (0..8).map(|i| {
        let dispatcher = Arc::clone(&dispatcher);
        let cwd = dir.path().to_path_buf();
        tokio::spawn(async move {
            let mut session = AgentSession::new(GateSession::new(), ToolContext::new(cwd));
            let command = format!("shutdown /s /t {i}");
            dispatcher
                .dispatch(&mut session, &command_call("a", &command))
                .await;
            let pending = session.gate.pending().map(|p| p.command.clone());
            (command, pending)
        })
    });

    for joined in join_all(tasks).await {
        let (command, pending) = joined.unwrap();
        assert_eq!(pending, Some(command));
    }
}

#[tokio::test]
async fn ending_one_session_leaves_others() {
    let dispatcher = ToolDispatcher::new(Arc::new(RuleTable::default()), ToolRegistry::with_defaults());
    let dir = TempDir::new().unwrap();
    let mut a = AgentSession::new(GateSession::new(), ToolContext::new(dir.path().to_path_buf()));
    let mut b = AgentSession::new(GateSession::new(), ToolContext::new(dir.path().to_path_buf()));

    dispatcher.dispatch(&mut a, &command_call("1", "poweroff")).await;
    dispatcher.dispatch(&mut b, &command_call("1", "poweroff")).await;
    a.end();

    assert!(!a.gate.is_awaiting_confirmation());
    assert!(b.gate.is_awaiting_confirmation());
    assert_eq!(
        b.tool_log.records()[0].decision,
        Some(DecisionKind::RequireConfirmation)
    );
}
