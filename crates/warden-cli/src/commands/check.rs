//! `warden check`: classify a command without running it.

use anyhow::Result;
use warden_config::Config;
use warden_gate::{CommandGate, DecisionKind, GateSession};
use warden_runtime::config_bridge;

use crate::theme::Theme;

/// Exit code for a command that needs confirmation.
pub(crate) const EXIT_CONFIRM: i32 = 2;
/// Exit code for a denied command.
pub(crate) const EXIT_DENY: i32 = 3;

/// Print how the gate would treat `command` with nothing pending.
///
/// Returns the process exit code.
pub(crate) fn run_check(cfg: &Config, command: &str) -> Result<i32> {
    let gate = CommandGate::new(config_bridge::to_rule_table(cfg)?);

    match gate.rules().classify(command) {
        Some(rule) => {
            println!("{}", Theme::kv("Rule", &rule.to_string()));
        },
        None => println!("{}", Theme::kv("Rule", "(none)")),
    }

    // A fresh session holds nothing pending, so this is the first-time answer.
    let decision = gate.evaluate(&mut GateSession::new(), command);
    println!("{} {}", Theme::decision(decision.kind), decision.reason);

    Ok(exit_code(decision.kind))
}

fn exit_code(kind: DecisionKind) -> i32 {
    match kind {
        DecisionKind::Allow => 0,
        DecisionKind::RequireConfirmation => EXIT_CONFIRM,
        DecisionKind::Deny => EXIT_DENY,
    }
}
