//! The command safety gate.
//!
//! # Evaluation Order
//!
//! 1. Drop the session's pending confirmation if its window has closed
//! 2. Does a deny rule match? -> `Deny` (pending cleared, never created)
//! 3. Does a confirm rule match?
//!    - exact string is the live pending entry from an earlier turn -> consume it, `Allow`
//!    - exact string is pending from this same turn -> `RequireConfirmation`, entry kept
//!    - otherwise -> replace pending with this command, `RequireConfirmation`
//! 4. Otherwise -> `Allow` (any pending entry for another command is discarded)
//!
//! The gate never runs anything. Callers must execute only on `Allow`.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::decision::Decision;
use crate::rule::{RuleTable, RuleVerdict};
use crate::session::GateSession;

/// Decides whether a shell command may run.
///
/// Stateless apart from the rule table; all mutable state lives in the
/// [`GateSession`] passed to [`evaluate`](Self::evaluate).
#[derive(Debug, Clone)]
pub struct CommandGate {
    rules: Arc<RuleTable>,
}

impl CommandGate {
    /// Create a gate over a rule table.
    #[must_use]
    pub fn new(rules: RuleTable) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }

    /// Create a gate sharing an existing rule table.
    #[must_use]
    pub fn with_shared_rules(rules: Arc<RuleTable>) -> Self {
        Self { rules }
    }

    /// The rule table in use.
    #[must_use]
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Evaluate `command` for `session`, updating its pending slot.
    ///
    /// `command` is matched in normalized form but compared byte-for-byte
    /// against the pending entry, so a confirmation only counts when the
    /// model resubmits the identical string. The resubmission must also come
    /// in a later turn than the request (see [`GateSession::begin_turn`]), so
    /// a model cannot confirm its own command without the user replying.
    #[must_use]
    pub fn evaluate(&self, session: &mut GateSession, command: &str) -> Decision {
        session.expire_stale();
        let session_id = session.id();
        let request = session.request(command);

        let Some(rule) = self.rules.classify(&request.command) else {
            if let Some(superseded) = session.take_pending() {
                debug!(
                    session_id = %session_id,
                    superseded = %superseded.command,
                    "pending confirmation discarded by unrelated command"
                );
            }
            debug!(session_id = %session_id, command, "command allowed");
            return Decision::allow();
        };

        match rule.verdict {
            RuleVerdict::Deny => {
                if let Some(superseded) = session.take_pending() {
                    debug!(
                        session_id = %session_id,
                        superseded = %superseded.command,
                        "pending confirmation discarded by denied command"
                    );
                }
                warn!(
                    session_id = %session_id,
                    command,
                    category = %rule.category,
                    pattern = %rule.pattern,
                    "command denied"
                );
                Decision::deny(command, rule.category.clone())
            },
            RuleVerdict::Confirm if request.previously_pending => {
                session.take_pending();
                info!(
                    session_id = %session_id,
                    command,
                    category = %rule.category,
                    "sensitive command confirmed"
                );
                Decision::confirmed(command, rule.category.clone())
            },
            RuleVerdict::Confirm if session.pending().is_some_and(|p| p.is_for(command)) => {
                debug!(
                    session_id = %session_id,
                    command,
                    turn = session.turn(),
                    "resubmitted in the requesting turn, still awaiting the user"
                );
                Decision::require_confirmation(command, rule.category.clone())
            },
            RuleVerdict::Confirm => {
                let expires_at = session.set_pending(command).expires_at;
                info!(
                    session_id = %session_id,
                    command,
                    category = %rule.category,
                    %expires_at,
                    "sensitive command awaiting confirmation"
                );
                Decision::require_confirmation(command, rule.category.clone())
            },
        }
    }
}

impl Default for CommandGate {
    fn default() -> Self {
        Self::new(RuleTable::default())
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
