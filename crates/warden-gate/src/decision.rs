//! Gate decisions and the requests they answer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rule::RuleCategory;

/// A command submitted to the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    /// The raw command string, exactly as the model sent it.
    pub command: String,
    /// Whether this exact string is the session's live pending confirmation.
    pub previously_pending: bool,
}

/// The kind of decision the gate reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    /// Safe to execute.
    Allow,
    /// Sensitive; recorded as pending and must be resubmitted verbatim.
    RequireConfirmation,
    /// Destructive; permanently refused.
    Deny,
}

impl DecisionKind {
    /// Short tag used in the structured text relayed to the model.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Allow => "allowed",
            Self::RequireConfirmation => "confirmation required",
            Self::Deny => "denied",
        }
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The gate's answer for one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// What the caller must do.
    pub kind: DecisionKind,
    /// Human-readable explanation, relayed to the user unchanged.
    pub reason: String,
    /// The category of the rule that matched, if any.
    pub category: Option<RuleCategory>,
}

impl Decision {
    /// A plain allow (no rule matched).
    #[must_use]
    pub fn allow() -> Self {
        Self {
            kind: DecisionKind::Allow,
            reason: "command passed the safety check".to_string(),
            category: None,
        }
    }

    /// Allow after an exact resubmission of a pending command.
    #[must_use]
    pub fn confirmed(command: &str, category: RuleCategory) -> Self {
        Self {
            kind: DecisionKind::Allow,
            reason: format!("confirmed by resubmission: {command}"),
            category: Some(category),
        }
    }

    /// Ask for confirmation of a sensitive command.
    #[must_use]
    pub fn require_confirmation(command: &str, category: RuleCategory) -> Self {
        Self {
            kind: DecisionKind::RequireConfirmation,
            reason: format!(
                "about to run a {category} command: {command}\n\n\
                 Ask the user to confirm. If they agree, \
                 send exactly the same command again in your next turn."
            ),
            category: Some(category),
        }
    }

    /// Refuse a destructive command.
    #[must_use]
    pub fn deny(command: &str, category: RuleCategory) -> Self {
        Self {
            kind: DecisionKind::Deny,
            reason: format!(
                "security restriction: '{command}' was refused ({category} is never allowed)"
            ),
            category: Some(category),
        }
    }

    /// Whether the caller may execute the command.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.kind == DecisionKind::Allow
    }

    /// Whether the command is waiting on a confirmation.
    #[must_use]
    pub fn requires_confirmation(&self) -> bool {
        self.kind == DecisionKind::RequireConfirmation
    }

    /// Whether the command was refused.
    #[must_use]
    pub fn is_denied(&self) -> bool {
        self.kind == DecisionKind::Deny
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.reason)
    }
}
