//! The pending-confirmation record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A sensitive command awaiting exact resubmission.
///
/// At most one exists per session. It is created the first time a
/// confirmation-rule command is requested, consumed when the same string is
/// resubmitted, and discarded when superseded, expired, or the session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingConfirmation {
    /// The exact command string, as submitted (not normalized).
    pub command: String,
    /// When the confirmation was requested.
    pub created_at: DateTime<Utc>,
    /// After this instant the confirmation can no longer be consumed.
    pub expires_at: DateTime<Utc>,
    /// Session turn in which the confirmation was requested. Only a later
    /// turn can consume it.
    #[serde(default)]
    pub turn: u64,
}

impl PendingConfirmation {
    /// Create a pending confirmation that lives for `window` from `now`.
    #[must_use]
    pub fn new(command: impl Into<String>, now: DateTime<Utc>, window: Duration) -> Self {
        Self {
            command: command.into(),
            created_at: now,
            expires_at: now
                .checked_add_signed(window)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            turn: 0,
        }
    }

    /// Tag the confirmation with the turn that requested it.
    #[must_use]
    pub fn with_turn(mut self, turn: u64) -> Self {
        self.turn = turn;
        self
    }

    /// Whether a resubmission during `turn` may consume this confirmation.
    #[must_use]
    pub fn is_consumable_in(&self, turn: u64) -> bool {
        turn > self.turn
    }

    /// Whether the confirmation window has closed.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Byte-exact comparison with a resubmitted command.
    #[must_use]
    pub fn is_for(&self, command: &str) -> bool {
        self.command == command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let pending = PendingConfirmation::new("shutdown /s", now, Duration::seconds(30));
        assert!(!pending.is_expired(now));
        assert!(!pending.is_expired(now + Duration::seconds(29)));
        assert!(pending.is_expired(now + Duration::seconds(30)));
    }

    #[test]
    fn test_is_for_is_byte_exact() {
        let pending = PendingConfirmation::new("shutdown /s /t 60", Utc::now(), Duration::seconds(60));
        assert!(pending.is_for("shutdown /s /t 60"));
        assert!(!pending.is_for("shutdown /s /t 60 "));
        assert!(!pending.is_for("SHUTDOWN /s /t 60"));
        assert!(!pending.is_for("shutdown  /s /t 60"));
    }

    #[test]
    fn test_only_later_turns_consume() {
        let pending = PendingConfirmation::new("logoff", Utc::now(), Duration::seconds(60)).with_turn(3);
        assert!(!pending.is_consumable_in(2));
        assert!(!pending.is_consumable_in(3));
        assert!(pending.is_consumable_in(4));
    }

    #[test]
    fn test_huge_window_saturates() {
        let now = Utc::now();
        let pending = PendingConfirmation::new("reboot", now, Duration::MAX);
        assert_eq!(pending.expires_at, DateTime::<Utc>::MAX_UTC);
        assert!(!pending.is_expired(now));
    }
}
