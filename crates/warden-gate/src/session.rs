//! Per-session gate context.
//!
//! Each conversation owns exactly one [`GateSession`], which in turn owns the
//! single [`PendingConfirmation`] slot. Nothing here is shared between
//! sessions; the gate receives the session by `&mut` and mutates only that.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::decision::CommandRequest;
use crate::pending::PendingConfirmation;

/// Default confirmation window (2 minutes).
pub const DEFAULT_CONFIRMATION_WINDOW: Duration = Duration::seconds(120);

/// Unique identifier for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

/// Gate state owned by one session.
#[derive(Debug)]
pub struct GateSession {
    id: SessionId,
    pending: Option<PendingConfirmation>,
    window: Duration,
    clock: Arc<dyn Clock>,
    turn: u64,
}

impl GateSession {
    /// Create a session with a fresh ID, the default window, and wall-clock time.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id(SessionId::new())
    }

    /// Create a session with a specific ID.
    #[must_use]
    pub fn with_id(id: SessionId) -> Self {
        Self {
            id,
            pending: None,
            window: DEFAULT_CONFIRMATION_WINDOW,
            clock: Arc::new(SystemClock),
            turn: 0,
        }
    }

    /// Set how long a pending confirmation stays consumable.
    #[must_use]
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The confirmation window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Current turn number. Starts at 0 until the first [`begin_turn`](Self::begin_turn).
    #[must_use]
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Mark the start of a new user turn.
    ///
    /// A pending confirmation can only be consumed in a turn after the one
    /// that requested it, so callers advance the counter once per user
    /// message, before any tool call of that message is evaluated.
    pub fn begin_turn(&mut self) -> u64 {
        self.turn = self.turn.saturating_add(1);
        self.turn
    }

    /// The live pending confirmation, if any.
    ///
    /// An entry whose window has closed is reported as absent.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingConfirmation> {
        let now = self.clock.now();
        self.pending.as_ref().filter(|p| !p.is_expired(now))
    }

    /// Whether the session is waiting for a confirmation.
    #[must_use]
    pub fn is_awaiting_confirmation(&self) -> bool {
        self.pending().is_some()
    }

    /// Build the request the gate evaluates for `command`.
    #[must_use]
    pub fn request(&self, command: &str) -> CommandRequest {
        let previously_pending = self
            .pending()
            .is_some_and(|p| p.is_for(command) && p.is_consumable_in(self.turn));
        CommandRequest {
            command: command.to_string(),
            previously_pending,
        }
    }

    /// End the session, discarding any pending confirmation.
    pub fn end(&mut self) {
        if let Some(p) = self.pending.take() {
            tracing::debug!(session_id = %self.id, command = %p.command, "pending confirmation dropped at session end");
        }
    }

    /// Drop the pending entry if its window has closed.
    pub(crate) fn expire_stale(&mut self) {
        let now = self.clock.now();
        if self.pending.as_ref().is_some_and(|p| p.is_expired(now)) {
            if let Some(p) = self.pending.take() {
                tracing::debug!(session_id = %self.id, command = %p.command, "pending confirmation expired");
            }
        }
    }

    /// Record `command` as the pending confirmation, replacing any previous one.
    pub(crate) fn set_pending(&mut self, command: &str) -> &PendingConfirmation {
        let pending =
            PendingConfirmation::new(command, self.clock.now(), self.window).with_turn(self.turn);
        self.pending.insert(pending)
    }

    /// Remove and return the pending confirmation.
    pub(crate) fn take_pending(&mut self) -> Option<PendingConfirmation> {
        self.pending.take()
    }
}

impl Default for GateSession {
    fn default() -> Self {
        Self::new()
    }
}
