//! Agent session management.
//!
//! A session owns everything that must not leak between conversations: the
//! message history, the gate's pending-confirmation slot, the tool-call log,
//! and the working directory tools run in.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use warden_gate::{GateSession, SessionId};
use warden_llm::Message;
use warden_tools::ToolContext;

use crate::RuntimeConfig;
use crate::tool_log::ToolCallLog;

/// An agent session.
#[derive(Debug)]
pub struct AgentSession {
    /// Conversation messages.
    pub messages: Vec<Message>,
    /// Gate state (pending confirmation and window).
    pub gate: GateSession,
    /// Tool calls made since the last drain.
    pub tool_log: ToolCallLog,
    /// Context tools execute in.
    pub tool_ctx: ToolContext,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl AgentSession {
    /// Create a new session.
    #[must_use]
    pub fn new(gate: GateSession, tool_ctx: ToolContext) -> Self {
        Self {
            messages: Vec::new(),
            gate,
            tool_log: ToolCallLog::new(),
            tool_ctx,
            created_at: Utc::now(),
        }
    }

    /// Create a session whose tools run in `cwd`, with the window and tool
    /// limits taken from `config`.
    #[must_use]
    pub fn from_config(config: &RuntimeConfig, cwd: PathBuf) -> Self {
        let gate = GateSession::new().with_window(config.confirmation_window);
        let tool_ctx = ToolContext::new(cwd)
            .with_command_timeout(config.command_timeout)
            .with_max_output_chars(config.max_output_chars);
        Self::new(gate, tool_ctx)
    }

    /// Session identifier (shared with the gate session).
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.gate.id()
    }

    /// Start a user turn and return its number.
    ///
    /// Advances the gate's turn counter, so a confirmation requested in an
    /// earlier turn becomes consumable. Records a failed earlier turn left in
    /// the tool log are dropped.
    pub fn begin_turn(&mut self) -> u64 {
        self.tool_log.clear();
        self.gate.begin_turn()
    }

    /// Add a message to the conversation.
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Number of messages in the conversation.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Forget the conversation. Gate state is kept, so a command awaiting
    /// confirmation can still be confirmed.
    pub fn clear_history(&mut self) {
        self.messages.clear();
    }

    /// End the session: drop messages, the tool log, and any pending
    /// confirmation.
    pub fn end(&mut self) {
        self.messages.clear();
        self.tool_log.clear();
        self.gate.end();
    }
}
