//! Per-session record of tool calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use warden_gate::DecisionKind;

/// One tool call as dispatched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Call ID assigned by the model.
    pub call_id: String,
    /// Tool name.
    pub tool: String,
    /// Arguments as received.
    pub arguments: Value,
    /// Text returned to the model.
    pub output: String,
    /// Whether the result was an error.
    pub is_error: bool,
    /// Gate decision, for shell commands that reached the gate.
    pub decision: Option<DecisionKind>,
    /// When the call finished.
    pub timestamp: DateTime<Utc>,
}

impl ToolCallRecord {
    /// Whether the tool actually ran.
    ///
    /// Shell commands run only on an allow decision. Other tools run whenever
    /// the call was well formed, which is approximated by the error flag.
    #[must_use]
    pub fn executed(&self) -> bool {
        match self.decision {
            Some(kind) => kind == DecisionKind::Allow,
            None => !self.is_error,
        }
    }
}

/// Ordered log of the tool calls made since the last drain.
#[derive(Debug, Clone, Default)]
pub struct ToolCallLog {
    records: Vec<ToolCallRecord>,
}

impl ToolCallLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, record: ToolCallRecord) {
        self.records.push(record);
    }

    /// Records since the last drain, oldest first.
    #[must_use]
    pub fn records(&self) -> &[ToolCallRecord] {
        &self.records
    }

    /// Take every record, leaving the log empty.
    pub fn drain(&mut self) -> Vec<ToolCallRecord> {
        std::mem::take(&mut self.records)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Discard every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
