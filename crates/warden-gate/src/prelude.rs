//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_gate::prelude::*;` to import all essential types.

// Errors
pub use crate::{GateError, GateResult};

// Gate
pub use crate::{CommandGate, GateSession, SessionId};

// Decisions
pub use crate::{CommandRequest, Decision, DecisionKind, PendingConfirmation};

// Rules
pub use crate::{Rule, RuleCategory, RuleTable, RuleVerdict};

// Time
pub use crate::{Clock, SystemClock};
