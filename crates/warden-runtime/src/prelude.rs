//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_runtime::prelude::*;` to import all essential types.

// Errors
pub use crate::{RuntimeError, RuntimeResult};

// Runtime
pub use crate::{AgentRuntime, RuntimeConfig, TurnOutcome};

// Sessions
pub use crate::{AgentSession, ToolCallLog, ToolCallRecord};

// Dispatch
pub use crate::ToolDispatcher;
