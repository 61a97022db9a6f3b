//! Warden Gate - the command safety gate.
//!
//! Every shell command a model asks to run passes through [`CommandGate`]
//! before anything reaches the operating system. The gate answers with a
//! [`Decision`]:
//!
//! - **Deny**: the command matches a destructive pattern (drive formatting,
//!   recursive force-delete, partitioning, registry deletion). Final; no
//!   confirmation can override it.
//! - **`RequireConfirmation`**: the command matches a sensitive pattern
//!   (shutdown, restart, logoff). It is recorded as the session's
//!   [`PendingConfirmation`] and only runs if the identical string is
//!   submitted again within the confirmation window.
//! - **Allow**: anything else, or a confirmed resubmission.
//!
//! Matching is driven by an explicit [`RuleTable`] (pattern → category →
//! verdict). The only mutable state is the pending slot owned by each
//! [`GateSession`]; sessions never share it.
//!
//! # Example
//!
//! ```
//! use warden_gate::{CommandGate, DecisionKind, GateSession};
//!
//! let gate = CommandGate::default();
//! let mut session = GateSession::new();
//!
//! let first = gate.evaluate(&mut session, "shutdown /s /t 60");
//! assert_eq!(first.kind, DecisionKind::RequireConfirmation);
//!
//! let second = gate.evaluate(&mut session, "shutdown /s /t 60");
//! assert_eq!(second.kind, DecisionKind::Allow);
//!
//! let denied = gate.evaluate(&mut session, "format C: /q");
//! assert_eq!(denied.kind, DecisionKind::Deny);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod clock;
pub mod decision;
/// Error types and results for the gate module.
pub mod error;
pub mod gate;
pub mod pending;
pub mod rule;
pub mod session;

#[cfg(any(test, feature = "test-support"))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use decision::{CommandRequest, Decision, DecisionKind};
pub use error::{GateError, GateResult};
pub use gate::CommandGate;
pub use pending::PendingConfirmation;
pub use rule::{Rule, RuleCategory, RuleTable, RuleVerdict, normalize_command};
pub use session::{DEFAULT_CONFIRMATION_WINDOW, GateSession, SessionId};
