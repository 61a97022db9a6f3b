//! Warden Runtime - agent orchestration around the command gate.
//!
//! This crate provides:
//! - [`AgentSession`]: per-conversation state (history, gate session, tool log)
//! - [`ToolDispatcher`]: the boundary where shell commands meet the gate
//! - [`AgentRuntime`]: the turn loop between the model and the tools
//! - [`config_bridge`]: conversion from `warden_config::Config`
//!
//! # Example
//!
//! ```rust,no_run
//! use warden_gate::RuleTable;
//! use warden_llm::{OpenAiCompatProvider, ProviderConfig};
//! use warden_runtime::{AgentRuntime, RuntimeConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = OpenAiCompatProvider::new(ProviderConfig::new("sk-...", "gpt-4"));
//! let runtime = AgentRuntime::new(llm, RuleTable::default(), RuntimeConfig::default());
//!
//! let mut session = runtime.create_session(std::env::current_dir()?);
//! let outcome = runtime.run_turn(&mut session, "What's in this folder?").await?;
//! println!("{}", outcome.reply);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod config_bridge;
pub mod prelude;

pub mod dispatch;
mod error;
mod runtime;
mod session;
mod tool_log;

pub use dispatch::{SHELL_TOOL, ToolDispatcher};
pub use error::{RuntimeError, RuntimeResult};
pub use runtime::{AgentRuntime, RuntimeConfig, TurnOutcome};
pub use session::AgentSession;
pub use tool_log::{ToolCallLog, ToolCallRecord};
