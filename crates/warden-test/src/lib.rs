//! Warden Test - shared test utilities.
//!
//! Mock implementations and fixtures used across Warden crates as a
//! dev-dependency.
//!
//! ```rust,ignore
//! use warden_test::{MockLlmProvider, MockLlmTurn};
//!
//! let llm = MockLlmProvider::new(vec![
//!     MockLlmTurn::command("shutdown /s /t 60"),
//!     MockLlmTurn::text("Please confirm the shutdown."),
//! ]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod fixtures;
pub mod mock_llm;

pub use fixtures::*;
pub use mock_llm::*;
