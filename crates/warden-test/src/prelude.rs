//! Prelude module - commonly used test utilities.
//!
//! Use `use warden_test::prelude::*;` to import all test helpers.

pub use crate::{
    CapturedRequest, MockLlmProvider, MockLlmTurn, MockToolCall, command_call, file_call,
    test_gate_session, test_tool_context,
};
