//! Warden LLM - model provider abstraction.
//!
//! The agent talks to its model through the [`LlmProvider`] trait. The one
//! shipped implementation, [`OpenAiCompatProvider`], speaks the `OpenAI`
//! chat completions protocol with function calling.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod openai_compat;
mod provider;
mod types;

pub use error::{LlmError, LlmResult};
pub use openai_compat::OpenAiCompatProvider;
pub use provider::{DEFAULT_BASE_URL, DEFAULT_MODEL, LlmProvider, ProviderConfig};
pub use types::{
    LlmResponse, LlmToolDefinition, Message, MessageContent, MessageRole, StopReason, ToolCall,
    ToolCallResult, Usage,
};
