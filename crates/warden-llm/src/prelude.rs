//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_llm::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust,no_run
//! use warden_llm::prelude::*;
//!
//! # async fn example() -> LlmResult<()> {
//! let config = ProviderConfig::new("your-api-key", "gpt-4");
//! let provider = OpenAiCompatProvider::new(config);
//!
//! let response = provider.complete_simple("What is 2+2?").await?;
//! println!("Response: {response}");
//! # Ok(())
//! # }
//! ```

// Errors
pub use crate::{LlmError, LlmResult};

// Provider trait and config
pub use crate::{LlmProvider, ProviderConfig};

// Providers
pub use crate::OpenAiCompatProvider;

// Message types
pub use crate::{Message, MessageContent, MessageRole};

// Response types
pub use crate::{LlmResponse, StopReason, Usage};

// Tool types
pub use crate::{LlmToolDefinition, ToolCall, ToolCallResult};
