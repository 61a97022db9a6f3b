//! Runtime error types.

use thiserror::Error;

/// Errors that can occur in the runtime.
///
/// Gate decisions are never errors: a denied or unconfirmed command is
/// reported back to the model as a tool result.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// LLM error.
    #[error("LLM error: {0}")]
    LlmError(#[from] warden_llm::LlmError),

    /// Gate rule table could not be built.
    #[error("Gate error: {0}")]
    GateError(#[from] warden_gate::GateError),

    /// The model kept requesting tools past the per-turn limit.
    #[error("Model requested tools for more than {max} rounds in one turn")]
    MaxToolRoundsExceeded {
        /// The configured limit.
        max: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
