//! Errors raised while talking to a chat completions endpoint.

use thiserror::Error;

/// Why a completion could not be obtained.
#[derive(Debug, Error)]
pub enum LlmError {
    /// A remote endpoint was configured without an API key.
    #[error("no API key set for {endpoint} (set OPENAI_API_KEY or model.api_key)")]
    MissingApiKey {
        /// The endpoint that refused to be called anonymously.
        endpoint: String,
    },

    /// The API key cannot be sent as an HTTP header.
    #[error("API key is not a valid header value: {0}")]
    InvalidApiKey(String),

    /// The request never produced a readable response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("endpoint returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// The body decoded but is not a usable completion.
    #[error("malformed completion: {0}")]
    MalformedResponse(String),
}

/// Result type for LLM operations.
pub type LlmResult<T> = Result<T, LlmError>;
