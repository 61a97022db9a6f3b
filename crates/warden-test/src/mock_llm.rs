//! Mock LLM provider for testing.
//!
//! Provides [`MockLlmProvider`], a deterministic, queue-based implementation
//! of [`LlmProvider`] that replays pre-configured turns. This enables tests of
//! the agent loop and the confirmation flow without hitting a real API.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use warden_llm::{
    LlmError, LlmProvider, LlmResponse, LlmResult, LlmToolDefinition, Message, MessageContent,
    MessageRole, StopReason, ToolCall, Usage,
};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single scripted turn that the mock provider will replay.
#[derive(Debug, Clone)]
pub enum MockLlmTurn {
    /// A text response.
    Text(
        /// The text content the assistant produces.
        String,
    ),
    /// A text response cut off at the token limit.
    Truncated(
        /// The partial text.
        String,
    ),
    /// One or more tool calls.
    ToolCalls(
        /// The tool calls to emit.
        Vec<MockToolCall>,
    ),
    /// Fail as if the endpoint answered HTTP 500 with this body.
    Error(
        /// The response body.
        String,
    ),
}

impl MockLlmTurn {
    /// Create a text turn.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a text turn that stopped at the token limit.
    #[must_use]
    pub fn truncated(text: impl Into<String>) -> Self {
        Self::Truncated(text.into())
    }

    /// Create a tool-calls turn.
    #[must_use]
    pub fn tool_calls(calls: Vec<MockToolCall>) -> Self {
        Self::ToolCalls(calls)
    }

    /// Create a turn that asks for a single shell command.
    #[must_use]
    pub fn command(command: &str) -> Self {
        Self::ToolCalls(vec![MockToolCall::new(
            "system_command",
            serde_json::json!({ "command": command }),
        )])
    }

    /// Create an error turn.
    #[must_use]
    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error(msg.into())
    }
}

/// A single tool call specification for [`MockLlmTurn::ToolCalls`].
#[derive(Debug, Clone)]
pub struct MockToolCall {
    /// Unique call ID.
    pub id: String,
    /// Tool name (e.g. `"system_command"`).
    pub name: String,
    /// JSON arguments for the call.
    pub arguments: Value,
}

impl MockToolCall {
    /// Create a new mock tool call with an auto-generated ID.
    #[must_use]
    pub fn new(name: impl Into<String>, args: Value) -> Self {
        Self {
            id: format!("mock-call-{}", Uuid::new_v4()),
            name: name.into(),
            arguments: args,
        }
    }

    /// Create a new mock tool call with an explicit ID.
    #[must_use]
    pub fn with_id(id: impl Into<String>, name: impl Into<String>, args: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: args,
        }
    }
}

/// What the provider received on one call.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Conversation history sent.
    pub messages: Vec<Message>,
    /// Names of the tools offered.
    pub tool_names: Vec<String>,
    /// System prompt sent.
    pub system: String,
}

impl CapturedRequest {
    /// Tool results included in this request, in order.
    #[must_use]
    pub fn tool_results(&self) -> Vec<&warden_llm::ToolCallResult> {
        self.messages
            .iter()
            .filter_map(|m| match &m.content {
                MessageContent::ToolResult(r) if m.role == MessageRole::Tool => Some(r),
                _ => None,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// MockLlmProvider
// ---------------------------------------------------------------------------

/// A deterministic, queue-based [`LlmProvider`] for tests.
///
/// Turns are popped from the front of the queue on each call to
/// [`complete`](LlmProvider::complete). If the queue is exhausted, an error is
/// returned. Every request is captured and can be inspected via
/// [`requests`](Self::requests).
#[derive(Debug, Default)]
pub struct MockLlmProvider {
    turns: Mutex<VecDeque<MockLlmTurn>>,
    requests: Mutex<Vec<CapturedRequest>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockLlmProvider {
    /// Create a new mock provider preloaded with the given turns.
    #[must_use]
    pub fn new(turns: Vec<MockLlmTurn>) -> Self {
        Self {
            turns: Mutex::new(VecDeque::from(turns)),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue more turns at the back.
    pub fn push_turns(&self, turns: impl IntoIterator<Item = MockLlmTurn>) {
        lock(&self.turns).extend(turns);
    }

    /// Number of times `complete` has been called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Number of scripted turns not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        lock(&self.turns).len()
    }

    /// Snapshot of every captured request, one per call.
    #[must_use]
    pub fn requests(&self) -> Vec<CapturedRequest> {
        lock(&self.requests).clone()
    }

    /// The most recent captured request.
    #[must_use]
    pub fn last_request(&self) -> Option<CapturedRequest> {
        lock(&self.requests).last().cloned()
    }
}

#[async_trait]
#[allow(clippy::unnecessary_literal_bound)]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: &[LlmToolDefinition],
        system: &str,
    ) -> LlmResult<LlmResponse> {
        lock(&self.requests).push(CapturedRequest {
            messages: messages.to_vec(),
            tool_names: tools.iter().map(|t| t.name.clone()).collect(),
            system: system.to_string(),
        });

        let turn = lock(&self.turns).pop_front().ok_or_else(|| {
            LlmError::MalformedResponse("MockLlmProvider: no more turns queued".to_string())
        })?;

        let usage = Usage {
            input_tokens: 100,
            output_tokens: 50,
        };

        match turn {
            MockLlmTurn::Text(text) => Ok(LlmResponse {
                usage,
                ..LlmResponse::text(text)
            }),
            MockLlmTurn::Truncated(text) => Ok(LlmResponse {
                usage,
                stop_reason: StopReason::MaxTokens,
                ..LlmResponse::text(text)
            }),
            MockLlmTurn::ToolCalls(calls) => {
                let calls = calls
                    .into_iter()
                    .map(|c| ToolCall::new(c.id, c.name).with_arguments(c.arguments))
                    .collect();
                Ok(LlmResponse {
                    usage,
                    stop_reason: StopReason::ToolUse,
                    ..LlmResponse::tool_calls(calls)
                })
            },
            MockLlmTurn::Error(msg) => Err(LlmError::Status {
                status: 500,
                body: msg,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_turns_in_order() {
        let mock = MockLlmProvider::new(vec![
            MockLlmTurn::command("dir"),
            MockLlmTurn::text("done"),
        ]);

        let first = mock.complete(&[Message::user("hi")], &[], "sys").await.unwrap();
        assert!(first.has_tool_calls);
        assert_eq!(
            first.message.tool_calls().unwrap()[0].str_arg("command"),
            Some("dir")
        );

        let second = mock.complete(&[], &[], "").await.unwrap();
        assert_eq!(second.message.text(), Some("done"));

        assert!(mock.complete(&[], &[], "").await.is_err());
        assert_eq!(mock.call_count(), 3);
        assert_eq!(mock.requests()[0].system, "sys");
    }

    #[tokio::test]
    async fn test_error_turn() {
        let mock = MockLlmProvider::new(vec![MockLlmTurn::error("boom")]);
        let err = mock.complete(&[], &[], "").await.unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert_eq!(mock.remaining(), 0);
    }
}
