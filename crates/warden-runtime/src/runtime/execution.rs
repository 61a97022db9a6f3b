//! Agent loop: `run_turn`.

use tracing::{debug, info, warn};
use warden_llm::{LlmProvider, Message, StopReason, Usage};

use crate::error::{RuntimeError, RuntimeResult};
use crate::session::AgentSession;
use crate::tool_log::ToolCallRecord;

use super::AgentRuntime;

/// Result of one user turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The model's final text reply.
    pub reply: String,
    /// Tool calls dispatched during the turn, in order.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Token usage summed over every completion in the turn.
    pub usage: Usage,
    /// The reply stopped at the model's token limit.
    pub truncated: bool,
}

impl<P: LlmProvider> AgentRuntime<P> {
    /// Run one user turn to completion.
    ///
    /// Sends the history to the model and dispatches every tool call it asks
    /// for, looping until the model answers in text.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails, or if the model is still
    /// requesting tools after `max_tool_rounds` round-trips. Calls dispatched
    /// before the failure stay in `session.tool_log` until the next turn.
    pub async fn run_turn(
        &self,
        session: &mut AgentSession,
        input: &str,
    ) -> RuntimeResult<TurnOutcome> {
        let turn = session.begin_turn();
        debug!(session_id = %session.id(), turn, "Turn started");
        session.add_message(Message::user(input));

        let tools = self.dispatcher.definitions();
        let max_rounds = self.config.max_tool_rounds;
        let mut rounds: usize = 0;
        let mut usage = Usage::default();

        loop {
            let response = self
                .llm
                .complete(&session.messages, &tools, &self.config.system_prompt)
                .await?;
            usage.input_tokens = usage.input_tokens.saturating_add(response.usage.input_tokens);
            usage.output_tokens = usage
                .output_tokens
                .saturating_add(response.usage.output_tokens);
            debug!(
                session_id = %session.id(),
                input = response.usage.input_tokens,
                output = response.usage.output_tokens,
                "Token usage"
            );

            let calls = response
                .message
                .tool_calls()
                .map(<[_]>::to_vec)
                .unwrap_or_default();

            if calls.is_empty() {
                let reply = response.message.text().unwrap_or_default().to_string();
                let truncated = response.stop_reason == StopReason::MaxTokens;
                if truncated {
                    warn!(session_id = %session.id(), "Reply cut off at the token limit");
                }
                session.add_message(Message::assistant(reply.clone()));
                let tool_calls = session.tool_log.drain();
                info!(
                    session_id = %session.id(),
                    rounds,
                    tool_calls = tool_calls.len(),
                    "Turn complete"
                );
                return Ok(TurnOutcome {
                    reply,
                    tool_calls,
                    usage,
                    truncated,
                });
            }

            if rounds >= max_rounds {
                warn!(session_id = %session.id(), max_rounds, "Tool round limit reached");
                return Err(RuntimeError::MaxToolRoundsExceeded { max: max_rounds });
            }
            rounds = rounds.saturating_add(1);

            session.add_message(Message::assistant_with_tools(calls.clone()));
            for call in &calls {
                let result = self.dispatcher.dispatch(session, call).await;
                session.add_message(Message::tool_result(result));
            }
        }
    }
}
