//! Tool dispatch boundary.
//!
//! Every tool call from the model passes through [`ToolDispatcher::dispatch`].
//! Shell commands are sent to the [`CommandGate`] first and only reach
//! `system_command` on an allow decision. Whatever happens, the model gets a
//! [`ToolCallResult`] back and the call is appended to the session's log.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use warden_gate::{CommandGate, DecisionKind, RuleTable};
use warden_llm::{LlmToolDefinition, ToolCall, ToolCallResult};
use warden_tools::ToolRegistry;

use crate::session::AgentSession;
use crate::tool_log::ToolCallRecord;

/// Name of the tool whose `command` argument is gated.
pub const SHELL_TOOL: &str = "system_command";

/// Routes tool calls to built-in tools, gating shell commands.
#[derive(Debug)]
pub struct ToolDispatcher {
    gate: CommandGate,
    registry: ToolRegistry,
}

impl ToolDispatcher {
    /// Create a dispatcher over a rule table and a tool registry.
    #[must_use]
    pub fn new(rules: Arc<RuleTable>, registry: ToolRegistry) -> Self {
        Self {
            gate: CommandGate::with_shared_rules(rules),
            registry,
        }
    }

    /// The gate consulted for shell commands.
    #[must_use]
    pub fn gate(&self) -> &CommandGate {
        &self.gate
    }

    /// The tool registry.
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Tool definitions offered to the model.
    #[must_use]
    pub fn definitions(&self) -> Vec<LlmToolDefinition> {
        self.registry.all_definitions()
    }

    /// Dispatch one tool call for `session`.
    ///
    /// Never fails: unknown tools, bad arguments, gate refusals, and tool
    /// errors all come back as error results for the model to read.
    pub async fn dispatch(&self, session: &mut AgentSession, call: &ToolCall) -> ToolCallResult {
        let (result, decision) = if call.name == SHELL_TOOL {
            self.dispatch_shell(session, call).await
        } else {
            (self.execute(session, call).await, None)
        };

        session.tool_log.push(ToolCallRecord {
            call_id: call.id.clone(),
            tool: call.name.clone(),
            arguments: call.arguments.clone(),
            output: result.content.clone(),
            is_error: result.is_error,
            decision,
            timestamp: Utc::now(),
        });
        result
    }

    async fn dispatch_shell(
        &self,
        session: &mut AgentSession,
        call: &ToolCall,
    ) -> (ToolCallResult, Option<DecisionKind>) {
        let Some(command) = call.str_arg("command").filter(|c| !c.trim().is_empty()) else {
            warn!(session_id = %session.id(), call_id = %call.id, "shell call without a command");
            return (
                ToolCallResult::error(&call.id, "Invalid arguments: 'command' must be a non-empty string"),
                None,
            );
        };

        let decision = self.gate.evaluate(&mut session.gate, command);
        let result = match decision.kind {
            DecisionKind::Deny => ToolCallResult::error(&call.id, decision.to_string()),
            DecisionKind::RequireConfirmation => {
                ToolCallResult::success(&call.id, decision.to_string())
            },
            DecisionKind::Allow => self.execute(session, call).await,
        };
        (result, Some(decision.kind))
    }

    async fn execute(&self, session: &AgentSession, call: &ToolCall) -> ToolCallResult {
        let Some(tool) = self.registry.get(&call.name) else {
            warn!(tool = %call.name, "model requested an unknown tool");
            return ToolCallResult::error(&call.id, format!("Unknown tool: {}", call.name));
        };

        debug!(session_id = %session.id(), tool = %call.name, call_id = %call.id, "executing tool");
        match tool.execute(call.arguments.clone(), &session.tool_ctx).await {
            Ok(output) => ToolCallResult::success(&call.id, output),
            Err(e) => {
                debug!(tool = %call.name, error = %e, "tool failed");
                ToolCallResult::error(&call.id, e.to_string())
            },
        }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
