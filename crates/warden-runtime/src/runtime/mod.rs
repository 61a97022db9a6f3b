//! Agent runtime - the main orchestration component.
//!
//! Couples an LLM provider to the gated tool dispatcher.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use warden_gate::RuleTable;
use warden_llm::LlmProvider;
use warden_tools::ToolRegistry;

use crate::dispatch::ToolDispatcher;
use crate::session::AgentSession;

mod config;
mod execution;

#[cfg(test)]
mod tests;

pub use config::RuntimeConfig;
pub use execution::TurnOutcome;

/// The main agent runtime.
///
/// Holds no per-conversation state. Everything that changes during a
/// conversation lives in the [`AgentSession`] passed to each call.
pub struct AgentRuntime<P: LlmProvider> {
    /// LLM provider.
    pub(super) llm: Arc<P>,
    /// Gated tool dispatcher.
    pub(super) dispatcher: ToolDispatcher,
    /// Configuration.
    pub(super) config: RuntimeConfig,
}

impl<P: LlmProvider> AgentRuntime<P> {
    /// Create a runtime with the default tools.
    #[must_use]
    pub fn new(llm: P, rules: RuleTable, config: RuntimeConfig) -> Self {
        Self::with_registry(llm, rules, ToolRegistry::with_defaults(), config)
    }

    /// Create a runtime with a specific tool registry.
    #[must_use]
    pub fn with_registry(
        llm: P,
        rules: RuleTable,
        registry: ToolRegistry,
        config: RuntimeConfig,
    ) -> Self {
        info!(
            model = llm.model(),
            provider = llm.name(),
            rules = rules.len(),
            tools = ?registry.names().collect::<Vec<_>>(),
            max_tool_rounds = config.max_tool_rounds,
            "Agent runtime initialized"
        );
        Self {
            llm: Arc::new(llm),
            dispatcher: ToolDispatcher::new(Arc::new(rules), registry),
            config,
        }
    }

    /// Create a session whose tools run in `cwd`.
    #[must_use]
    pub fn create_session(&self, cwd: PathBuf) -> AgentSession {
        let session = AgentSession::from_config(&self.config, cwd);
        info!(session_id = %session.id(), cwd = %session.tool_ctx.cwd.display(), "Session created");
        session
    }

    /// End a session, discarding its history and pending confirmation.
    pub fn end_session(&self, session: &mut AgentSession) {
        session.end();
        info!(session_id = %session.id(), "Session ended");
    }

    /// Forget the conversation but keep gate state.
    pub fn clear_history(&self, session: &mut AgentSession) {
        session.clear_history();
        info!(session_id = %session.id(), "Conversation cleared");
    }

    /// The LLM provider.
    #[must_use]
    pub fn llm(&self) -> &P {
        &self.llm
    }

    /// The tool dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    /// The runtime configuration.
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}

impl<P: LlmProvider> std::fmt::Debug for AgentRuntime<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRuntime")
            .field("provider", &self.llm.name())
            .field("model", &self.llm.model())
            .field("dispatcher", &self.dispatcher)
            .field("config", &self.config)
            .finish()
    }
}
