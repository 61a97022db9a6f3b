//! Configuration types for Warden.
//!
//! These types have no dependencies on other Warden crates. Gate rules are
//! mirrored as plain [`RuleEntry`] values and converted at the runtime
//! boundary. Every struct implements [`Default`] so a bare `[section]` header
//! produces a working configuration.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model endpoint and sampling settings.
    pub model: ModelConfig,
    /// Command gate rules and confirmation window.
    pub gate: GateSection,
    /// Built-in tool limits.
    pub tools: ToolsSection,
    /// Agent loop behaviour.
    pub runtime: RuntimeSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// ModelConfig
// ---------------------------------------------------------------------------

/// Chat completions endpoint and sampling settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model name sent to the API.
    pub model: String,
    /// API key. Prefer `OPENAI_API_KEY` over storing this in a file.
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API (e.g. `https://api.openai.com/v1`).
    pub base_url: Option<String>,
    /// Maximum tokens to request per completion.
    pub max_tokens: usize,
    /// Sampling temperature.
    pub temperature: f64,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("model", &self.model)
            .field("has_api_key", &self.api_key.is_some())
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Serialize for ModelConfig {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ModelConfig", 4)?;
        state.serialize_field("model", &self.model)?;
        // api_key is never written out.
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("max_tokens", &self.max_tokens)?;
        state.serialize_field("temperature", &self.temperature)?;
        state.end()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_owned(),
            api_key: None,
            base_url: None,
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

// ---------------------------------------------------------------------------
// GateSection
// ---------------------------------------------------------------------------

/// Command gate configuration.
///
/// The built-in rule table is always active; these entries can only add to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateSection {
    /// Seconds a sensitive command stays confirmable after it is first requested.
    pub confirmation_timeout_secs: u64,
    /// Additional patterns that are always refused.
    pub extra_deny: Vec<RuleEntry>,
    /// Additional patterns that need confirmation.
    pub extra_confirm: Vec<RuleEntry>,
}

impl Default for GateSection {
    fn default() -> Self {
        Self {
            confirmation_timeout_secs: 120,
            extra_deny: Vec::new(),
            extra_confirm: Vec::new(),
        }
    }
}

/// A user-defined gate rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Substring to match against the normalized command.
    pub pattern: String,
    /// Category label shown in decisions.
    #[serde(default = "default_rule_category")]
    pub category: String,
}

fn default_rule_category() -> String {
    "custom rule".to_owned()
}

// ---------------------------------------------------------------------------
// ToolsSection
// ---------------------------------------------------------------------------

/// Built-in tool limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    /// Default timeout for `system_command`, in seconds.
    pub command_timeout_secs: u64,
    /// Tool output beyond this many characters is truncated.
    pub max_output_chars: usize,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            command_timeout_secs: 60,
            max_output_chars: 30_000,
        }
    }
}

// ---------------------------------------------------------------------------
// RuntimeSection
// ---------------------------------------------------------------------------

/// Agent loop behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSection {
    /// System prompt sent with every completion.
    pub system_prompt: String,
    /// Maximum model round-trips with tool calls per user turn.
    pub max_tool_rounds: usize,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            system_prompt: String::new(),
            max_tool_rounds: 8,
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"`, or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["warden_gate=debug"]`).
    pub directives: Vec<String>,
    /// Write logs to this file instead of stderr.
    pub file: Option<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_sections_use_defaults() {
        let config: Config = toml::from_str("[gate]\n[tools]\n").unwrap();
        assert_eq!(config.gate.confirmation_timeout_secs, 120);
        assert_eq!(config.tools.command_timeout_secs, 60);
        assert_eq!(config.runtime.max_tool_rounds, 8);
    }

    #[test]
    fn test_rule_entry_category_defaults() {
        let config: Config = toml::from_str(
            r#"
            [gate]
            extra_deny = [{ pattern = "cipher /w" }]
            extra_confirm = [{ pattern = "net stop", category = "service stop" }]
        "#,
        )
        .unwrap();
        assert_eq!(config.gate.extra_deny[0].category, "custom rule");
        assert_eq!(config.gate.extra_confirm[0].category, "service stop");
    }

    #[test]
    fn test_model_config_redacts_api_key() {
        let cfg = ModelConfig {
            api_key: Some("sk-secret-12345".to_owned()),
            ..ModelConfig::default()
        };

        let debug_str = format!("{cfg:?}");
        assert!(!debug_str.contains("sk-secret-12345"));
        assert!(debug_str.contains("has_api_key: true"));

        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("sk-secret-12345"));
        assert!(!json.contains("api_key"));
    }
}
