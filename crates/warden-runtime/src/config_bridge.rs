//! Bridge from `warden_config::Config` to domain types.
//!
//! The config crate has no dependencies on other internal crates. These
//! functions translate its plain types into gate rules, runtime settings,
//! provider settings, and logging settings, so that the conversion happens in
//! one place for every frontend.

use std::path::PathBuf;
use std::time::Duration;

use warden_config::{Config, RuleEntry};
use warden_gate::{GateResult, Rule, RuleCategory, RuleTable};
use warden_llm::ProviderConfig;
use warden_telemetry::{LogConfig, LogFormat, LogTarget};

use crate::RuntimeConfig;

/// Build the effective rule table: built-in rules followed by configured ones.
///
/// Configured rules can only add to the table.
///
/// # Errors
///
/// Returns a [`warden_gate::GateError`] if a configured pattern is empty or
/// duplicates an existing rule.
pub fn to_rule_table(cfg: &Config) -> GateResult<RuleTable> {
    let mut table = RuleTable::default();
    table.extend(cfg.gate.extra_deny.iter().map(|e| Rule::deny(&e.pattern, category(e))))?;
    table.extend(
        cfg.gate
            .extra_confirm
            .iter()
            .map(|e| Rule::confirm(&e.pattern, category(e))),
    )?;
    Ok(table)
}

fn category(entry: &RuleEntry) -> RuleCategory {
    RuleCategory::Custom(entry.category.clone())
}

/// Convert config to [`RuntimeConfig`].
#[must_use]
pub fn to_runtime_config(cfg: &Config) -> RuntimeConfig {
    let window_secs = i64::try_from(cfg.gate.confirmation_timeout_secs).unwrap_or(i64::MAX);
    RuntimeConfig {
        system_prompt: cfg.runtime.system_prompt.clone(),
        max_tool_rounds: cfg.runtime.max_tool_rounds,
        confirmation_window: chrono::Duration::try_seconds(window_secs)
            .unwrap_or(warden_gate::DEFAULT_CONFIRMATION_WINDOW),
        command_timeout: Duration::from_secs(cfg.tools.command_timeout_secs),
        max_output_chars: cfg.tools.max_output_chars,
    }
}

/// Convert config to [`ProviderConfig`].
///
/// The API key already includes the `OPENAI_API_KEY` fallback applied by
/// [`Config::load`]. A missing key becomes an empty string; the provider
/// reports it on the first call unless the endpoint is local.
#[must_use]
pub fn to_provider_config(cfg: &Config) -> ProviderConfig {
    let api_key = cfg.model.api_key.clone().unwrap_or_default();

    let mut provider = ProviderConfig::new(api_key, &cfg.model.model)
        .max_tokens(cfg.model.max_tokens)
        .temperature(cfg.model.temperature);

    if let Some(url) = &cfg.model.base_url {
        provider = provider.base_url(url);
    }

    provider
}

/// Convert config to [`LogConfig`].
#[must_use]
pub fn to_log_config(cfg: &Config) -> LogConfig {
    let format = cfg.logging.format.parse().unwrap_or(LogFormat::Compact);

    let mut log_config = LogConfig::new(&cfg.logging.level).with_format(format);

    if let Some(file) = &cfg.logging.file {
        log_config = log_config.with_target(LogTarget::File(PathBuf::from(file)));
    }

    for directive in &cfg.logging.directives {
        log_config = log_config.with_directive(directive);
    }

    log_config
}
