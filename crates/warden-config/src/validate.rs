//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Upper bound for any command timeout (10 minutes).
pub const MAX_COMMAND_TIMEOUT_SECS: u64 = 600;

/// Upper bound for the confirmation window (1 hour).
pub const MAX_CONFIRMATION_TIMEOUT_SECS: u64 = 3600;

/// Maximum allowed `max_tokens` value.
const MAX_TOKENS_UPPER_BOUND: usize = 16_000_000;

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_model(config)?;
    validate_gate(config)?;
    validate_tools(config)?;
    validate_runtime(config)?;
    validate_logging(config)?;
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_owned(),
        message: message.into(),
    }
}

fn validate_model(config: &Config) -> ConfigResult<()> {
    let m = &config.model;

    if m.model.trim().is_empty() {
        return Err(invalid("model.model", "model name must not be empty"));
    }

    if !(0.0..=2.0).contains(&m.temperature) {
        return Err(invalid(
            "model.temperature",
            format!(
                "temperature {} is out of range; must be between 0.0 and 2.0",
                m.temperature
            ),
        ));
    }

    if m.max_tokens == 0 || m.max_tokens > MAX_TOKENS_UPPER_BOUND {
        return Err(invalid(
            "model.max_tokens",
            format!("max_tokens must be between 1 and {MAX_TOKENS_UPPER_BOUND}"),
        ));
    }

    if let Some(url) = &m.base_url
        && !(url.starts_with("http://") || url.starts_with("https://"))
    {
        return Err(invalid(
            "model.base_url",
            format!("'{url}' must start with http:// or https://"),
        ));
    }

    Ok(())
}

fn validate_gate(config: &Config) -> ConfigResult<()> {
    let g = &config.gate;

    if g.confirmation_timeout_secs == 0
        || g.confirmation_timeout_secs > MAX_CONFIRMATION_TIMEOUT_SECS
    {
        return Err(invalid(
            "gate.confirmation_timeout_secs",
            format!("must be between 1 and {MAX_CONFIRMATION_TIMEOUT_SECS}"),
        ));
    }

    for (field, entries) in [("gate.extra_deny", &g.extra_deny), ("gate.extra_confirm", &g.extra_confirm)] {
        if entries.iter().any(|e| e.pattern.trim().is_empty()) {
            return Err(invalid(field, "rule patterns must not be empty"));
        }
    }

    Ok(())
}

fn validate_tools(config: &Config) -> ConfigResult<()> {
    let t = &config.tools;

    if t.command_timeout_secs == 0 || t.command_timeout_secs > MAX_COMMAND_TIMEOUT_SECS {
        return Err(invalid(
            "tools.command_timeout_secs",
            format!("must be between 1 and {MAX_COMMAND_TIMEOUT_SECS}"),
        ));
    }

    if t.max_output_chars == 0 {
        return Err(invalid("tools.max_output_chars", "must be greater than 0"));
    }

    Ok(())
}

fn validate_runtime(config: &Config) -> ConfigResult<()> {
    if config.runtime.max_tool_rounds == 0 {
        return Err(invalid("runtime.max_tool_rounds", "must be greater than 0"));
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        return Err(invalid(
            "logging.level",
            format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                valid_levels.join(", ")
            ),
        ));
    }

    let valid_formats = ["pretty", "compact", "json", "full"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        return Err(invalid(
            "logging.format",
            format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                valid_formats.join(", ")
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RuleEntry;

    fn field_of(result: ConfigResult<()>) -> String {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_temperature_range() {
        let mut config = Config::default();
        config.model.temperature = 1.5;
        assert!(validate(&config).is_ok());
        config.model.temperature = 2.5;
        assert_eq!(field_of(validate(&config)), "model.temperature");
    }

    #[test]
    fn test_timeouts_must_be_nonzero_and_capped() {
        let mut config = Config::default();
        config.tools.command_timeout_secs = 0;
        assert_eq!(field_of(validate(&config)), "tools.command_timeout_secs");
        config.tools.command_timeout_secs = 601;
        assert_eq!(field_of(validate(&config)), "tools.command_timeout_secs");

        let mut config = Config::default();
        config.gate.confirmation_timeout_secs = 0;
        assert_eq!(field_of(validate(&config)), "gate.confirmation_timeout_secs");
    }

    #[test]
    fn test_empty_rule_pattern_rejected() {
        let mut config = Config::default();
        config.gate.extra_confirm.push(RuleEntry {
            pattern: "  ".into(),
            category: "x".into(),
        });
        assert_eq!(field_of(validate(&config)), "gate.extra_confirm");
    }

    #[test]
    fn test_max_tool_rounds_nonzero() {
        let mut config = Config::default();
        config.runtime.max_tool_rounds = 0;
        assert_eq!(field_of(validate(&config)), "runtime.max_tool_rounds");
    }

    #[test]
    fn test_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".into();
        assert_eq!(field_of(validate(&config)), "logging.format");
    }

    #[test]
    fn test_base_url_scheme() {
        let mut config = Config::default();
        config.model.base_url = Some("api.openai.com/v1".into());
        assert_eq!(field_of(validate(&config)), "model.base_url");
    }
}
