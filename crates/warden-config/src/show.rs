//! Resolved configuration with per-field provenance.

use crate::error::{ConfigError, ConfigResult};
use crate::merge::FieldSources;
use crate::types::Config;

/// Output format for [`ResolvedConfig::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowFormat {
    /// TOML, as it would appear in a config file.
    #[default]
    Toml,
    /// Pretty-printed JSON.
    Json,
}

/// A fully merged configuration plus where each value came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The effective configuration.
    pub config: Config,
    /// Which layer set each leaf field.
    pub field_sources: FieldSources,
    /// Config files that were found and merged, lowest precedence first.
    pub loaded_files: Vec<String>,
}

impl ResolvedConfig {
    /// Render the effective config. API keys are never included.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SerializeError`] if rendering fails.
    pub fn render(&self, format: ShowFormat) -> ConfigResult<String> {
        match format {
            ShowFormat::Toml => toml::to_string_pretty(&self.config)
                .map_err(|e| ConfigError::SerializeError(e.to_string())),
            ShowFormat::Json => serde_json::to_string_pretty(&self.config)
                .map_err(|e| ConfigError::SerializeError(e.to_string())),
        }
    }

    /// Field paths and their source layer, sorted by path.
    #[must_use]
    pub fn sources_sorted(&self) -> Vec<(&str, String)> {
        let mut out: Vec<_> = self
            .field_sources
            .iter()
            .map(|(k, v)| (k.as_str(), v.to_string()))
            .collect();
        out.sort_unstable();
        out
    }
}
