//! Environment variable fallbacks.
//!
//! `OPENAI_API_KEY`, `OPENAI_MODEL` and `OPENAI_BASE_URL` fill model fields
//! that no config file set. A value from the embedded defaults counts as
//! unset; a value from a user or workspace file always wins.

use std::collections::HashMap;

use crate::merge::{ConfigLayer, FieldSources, get_nested, set_nested};

/// Environment variable → config path mappings.
const ENV_FALLBACKS: &[(&str, &[&str])] = &[
    ("OPENAI_API_KEY", &["model", "api_key"]),
    ("OPENAI_MODEL", &["model", "model"]),
    ("OPENAI_BASE_URL", &["model", "base_url"]),
];

/// Snapshot the relevant environment variables.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    ENV_FALLBACKS
        .iter()
        .filter_map(|(name, _)| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| ((*name).to_owned(), v))
        })
        .collect()
}

/// Apply env var fallbacks to `merged`, returning how many were applied.
pub fn apply_env_fallbacks(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String>,
) -> usize {
    let mut applied: usize = 0;

    for (name, path) in ENV_FALLBACKS {
        let Some(value) = env_vars.get(*name) else {
            continue;
        };
        let dotted = path.join(".");
        let set_by_file = get_nested(merged, path).is_some()
            && sources
                .get(&dotted)
                .is_some_and(|layer| *layer != ConfigLayer::Defaults);
        if set_by_file {
            continue;
        }

        set_nested(merged, path, toml::Value::String(value.clone()));
        sources.insert(dotted, ConfigLayer::Environment);
        applied = applied.saturating_add(1);
    }

    applied
}
