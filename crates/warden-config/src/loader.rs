//! Config file discovery and layered loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Parse `defaults.toml` → base
//! 2. Merge `~/.warden/config.toml` (user)
//! 3. Merge `{workspace}/.warden/config.toml` (workspace) + restriction enforcement
//! 4. Apply env var fallbacks for unset model fields
//! 5. Deserialize merged tree → `Config`
//! 6. Validate
//! 7. Return `ResolvedConfig`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{
    ConfigLayer, FieldSources, deep_merge_tracking, enforce_restrictions, record_leaves,
};
use crate::show::ResolvedConfig;
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Name of the per-user and per-workspace config directory.
pub const CONFIG_DIR_NAME: &str = ".warden";

/// Config file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Where each config layer is looked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    /// User config file.
    pub user: PathBuf,
    /// Workspace config file, if a workspace root was given.
    pub workspace: Option<PathBuf>,
}

/// Compute the config file locations.
///
/// `warden_home_override` is treated as the `.warden` directory itself.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDir`] if no override is given and the home
/// directory cannot be determined.
pub fn config_paths(
    workspace_root: Option<&Path>,
    warden_home_override: Option<&Path>,
) -> ConfigResult<ConfigPaths> {
    let user_dir = match warden_home_override {
        Some(h) => h.to_path_buf(),
        None => home_directory()?.join(CONFIG_DIR_NAME),
    };
    Ok(ConfigPaths {
        user: user_dir.join(CONFIG_FILE_NAME),
        workspace: workspace_root.map(|w| w.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)),
    })
}

/// Load the configuration with layered file precedence.
///
/// `workspace_root` is the directory the agent works in. If `None`, the
/// workspace layer is skipped.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any config file is malformed, or if the
/// final merged configuration fails validation.
pub fn load(
    workspace_root: Option<&Path>,
    warden_home_override: Option<&Path>,
) -> ConfigResult<ResolvedConfig> {
    let paths = config_paths(workspace_root, warden_home_override)?;
    load_layers(&paths, &collect_env_vars())
}

/// Load from explicit paths and environment snapshot.
pub(crate) fn load_layers(
    paths: &ConfigPaths,
    env_vars: &HashMap<String, String>,
) -> ConfigResult<ResolvedConfig> {
    // 1. Parse embedded defaults.
    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;

    let mut field_sources = FieldSources::new();
    let mut loaded_files = Vec::new();
    record_leaves(&merged, "", &ConfigLayer::Defaults, &mut field_sources);

    // 2. User config.
    if let Some(overlay) = try_load_file(&paths.user)? {
        deep_merge_tracking(
            &mut merged,
            &overlay,
            "",
            &ConfigLayer::User,
            &mut field_sources,
        );
        loaded_files.push(paths.user.display().to_string());
        info!(path = %paths.user.display(), "loaded user config");
    }

    // 3. Workspace config. The pre-workspace tree is the restriction baseline.
    if let Some(ws_path) = &paths.workspace
        && let Some(overlay) = try_load_file(ws_path)?
    {
        let baseline = merged.clone();
        deep_merge_tracking(
            &mut merged,
            &overlay,
            "",
            &ConfigLayer::Workspace,
            &mut field_sources,
        );
        enforce_restrictions(&mut merged, &baseline, &overlay);
        loaded_files.push(ws_path.display().to_string());
        info!(path = %ws_path.display(), "loaded workspace config");
    }

    // 4. Env var fallbacks.
    let env_count = apply_env_fallbacks(&mut merged, &mut field_sources, env_vars);
    if env_count > 0 {
        debug!(count = env_count, "applied environment variable fallbacks");
    }

    // 5. Deserialize.
    let config: Config =
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: "<merged config>".to_owned(),
                source: e,
            })?;

    // 6. Validate.
    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        field_sources,
        loaded_files,
    })
}

/// Load a config from a specific file path (no layering).
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
/// validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let Some(value) = try_load_file(path)? else {
        return Err(ConfigError::ReadError {
            path: path.display().to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
    };

    let config: Config = value
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::ParseError {
            path: path.display().to_string(),
            source: e,
        })?;

    validate::validate(&config)?;
    Ok(config)
}

/// Try to load a file, returning `None` if the file doesn't exist.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };

    if content.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit",
                content.len()
            ),
        });
    }

    let value: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(Some(value))
}

/// Determine the user's home directory.
fn home_directory() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Layout {
        _home: TempDir,
        _ws: TempDir,
        paths: ConfigPaths,
    }

    fn layout(user: Option<&str>, workspace: Option<&str>) -> Layout {
        let home = TempDir::new().unwrap();
        let ws = TempDir::new().unwrap();
        let paths = config_paths(Some(ws.path()), Some(home.path())).unwrap();
        if let Some(user) = user {
            std::fs::write(&paths.user, user).unwrap();
        }
        if let (Some(content), Some(ws_path)) = (workspace, &paths.workspace) {
            std::fs::create_dir_all(ws_path.parent().unwrap()).unwrap();
            std::fs::write(ws_path, content).unwrap();
        }
        Layout {
            _home: home,
            _ws: ws,
            paths,
        }
    }

    #[test]
    fn test_defaults_deserialize_to_config() {
        let config: Config = toml::from_str(DEFAULTS_TOML).unwrap();
        assert_eq!(config.model.model, "gpt-4");
        assert_eq!(config.gate.confirmation_timeout_secs, 120);
        assert_eq!(config.tools.command_timeout_secs, 60);
        assert!(config.runtime.system_prompt.contains("send exactly the same command again"));
        assert!(validate::validate(&config).is_ok());
    }

    #[test]
    fn test_load_defaults_only() {
        let l = layout(None, None);
        let resolved = load_layers(&l.paths, &HashMap::new()).unwrap();
        assert!(resolved.loaded_files.is_empty());
        assert_eq!(resolved.config.runtime.max_tool_rounds, 8);
        assert_eq!(
            resolved.field_sources.get("gate.confirmation_timeout_secs"),
            Some(&ConfigLayer::Defaults)
        );
    }

    #[test]
    fn test_user_then_workspace_precedence() {
        let l = layout(
            Some("[tools]\ncommand_timeout_secs = 90\n[logging]\nlevel = \"debug\"\n"),
            Some("[tools]\ncommand_timeout_secs = 30\n"),
        );
        let resolved = load_layers(&l.paths, &HashMap::new()).unwrap();
        assert_eq!(resolved.loaded_files.len(), 2);
        assert_eq!(resolved.config.tools.command_timeout_secs, 30);
        assert_eq!(resolved.config.logging.level, "debug");
        assert_eq!(
            resolved.field_sources.get("tools.command_timeout_secs"),
            Some(&ConfigLayer::Workspace)
        );
    }

    #[test]
    fn test_workspace_window_clamped_to_user_value() {
        let l = layout(
            Some("[gate]\nconfirmation_timeout_secs = 60\n"),
            Some("[gate]\nconfirmation_timeout_secs = 600\n"),
        );
        let resolved = load_layers(&l.paths, &HashMap::new()).unwrap();
        assert_eq!(resolved.config.gate.confirmation_timeout_secs, 60);
    }

    #[test]
    fn test_workspace_adds_rules() {
        let l = layout(
            Some("[gate]\nextra_deny = [{ pattern = \"cipher /w\" }]\n"),
            Some("[gate]\nextra_deny = [{ pattern = \"sdelete\" }]\n"),
        );
        let resolved = load_layers(&l.paths, &HashMap::new()).unwrap();
        assert_eq!(resolved.config.gate.extra_deny.len(), 2);
    }

    #[test]
    fn test_env_fallback_and_file_precedence() {
        let env: HashMap<String, String> = [
            ("OPENAI_API_KEY".to_owned(), "sk-env".to_owned()),
            ("OPENAI_MODEL".to_owned(), "gpt-4o-mini".to_owned()),
        ]
        .into_iter()
        .collect();

        let l = layout(None, None);
        let resolved = load_layers(&l.paths, &env).unwrap();
        assert_eq!(resolved.config.model.api_key.as_deref(), Some("sk-env"));
        assert_eq!(resolved.config.model.model, "gpt-4o-mini");

        let l = layout(Some("[model]\nmodel = \"from-file\"\n"), None);
        let resolved = load_layers(&l.paths, &env).unwrap();
        assert_eq!(resolved.config.model.model, "from-file");
    }

    #[test]
    fn test_invalid_layer_fails_validation() {
        let l = layout(None, Some("[runtime]\nmax_tool_rounds = 0\n"));
        let err = load_layers(&l.paths, &HashMap::new()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let l = layout(Some("[gate\n"), None);
        let err = load_layers(&l.paths, &HashMap::new()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_load_file_nonexistent() {
        let result = load_file(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_try_load_file_missing() {
        let result = try_load_file(Path::new("/nonexistent/config.toml")).unwrap();
        assert!(result.is_none());
    }
}
