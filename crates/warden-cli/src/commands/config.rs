//! CLI handlers for the `warden config` subcommand.

use std::path::Path;

use anyhow::Result;
use warden_config::{Config, ShowFormat};

use crate::theme::Theme;

/// Show the resolved configuration, optionally with field sources.
pub(crate) fn show_config(workspace: &Path, format: &str, sources: bool) -> Result<()> {
    let resolved = Config::load(Some(workspace))?;

    let show_format = match format {
        "json" => ShowFormat::Json,
        _ => ShowFormat::Toml,
    };

    let output = resolved
        .render(show_format)
        .map_err(|e| anyhow::anyhow!("failed to format config: {e}"))?;
    println!("{output}");

    if sources {
        println!("{}", Theme::header("Field sources"));
        for (field, layer) in resolved.sources_sorted() {
            println!("  {field:<36} {}", Theme::dimmed(&layer));
        }
    }
    Ok(())
}

/// Validate the current configuration.
#[allow(clippy::unnecessary_wraps)]
pub(crate) fn validate_config(workspace: &Path) -> Result<()> {
    match Config::load(Some(workspace)) {
        Ok(resolved) => {
            println!("{}", Theme::success("Configuration is valid."));
            if !resolved.loaded_files.is_empty() {
                println!("\nLoaded files:");
                for path in &resolved.loaded_files {
                    println!("  - {path}");
                }
            }
            Ok(())
        },
        Err(e) => {
            eprintln!("{}", Theme::error(&format!("Configuration error: {e}")));
            std::process::exit(1);
        },
    }
}

/// Show all config file paths that are checked.
pub(crate) fn show_paths(workspace: &Path) -> Result<()> {
    let paths = warden_config::loader::config_paths(Some(workspace), None)?;

    println!("Configuration files checked (lowest precedence first):\n");
    println!("  1. (embedded defaults)");
    let files = std::iter::once(&paths.user).chain(paths.workspace.as_ref());
    for (i, path) in (2..).zip(files) {
        let status = if path.exists() { "found" } else { "not found" };
        println!("  {i}. {}  [{status}]", path.display());
    }

    println!("\nEnvironment variable fallbacks:");
    println!("  OPENAI_API_KEY  -> model.api_key");
    println!("  OPENAI_MODEL    -> model.model");
    println!("  OPENAI_BASE_URL -> model.base_url");

    Ok(())
}
