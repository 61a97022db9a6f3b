//! Warden CLI - an agent shell behind a command safety gate.
//!
//! Every shell command the model asks for is checked against the gate's rule
//! table: destructive commands are refused, sensitive ones must be sent twice.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use warden_config::Config;
use warden_runtime::config_bridge;

mod commands;
mod repl;
mod theme;

use commands::{chat, check, config, rules, shell};

/// Warden - agent runtime with a command safety gate
#[derive(Parser)]
#[command(name = "warden")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Workspace directory (defaults to the current directory)
    #[arg(short, long, global = true)]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session with the configured model
    Chat,

    /// Run shell commands by hand through the gate (no model)
    Shell,

    /// Classify a command without running it
    ///
    /// Exit code 0 means allowed, 2 confirmation required, 3 denied.
    Check {
        /// The command to classify
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Show the effective gate rule table
    Rules,

    /// View and validate configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show resolved configuration
    Show {
        /// Output format (toml or json)
        #[arg(short, long, default_value = "toml")]
        format: String,
        /// Also list which layer set each field
        #[arg(long)]
        sources: bool,
    },
    /// Validate the current configuration
    Validate,
    /// Show config file paths being checked
    Paths,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let workspace = match cli.workspace {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    // Load config once; logging uses it when it is valid.
    let resolved = Config::load(Some(workspace.as_path()));

    let log_config = if let Ok(r) = &resolved {
        let mut lc = config_bridge::to_log_config(&r.config);
        if cli.verbose {
            "debug".clone_into(&mut lc.level);
        }
        lc
    } else {
        let level = if cli.verbose { "debug" } else { "warn" };
        warden_telemetry::LogConfig::new(level)
    };
    if let Err(e) = warden_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match cli.command {
        Some(Commands::Chat) | None => chat::run_chat(&workspace, &resolved?.config).await,
        Some(Commands::Shell) => shell::run_shell(&workspace, &resolved?.config).await,
        Some(Commands::Check { command }) => {
            let code = check::run_check(&resolved?.config, &command.join(" "))?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        },
        Some(Commands::Rules) => rules::show_rules(&resolved?.config),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show { format, sources } => {
                config::show_config(&workspace, &format, sources)
            },
            ConfigCommands::Validate => config::validate_config(&workspace),
            ConfigCommands::Paths => config::show_paths(&workspace),
        },
    }
}
