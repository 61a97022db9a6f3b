//! CLI theme and styling.

use colored::Colorize;
use warden_gate::{DecisionKind, RuleVerdict};

/// CLI theme configuration.
pub(crate) struct Theme;

impl Theme {
    /// Format a header.
    pub(crate) fn header(text: &str) -> String {
        format!("{}", text.bold().cyan())
    }

    /// Format a success message.
    pub(crate) fn success(text: &str) -> String {
        format!("{} {}", "✓".green(), text)
    }

    /// Format an error message.
    pub(crate) fn error(text: &str) -> String {
        format!("{} {}", "✗".red(), text.red())
    }

    /// Format a warning message.
    pub(crate) fn warning(text: &str) -> String {
        format!("{} {}", "!".yellow(), text.yellow())
    }

    /// Format an info message.
    pub(crate) fn info(text: &str) -> String {
        format!("{} {}", "i".blue(), text)
    }

    /// Format a dimmed message.
    pub(crate) fn dimmed(text: &str) -> String {
        format!("{}", text.dimmed())
    }

    /// Format a separator line.
    pub(crate) fn separator() -> String {
        "━".repeat(50).dimmed().to_string()
    }

    /// Format a key-value pair.
    pub(crate) fn kv(key: &str, value: &str) -> String {
        format!("{}: {}", key.bold(), value)
    }

    /// Format a gate decision tag.
    pub(crate) fn decision(kind: DecisionKind) -> String {
        let tag = format!("[{kind}]");
        match kind {
            DecisionKind::Allow => tag.green().to_string(),
            DecisionKind::RequireConfirmation => tag.yellow().bold().to_string(),
            DecisionKind::Deny => tag.red().bold().to_string(),
        }
    }

    /// Format a rule verdict.
    pub(crate) fn verdict(verdict: RuleVerdict) -> String {
        let text = format!("{verdict:<8}");
        match verdict {
            RuleVerdict::Deny => text.red().to_string(),
            RuleVerdict::Confirm => text.yellow().to_string(),
        }
    }
}

/// Print a banner for the CLI.
pub(crate) fn print_banner(mode: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!("{} {}", "warden".bold().cyan(), format!("v{version}").dimmed());
    println!("{}", mode.dimmed());
    println!();
}
