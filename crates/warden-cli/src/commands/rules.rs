//! `warden rules`: print the effective rule table.

use anyhow::Result;
use warden_config::Config;
use warden_gate::RuleVerdict;
use warden_runtime::config_bridge;

use crate::theme::Theme;

/// Print every rule, deny rules first, then the confirmation window.
pub(crate) fn show_rules(cfg: &Config) -> Result<()> {
    let table = config_bridge::to_rule_table(cfg)?;

    println!("{}", Theme::header("Gate rules"));
    println!("{}", Theme::separator());
    for verdict in [RuleVerdict::Deny, RuleVerdict::Confirm] {
        for rule in table.rules().iter().filter(|r| r.verdict == verdict) {
            println!(
                "  {} {:<28} {}",
                Theme::verdict(rule.verdict),
                rule.pattern,
                Theme::dimmed(rule.category.label())
            );
        }
    }
    println!("{}", Theme::separator());
    println!(
        "{}",
        Theme::info(&format!(
            "{} rules; confirmations expire after {}s",
            table.len(),
            cfg.gate.confirmation_timeout_secs
        ))
    );
    Ok(())
}
