//! Rule table: the patterns the gate matches commands against.
//!
//! A [`Rule`] pairs a lowercase pattern with a danger [`RuleCategory`] and a
//! [`RuleVerdict`]. A pattern matches when it occurs in the normalized command
//! as a substring or, for multi-word patterns, when every word of it appears
//! among the command's tokens in any order. Clustered flags are split first,
//! so `rm -r -f`, `rm -fr` and `rm -vrf` all carry `rm`, `-r` and `-f`, and
//! `rd /q/s` carries `/q` and `/s`.
//!
//! The [`RuleTable`] holds rules in declaration order and classifies a
//! command in two passes:
//!
//! 1. Any matching `Deny` rule -> that rule (first match wins)
//! 2. Any matching `Confirm` rule -> that rule (first match wins)
//! 3. Otherwise -> no rule
//!
//! Deny rules are always consulted first, so a command such as
//! `shutdown /s & format d:` is denied rather than queued for confirmation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{GateError, GateResult};

/// The danger category a rule belongs to.
///
/// The category is surfaced in decision reasons so the user learns *why*
/// a command was blocked or deferred.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Formatting a drive or creating a filesystem.
    DiskFormat,
    /// Recursive and/or forced deletion of files.
    RecursiveDelete,
    /// Disk partitioning tools.
    DiskPartition,
    /// Deleting registry keys or values.
    RegistryDelete,
    /// Forced termination of processes.
    ProcessKill,
    /// System shutdown, restart, or power-off.
    PowerControl,
    /// Ending the interactive user session.
    SessionControl,
    /// Category declared in configuration.
    Custom(String),
}

impl RuleCategory {
    /// Get a short human-readable label for the category.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::DiskFormat => "drive formatting",
            Self::RecursiveDelete => "recursive force-delete",
            Self::DiskPartition => "disk partitioning",
            Self::RegistryDelete => "registry deletion",
            Self::ProcessKill => "forced process termination",
            Self::PowerControl => "system shutdown/restart",
            Self::SessionControl => "session logoff",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the gate does when a rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleVerdict {
    /// Refuse outright. No confirmation can override.
    Deny,
    /// Require an exact resubmission before running.
    Confirm,
}

impl fmt::Display for RuleVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deny => write!(f, "deny"),
            Self::Confirm => write!(f, "confirm"),
        }
    }
}

/// A single pattern → category → verdict entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Normalized (trimmed, lowercase, single-spaced) pattern.
    pub pattern: String,
    /// Danger category reported when the rule matches.
    pub category: RuleCategory,
    /// Verdict applied when the rule matches.
    pub verdict: RuleVerdict,
}

impl Rule {
    /// Create a deny rule.
    #[must_use]
    pub fn deny(pattern: &str, category: RuleCategory) -> Self {
        Self {
            pattern: normalize_command(pattern),
            category,
            verdict: RuleVerdict::Deny,
        }
    }

    /// Create a confirmation rule.
    #[must_use]
    pub fn confirm(pattern: &str, category: RuleCategory) -> Self {
        Self {
            pattern: normalize_command(pattern),
            category,
            verdict: RuleVerdict::Confirm,
        }
    }

    /// Check whether this rule matches an already-normalized command.
    #[must_use]
    pub fn matches(&self, normalized: &str) -> bool {
        self.matches_tokens(normalized, &command_tokens(normalized))
    }

    fn matches_tokens(&self, normalized: &str, tokens: &HashSet<String>) -> bool {
        if self.pattern.is_empty() {
            return false;
        }
        if normalized.contains(&self.pattern) {
            return true;
        }
        let mut keywords = self.pattern.split(' ');
        keywords.clone().nth(1).is_some() && keywords.all(|k| tokens.contains(k))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<8} {:<28} {}", self.verdict, self.pattern, self.category)
    }
}

/// Normalize a command for matching purposes only.
///
/// Trims surrounding whitespace, lowercases, and collapses internal runs of
/// whitespace to a single space so `del  /s` cannot slip past `del /s`.
/// The original string is still what gets executed.
#[must_use]
pub fn normalize_command(command: &str) -> String {
    command
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a normalized command into the tokens keyword rules look for.
///
/// Each word is kept as is. Single-dash flag clusters also yield one token
/// per letter (`-rf` gives `-r` and `-f`) and slash flags joined together
/// yield one token per flag (`/q/s` gives `/q` and `/s`).
fn command_tokens(normalized: &str) -> HashSet<String> {
    let mut tokens = HashSet::new();
    for word in normalized.split(' ') {
        if let Some(cluster) = word
            .strip_prefix('-')
            .filter(|c| c.len() > 1 && !c.starts_with('-'))
        {
            tokens.extend(cluster.chars().map(|c| format!("-{c}")));
        } else if word.starts_with('/') {
            tokens.extend(
                word.split('/')
                    .filter(|flag| !flag.is_empty())
                    .map(|flag| format!("/{flag}")),
            );
        }
        tokens.insert(word.to_string());
    }
    tokens
}

/// Ordered table of gate rules.
///
/// # Example
///
/// ```
/// use warden_gate::{RuleTable, RuleVerdict};
///
/// let table = RuleTable::default();
/// let rule = table.classify("DiskPart /s script.txt").unwrap();
/// assert_eq!(rule.verdict, RuleVerdict::Deny);
///
/// assert!(table.classify("dir D:\\").is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Create an empty table (everything allowed).
    #[must_use]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::EmptyPattern`] if the pattern normalizes to an
    /// empty string, or [`GateError::DuplicatePattern`] if the pattern is
    /// already present.
    pub fn push(&mut self, rule: Rule) -> GateResult<()> {
        if rule.pattern.is_empty() {
            return Err(GateError::EmptyPattern {
                category: rule.category.to_string(),
            });
        }
        if self.rules.iter().any(|r| r.pattern == rule.pattern) {
            return Err(GateError::DuplicatePattern {
                pattern: rule.pattern,
            });
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Append several rules, stopping at the first invalid one.
    ///
    /// # Errors
    ///
    /// See [`push`](Self::push).
    pub fn extend(&mut self, rules: impl IntoIterator<Item = Rule>) -> GateResult<()> {
        for rule in rules {
            self.push(rule)?;
        }
        Ok(())
    }

    /// Find the rule that governs a command, if any.
    ///
    /// Deny rules take precedence over confirmation rules regardless of
    /// their position in the table.
    #[must_use]
    pub fn classify(&self, command: &str) -> Option<&Rule> {
        let normalized = normalize_command(command);
        let tokens = command_tokens(&normalized);
        self.first_match(&normalized, &tokens, RuleVerdict::Deny)
            .or_else(|| self.first_match(&normalized, &tokens, RuleVerdict::Confirm))
    }

    fn first_match(
        &self,
        normalized: &str,
        tokens: &HashSet<String>,
        verdict: RuleVerdict,
    ) -> Option<&Rule> {
        self.rules
            .iter()
            .filter(|r| r.verdict == verdict)
            .find(|r| r.matches_tokens(normalized, tokens))
    }

    /// All rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleTable {
    /// Built-in rules:
    /// - Denies drive formatting, recursive deletes, partitioning, registry
    ///   deletion, and forced process kills (Windows and POSIX spellings)
    /// - Requires confirmation for shutdown, restart, power-off, and logoff
    fn default() -> Self {
        use RuleCategory::{
            DiskFormat, DiskPartition, PowerControl, ProcessKill, RecursiveDelete,
            RegistryDelete, SessionControl,
        };

        let rules = vec![
            Rule::deny("format", DiskFormat),
            Rule::deny("mkfs", DiskFormat),
            Rule::deny("del /s", RecursiveDelete),
            Rule::deny("erase /s", RecursiveDelete),
            Rule::deny("rd /s", RecursiveDelete),
            Rule::deny("rmdir /s", RecursiveDelete),
            Rule::deny("rm -r -f", RecursiveDelete),
            Rule::deny("rm --recursive", RecursiveDelete),
            Rule::deny("remove-item -recurse -force", RecursiveDelete),
            Rule::deny("diskpart", DiskPartition),
            Rule::deny("fdisk", DiskPartition),
            Rule::deny("reg delete", RegistryDelete),
            Rule::deny("remove-itemproperty", RegistryDelete),
            Rule::deny("taskkill /f", ProcessKill),
            Rule::confirm("shutdown", PowerControl),
            Rule::confirm("restart-computer", PowerControl),
            Rule::confirm("stop-computer", PowerControl),
            Rule::confirm("reboot", PowerControl),
            Rule::confirm("poweroff", PowerControl),
            Rule::confirm("logoff", SessionControl),
        ];

        Self { rules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_lowercases_and_collapses() {
        assert_eq!(normalize_command("  DEL   /S  C:\\tmp \t"), "del /s c:\\tmp");
        assert_eq!(normalize_command(""), "");
        assert_eq!(normalize_command("   \n"), "");
    }

    #[test]
    fn test_default_denies_destructive_intents() {
        let table = RuleTable::default();
        for (command, category) in [
            ("format C: /q", RuleCategory::DiskFormat),
            ("del /f /s /q C:\\Users", RuleCategory::RecursiveDelete),
            ("diskpart", RuleCategory::DiskPartition),
            ("reg delete HKLM\\Software\\Foo /f", RuleCategory::RegistryDelete),
            ("rm -rf /", RuleCategory::RecursiveDelete),
            ("taskkill /F /IM explorer.exe", RuleCategory::ProcessKill),
        ] {
            let rule = table.classify(command).unwrap();
            assert_eq!(rule.verdict, RuleVerdict::Deny, "{command}");
            assert_eq!(rule.category, category, "{command}");
        }
    }

    #[test]
    fn test_default_requires_confirmation_for_power_control() {
        let table = RuleTable::default();
        for command in ["shutdown /s /t 60", "shutdown -r now", "Restart-Computer", "logoff"] {
            let rule = table.classify(command).unwrap();
            assert_eq!(rule.verdict, RuleVerdict::Confirm, "{command}");
        }
    }

    #[test]
    fn test_case_and_spacing_do_not_evade_denylist() {
        let table = RuleTable::default();
        assert!(table.classify("FoRmAt d:").is_some());
        assert!(table.classify("del    /s   *.*").is_some());
        assert!(table.classify("\tRM -RF ~/").is_some());
    }

    #[test]
    fn test_flag_order_does_not_evade_denylist() {
        let table = RuleTable::default();
        for command in [
            "del /q /f /s C:\\data",
            "del /f /q /s C:\\data",
            "DEL /S /Q *.*",
            "erase /q /s D:\\old",
            "rd /q /s C:\\",
            "rd /s/q C:\\tmp",
            "rmdir /q /s C:\\x",
            "rm -r -f /",
            "rm -f -r /tmp/x",
            "rm -fr ~",
            "rm -Rf build",
            "rm -vrf build",
            "rm --recursive --force /",
            "rm --force --recursive /",
            "Remove-Item -Force -Recurse C:\\data",
            "taskkill /IM explorer.exe /F",
        ] {
            let rule = table.classify(command);
            assert!(
                rule.is_some_and(|r| r.verdict == RuleVerdict::Deny),
                "{command} was not denied"
            );
        }
    }

    #[test]
    fn test_keyword_rules_need_every_keyword() {
        let table = RuleTable::default();
        for command in ["rm -r build", "rm -f stale.lock", "del C:\\tmp\\a.txt", "rd empty"] {
            assert!(table.classify(command).is_none(), "{command}");
        }
    }

    #[test]
    fn test_single_rule_matches_any_flag_order() {
        let rule = Rule::deny("rm -r -f", RuleCategory::RecursiveDelete);
        assert!(rule.matches("rm -f -r x"));
        assert!(rule.matches("rm -rf x"));
        assert!(!rule.matches("rm -r x"));
        assert!(!Rule::deny("  ", RuleCategory::RecursiveDelete).matches("rm -rf x"));
    }

    #[test]
    fn test_command_tokens_split_flag_clusters() {
        let tokens = command_tokens("rm -rf /tmp/x");
        assert!(tokens.contains("-r"));
        assert!(tokens.contains("-f"));
        assert!(tokens.contains("-rf"));

        let tokens = command_tokens("rd /s/q c:\\tmp");
        assert!(tokens.contains("/s"));
        assert!(tokens.contains("/q"));

        // Long options stay whole.
        let tokens = command_tokens("rm --recursive");
        assert!(tokens.contains("--recursive"));
        assert!(!tokens.contains("-r"));
    }

    #[test]
    fn test_deny_beats_confirm_regardless_of_order() {
        let mut table = RuleTable::empty();
        table
            .push(Rule::confirm("shutdown", RuleCategory::PowerControl))
            .unwrap();
        table
            .push(Rule::deny("format", RuleCategory::DiskFormat))
            .unwrap();

        let rule = table.classify("shutdown /s & format d:").unwrap();
        assert_eq!(rule.verdict, RuleVerdict::Deny);
    }

    #[test]
    fn test_unmatched_commands_have_no_rule() {
        let table = RuleTable::default();
        assert!(table.classify("dir D:\\").is_none());
        assert!(table.classify("ipconfig /all").is_none());
        assert!(table.classify("").is_none());
    }

    #[test]
    fn test_push_rejects_empty_pattern() {
        let mut table = RuleTable::empty();
        let err = table
            .push(Rule::deny("   ", RuleCategory::Custom("blank".into())))
            .unwrap_err();
        assert!(matches!(err, GateError::EmptyPattern { .. }));
        assert!(table.is_empty());
    }

    #[test]
    fn test_push_rejects_duplicate_after_normalization() {
        let mut table = RuleTable::default();
        let err = table
            .push(Rule::confirm("  FORMAT ", RuleCategory::DiskFormat))
            .unwrap_err();
        assert!(matches!(err, GateError::DuplicatePattern { ref pattern } if pattern == "format"));
    }

    #[test]
    fn test_custom_rules_extend_defaults() {
        let mut table = RuleTable::default();
        let before = table.len();
        table
            .extend([
                Rule::deny("cipher /w", RuleCategory::Custom("free-space wipe".into())),
                Rule::confirm("net stop", RuleCategory::Custom("service stop".into())),
            ])
            .unwrap();
        assert_eq!(table.len(), before + 2);

        let rule = table.classify("cipher /w:C").unwrap();
        assert_eq!(rule.category.label(), "free-space wipe");
        assert_eq!(
            table.classify("net stop spooler").unwrap().verdict,
            RuleVerdict::Confirm
        );
    }

    #[test]
    fn test_rule_serialization() {
        let rule = Rule::deny("diskpart", RuleCategory::DiskPartition);
        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("\"disk_partition\""));
        assert!(json.contains("\"deny\""));
    }
}
