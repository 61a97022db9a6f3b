//! CLI subcommand handlers.

pub(crate) mod chat;
pub(crate) mod check;
pub(crate) mod config;
pub(crate) mod rules;
pub(crate) mod shell;
