//! CLI subcommand implementations for the pinfile binary.

pub mod check;
pub mod diff_cmd;
pub mod fmt;
pub mod list;
