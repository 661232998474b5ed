//! Pinfile CLI library — exposes command internals for integration testing.

pub mod commands;
pub mod config;
pub mod output;
