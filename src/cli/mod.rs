//! Command-line interface for release-reconciler.
//!
//! Reconciles canonical release JSON files against the configured providers
//! and exposes the strategy generator and similarity engine for inspection.

mod commands;

pub use commands::{Cli, Commands, run_command};
