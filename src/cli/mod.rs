//! Command-line interface for stream-resolver.
//!
//! This module provides CLI commands for resolving identifiers, inspecting
//! the configured pools, and bootstrapping a config file.

mod commands;

pub use commands::{Cli, Commands, run_command};
