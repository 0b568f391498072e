//! Command-line interface for question-forge.
//!
//! Provides the validate, clean and stats commands.

mod commands;

pub use commands::{parse_cli, run, run_with_cli, validate_bank, Cli, Commands};
