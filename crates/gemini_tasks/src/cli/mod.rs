//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the gemini-tasks binary.

mod commands;
mod run;
mod validate;

pub use commands::{Cli, Commands};
pub use run::{handle_run_command, local_context};
pub use validate::handle_validate_command;
