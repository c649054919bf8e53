//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Run Gemini workflow tasks from definition files.
#[derive(Parser, Debug)]
#[command(name = "gemini-tasks")]
#[command(about = "Run Gemini text, chat, structured output, multimodal and video tasks")]
#[command(version)]
pub struct Cli {
    /// Settings file (defaults to ./gemini_tasks.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a task and print its output as JSON
    Run {
        /// Task definition file (.toml, .yaml, .yml or .json)
        path: PathBuf,

        /// Template variable, as NAME=VALUE (repeatable)
        #[arg(long = "var", value_parser = parse_variable)]
        vars: Vec<(String, String)>,

        /// Identifier used in logs
        #[arg(long, default_value = "local")]
        task_id: String,
    },

    /// Render a task definition and check its inputs without calling the API
    Validate {
        /// Task definition file (.toml, .yaml, .yml or .json)
        path: PathBuf,

        /// Template variable, as NAME=VALUE (repeatable)
        #[arg(long = "var", value_parser = parse_variable)]
        vars: Vec<(String, String)>,
    },
}

/// Parses `NAME=VALUE`.
fn parse_variable(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))
}
