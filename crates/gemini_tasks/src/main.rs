//! gemini-tasks command-line runner.

use clap::Parser;
use gemini_tasks::cli::{Cli, Commands, handle_run_command, handle_validate_command};
use gemini_tasks::{Settings, init_observability, init_tracing, shutdown_observability};
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    init_tracing(*settings.log_format(), settings.log_filter())?;
    init_observability("gemini_tasks", *settings.metrics_export_interval_secs())?;
    debug!(?settings, "Settings loaded");

    let result = match cli.command {
        Commands::Run {
            path,
            vars,
            task_id,
        } => handle_run_command(&settings, &path, vars, &task_id).await,
        Commands::Validate { path, vars } => handle_validate_command(&settings, &path, vars),
    };

    shutdown_observability();
    result
}
