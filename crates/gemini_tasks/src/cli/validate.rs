//! Validation command handler.

use super::run::local_context;
use crate::{InMemoryMetricSink, Settings, TaskDefinition};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// Handles the validate command.
///
/// Parses the definition, renders every property and applies the input
/// checks each task performs before its first API call.
#[instrument(skip(settings, vars), fields(path = %path.display()))]
pub fn handle_validate_command(
    settings: &Settings,
    path: &Path,
    vars: Vec<(String, String)>,
) -> anyhow::Result<()> {
    info!("Starting validation");

    let definition = TaskDefinition::from_file(path)?;
    let ctx = local_context(settings, "validate", vars, Arc::new(InMemoryMetricSink::new()));

    match definition.validate(&ctx) {
        Ok(()) => {
            println!("✅ {} is a valid {} task", path.display(), definition.kind());
            Ok(())
        }
        Err(e) => {
            println!("❌ {}", path.display());
            println!("   {}", e);
            Err(e.into())
        }
    }
}
