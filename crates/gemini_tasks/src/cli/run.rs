//! Run command handler.

use crate::{FileStorage, LocalRunContext, Settings, TaskDefinition};
use gemini_tasks_client::HttpClientFactory;
use gemini_tasks_interface::MetricSink;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// Builds a local run context from settings and `NAME=VALUE` variables.
///
/// Values that parse as JSON are stored as JSON, so `--var 'inputs={"n": 2}'`
/// can be read as `{{ inputs.n }}`. Anything else is kept as a string.
pub fn local_context(
    settings: &Settings,
    task_id: &str,
    vars: Vec<(String, String)>,
    metrics: Arc<dyn MetricSink>,
) -> LocalRunContext {
    let storage = Arc::new(FileStorage::new(settings.storage_dir().clone()));
    vars.into_iter().fold(
        LocalRunContext::new(task_id, storage, metrics),
        |ctx, (name, value)| {
            let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            ctx.with_variable(name, value)
        },
    )
}

#[cfg(feature = "metrics")]
fn metric_sink() -> Arc<dyn MetricSink> {
    Arc::new(crate::OtelMetricSink::new("gemini_tasks"))
}

#[cfg(not(feature = "metrics"))]
fn metric_sink() -> Arc<dyn MetricSink> {
    Arc::new(crate::InMemoryMetricSink::new())
}

/// Handles the run command.
#[instrument(skip(settings, vars), fields(path = %path.display()))]
pub async fn handle_run_command(
    settings: &Settings,
    path: &Path,
    vars: Vec<(String, String)>,
    task_id: &str,
) -> anyhow::Result<()> {
    let definition = TaskDefinition::from_file(path)?;
    let ctx = local_context(settings, task_id, vars, metric_sink());

    let clients = match settings.base_url() {
        Some(base_url) => HttpClientFactory::with_base_url(base_url.clone()),
        None => HttpClientFactory::new(),
    };

    info!(kind = definition.kind(), "Running task");
    let output = definition.run(&ctx, &clients).await?;
    info!(final_state = %output.final_state(), "Task finished");

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
