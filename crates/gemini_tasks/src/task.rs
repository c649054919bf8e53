//! Shared task plumbing: the runnable trait, common properties and metrics.

use async_trait::async_trait;
use derive_getters::Getters;
use gemini_tasks_client::{ClientFactory, ClientSettings, GenerateContentResponse};
use gemini_tasks_core::{Prediction, TokenUsageData};
use gemini_tasks_error::GeminiTasksResult;
use gemini_tasks_interface::{Property, RunContext};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A unit of work the orchestrator can execute.
#[async_trait]
pub trait RunnableTask: Send + Sync {
    /// Output record handed back after a successful run.
    type Output: Serialize + Send;

    /// Render every property and check the inputs without calling the API.
    fn validate(&self, ctx: &dyn RunContext) -> GeminiTasksResult<()>;

    /// Run the task.
    async fn run<F>(&self, ctx: &dyn RunContext, clients: &F) -> GeminiTasksResult<Self::Output>
    where
        F: ClientFactory;
}

/// Properties every task carries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct TaskBase {
    /// Gemini API key
    api_key: Property<String>,
    /// Model name, e.g. `gemini-2.5-flash`
    model: Property<String>,
}

impl TaskBase {
    /// Creates the common properties.
    pub fn new(api_key: impl Into<Property<String>>, model: impl Into<Property<String>>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Renders the API key and model.
    pub fn render(&self, ctx: &dyn RunContext) -> GeminiTasksResult<RenderedBase> {
        Ok(RenderedBase {
            api_key: self.api_key.render_required("apiKey", ctx)?,
            model: self.model.render_required("model", ctx)?,
        })
    }
}

/// Rendered common properties.
#[derive(Clone, PartialEq, Eq)]
pub struct RenderedBase {
    /// Gemini API key
    pub api_key: String,
    /// Model name
    pub model: String,
}

impl std::fmt::Debug for RenderedBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedBase")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

impl RenderedBase {
    /// Builds a Gemini API client keyed by the rendered API key.
    pub fn client<F: ClientFactory>(&self, clients: &F) -> GeminiTasksResult<F::Client> {
        Ok(clients.create(ClientSettings::gemini(self.api_key.clone()))?)
    }
}

/// Emits the three token counters, each summed over all responses.
pub fn send_metrics<'a>(
    ctx: &dyn RunContext,
    responses: impl IntoIterator<Item = &'a GenerateContentResponse>,
) {
    let usages: Vec<_> = responses
        .into_iter()
        .filter_map(|response| *response.usage_metadata())
        .collect();
    let usage = TokenUsageData::sum(&usages);
    debug!(
        prompt = usage.prompt_tokens(),
        candidates = usage.candidate_tokens(),
        total = usage.total_tokens(),
        "Token usage"
    );
    for counter in usage.counters() {
        ctx.metric(counter);
    }
}

/// One prediction per candidate of a response.
pub fn predictions(response: &GenerateContentResponse) -> Vec<Prediction> {
    response
        .candidate_list()
        .iter()
        .map(|candidate| candidate.to_prediction())
        .collect()
}
