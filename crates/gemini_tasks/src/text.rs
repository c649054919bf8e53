//! Single prompt text completion.

use crate::{RunnableTask, TaskBase, predictions, send_metrics};
use async_trait::async_trait;
use derive_getters::Getters;
use gemini_tasks_client::{ClientFactory, Content, GeminiApi, GenerateContentRequest};
use gemini_tasks_core::Prediction;
use gemini_tasks_error::GeminiTasksResult;
use gemini_tasks_interface::{Property, RunContext};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Sends one prompt and returns a prediction per candidate.
///
/// # Examples
///
/// ```
/// use gemini_tasks::{TaskBase, TextCompletion};
///
/// let task = TextCompletion::builder()
///     .base(TaskBase::new("api-key", "gemini-2.5-flash"))
///     .prompt("What is the capital of France?")
///     .build()
///     .unwrap();
/// assert!(!task.prompt().is_unset());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct TextCompletion {
    /// API key and model
    #[serde(flatten)]
    base: TaskBase,
    /// Prompt text
    prompt: Property<String>,
}

/// Output of [`TextCompletion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct TextCompletionOutput {
    /// One prediction per candidate
    predictions: Vec<Prediction>,
}

impl TextCompletion {
    /// Starts a builder.
    pub fn builder() -> TextCompletionBuilder {
        TextCompletionBuilder::default()
    }
}

#[async_trait]
impl RunnableTask for TextCompletion {
    type Output = TextCompletionOutput;

    fn validate(&self, ctx: &dyn RunContext) -> GeminiTasksResult<()> {
        self.base.render(ctx)?;
        self.prompt.render_required("prompt", ctx)?;
        Ok(())
    }

    #[instrument(skip_all, fields(task_id = %ctx.task_id()))]
    async fn run<F>(&self, ctx: &dyn RunContext, clients: &F) -> GeminiTasksResult<Self::Output>
    where
        F: ClientFactory,
    {
        let base = self.base.render(ctx)?;
        let prompt = self.prompt.render_required("prompt", ctx)?;
        let client = base.client(clients)?;

        info!(model = %base.model, "Running text completion");
        let request = GenerateContentRequest::new(vec![Content::user_text(prompt)]);
        let response = client.generate_content(&base.model, &request).await?;

        send_metrics(ctx, [&response]);

        let predictions = predictions(&response);
        info!(predictions = predictions.len(), "Text completion finished");
        Ok(TextCompletionOutput { predictions })
    }
}
