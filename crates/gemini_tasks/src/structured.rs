//! JSON structured output completion.

use crate::{RunnableTask, TaskBase, send_metrics};
use async_trait::async_trait;
use derive_getters::Getters;
use gemini_tasks_client::{
    ClientFactory, Content, GeminiApi, GenerateContentRequest, GenerationConfig,
};
use gemini_tasks_error::{GeminiTasksResult, ValidationError, ValidationErrorKind};
use gemini_tasks_interface::{Property, RunContext};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

const JSON_MIME_TYPE: &str = "application/json";

/// Asks for a JSON answer constrained by a response schema.
///
/// The schema may be given as a JSON string or inline as a mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct StructuredOutputCompletion {
    /// API key and model
    #[serde(flatten)]
    base: TaskBase,
    /// Prompt text
    prompt: Property<String>,
    /// OpenAPI subset schema the answer must follow
    json_response_schema: Property<Value>,
}

/// Output of [`StructuredOutputCompletion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct StructuredOutputCompletionOutput {
    /// Text of every text part of the first candidate
    predictions: Vec<String>,
}

impl StructuredOutputCompletion {
    /// Starts a builder.
    pub fn builder() -> StructuredOutputCompletionBuilder {
        StructuredOutputCompletionBuilder::default()
    }

    fn render_schema(&self, ctx: &dyn RunContext) -> GeminiTasksResult<Value> {
        let schema = self
            .json_response_schema
            .render_required("jsonResponseSchema", ctx)?;
        match schema {
            Value::String(text) => serde_json::from_str(&text).map_err(|e| {
                ValidationError::new(ValidationErrorKind::InvalidJsonSchema(e.to_string())).into()
            }),
            Value::Object(_) => Ok(schema),
            other => Err(ValidationError::new(ValidationErrorKind::InvalidJsonSchema(format!(
                "expected a JSON object, got {}",
                other
            )))
            .into()),
        }
    }
}

#[async_trait]
impl RunnableTask for StructuredOutputCompletion {
    type Output = StructuredOutputCompletionOutput;

    fn validate(&self, ctx: &dyn RunContext) -> GeminiTasksResult<()> {
        self.base.render(ctx)?;
        self.prompt.render_required("prompt", ctx)?;
        self.render_schema(ctx)?;
        Ok(())
    }

    #[instrument(skip_all, fields(task_id = %ctx.task_id()))]
    async fn run<F>(&self, ctx: &dyn RunContext, clients: &F) -> GeminiTasksResult<Self::Output>
    where
        F: ClientFactory,
    {
        let base = self.base.render(ctx)?;
        let prompt = self.prompt.render_required("prompt", ctx)?;
        let schema = self.render_schema(ctx)?;
        let client = base.client(clients)?;

        info!(model = %base.model, "Running structured output completion");
        let request = GenerateContentRequest::new(vec![Content::user_text(prompt)])
            .with_generation_config(
                GenerationConfig::default()
                    .with_response_mime_type(JSON_MIME_TYPE)
                    .with_response_schema(schema),
            );
        let response = client.generate_content(&base.model, &request).await?;

        send_metrics(ctx, [&response]);

        let predictions: Vec<String> = response
            .parts()
            .iter()
            .filter_map(|part| part.text.clone())
            .collect();
        info!(predictions = predictions.len(), "Structured output completion finished");
        Ok(StructuredOutputCompletionOutput { predictions })
    }
}
