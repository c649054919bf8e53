//! Completion over mixed text and media inputs.

use crate::{RunnableTask, TaskBase, send_metrics};
use async_trait::async_trait;
use derive_getters::Getters;
use gemini_tasks_client::{ClientFactory, Content, GeminiApi, GenerateContentRequest, Part};
use gemini_tasks_core::{ContentItem, FinishReason, GeneratedImage, SafetyRating, TaskState};
use gemini_tasks_error::{GeminiTasksResult, ValidationError, ValidationErrorKind};
use gemini_tasks_interface::{Property, RunContext};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use tracing::{debug, info, instrument, warn};

/// Sends text and media items and describes the answer.
///
/// Items with a MIME type hold a storage URI; the bytes are fetched and sent
/// inline. A response blocked for safety or recitation reasons is reported
/// through [`MultimodalCompletionOutput::blocked`], not as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct MultimodalCompletion {
    /// API key and model
    #[serde(flatten)]
    base: TaskBase,
    /// Content items, in order
    contents: Property<Vec<ContentItem>>,
}

/// Output of [`MultimodalCompletion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct MultimodalCompletionOutput {
    /// Answer text, absent when blocked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    /// Safety ratings of the first candidate
    #[serde(default)]
    safety_ratings: Vec<SafetyRating>,
    /// Whether the answer was withheld
    #[serde(default)]
    blocked: bool,
    /// Finish reason of the first candidate
    finish_reason: FinishReason,
    /// Images generated by the model, written to storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    images: Option<Vec<GeneratedImage>>,
}

impl MultimodalCompletionOutput {
    /// `Warning` when the answer was blocked.
    pub fn final_state(&self) -> TaskState {
        if self.blocked {
            TaskState::Warning
        } else {
            TaskState::Success
        }
    }
}

impl MultimodalCompletion {
    /// Starts a builder.
    pub fn builder() -> MultimodalCompletionBuilder {
        MultimodalCompletionBuilder::default()
    }

    fn render_contents(&self, ctx: &dyn RunContext) -> GeminiTasksResult<Vec<ContentItem>> {
        let contents = self.contents.render_required("contents", ctx)?;
        if contents.is_empty() {
            return Err(
                ValidationError::new(ValidationErrorKind::EmptyList("contents".to_string())).into(),
            );
        }
        Ok(contents)
    }
}

/// Builds one API turn from a content item, fetching media from storage.
async fn to_content(ctx: &dyn RunContext, item: &ContentItem) -> GeminiTasksResult<Content> {
    let part = match item.mime_type() {
        None => Part::text(item.content()),
        Some(mime_type) => {
            let bytes = ctx.storage().get(item.content()).await?;
            debug!(uri = %item.content(), mime_type = %mime_type, bytes = bytes.len(), "Loaded media");
            Part::from_bytes(&bytes, mime_type)
        }
    };
    Ok(Content::new(item.role(), vec![part]))
}

/// Storage directory for one run's generated images: `{task_id}/{uuid}`.
fn run_prefix(task_id: &str) -> String {
    let task: String = task_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let task = if task.is_empty() { "task".to_string() } else { task };
    format!("{}/{}", task, Uuid::new_v4())
}

/// File extension for a generated image MIME type.
fn extension(mime_type: &str) -> &str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        other => other
            .split_once('/')
            .map(|(_, subtype)| subtype)
            .filter(|subtype| !subtype.is_empty())
            .unwrap_or("bin"),
    }
}

#[async_trait]
impl RunnableTask for MultimodalCompletion {
    type Output = MultimodalCompletionOutput;

    fn validate(&self, ctx: &dyn RunContext) -> GeminiTasksResult<()> {
        self.base.render(ctx)?;
        self.render_contents(ctx)?;
        Ok(())
    }

    #[instrument(skip_all, fields(task_id = %ctx.task_id()))]
    async fn run<F>(&self, ctx: &dyn RunContext, clients: &F) -> GeminiTasksResult<Self::Output>
    where
        F: ClientFactory,
    {
        let base = self.base.render(ctx)?;
        let items = self.render_contents(ctx)?;
        let client = base.client(clients)?;

        let mut contents = Vec::with_capacity(items.len());
        for item in &items {
            contents.push(to_content(ctx, item).await?);
        }

        info!(model = %base.model, items = contents.len(), "Running multimodal completion");
        let request = GenerateContentRequest::new(contents);
        let response = client.generate_content(&base.model, &request).await?;

        send_metrics(ctx, [&response]);

        let finish_reason = response.finish_reason();
        let safety_ratings = response
            .first_candidate()
            .and_then(|candidate| candidate.safety_ratings().clone())
            .unwrap_or_default();

        if finish_reason.is_blocked() {
            match finish_reason {
                FinishReason::Recitation => {
                    warn!("Content response has been blocked for recitation reason")
                }
                _ => warn!("Content response has been blocked for safety reason"),
            }
            return Ok(MultimodalCompletionOutput {
                text: None,
                safety_ratings,
                blocked: true,
                finish_reason,
                images: None,
            });
        }

        let prefix = run_prefix(ctx.task_id());
        let mut images = Vec::new();
        for part in response.parts() {
            if let Some(blob) = &part.inline_data {
                let name = format!(
                    "{}/generated-image-{}.{}",
                    prefix,
                    images.len(),
                    extension(&blob.mime_type)
                );
                let uri = ctx.storage().put(&name, blob.decode()?).await?;
                debug!(uri = %uri, mime_type = %blob.mime_type, "Stored generated image");
                images.push(GeneratedImage::new(uri, blob.mime_type.clone()));
            }
        }

        info!(
            finish_reason = %finish_reason,
            images = images.len(),
            "Multimodal completion finished"
        );
        Ok(MultimodalCompletionOutput {
            text: response.text(),
            safety_ratings,
            blocked: false,
            finish_reason,
            images: if images.is_empty() { None } else { Some(images) },
        })
    }
}
