//! Multi-turn chat completion.

use crate::{RunnableTask, TaskBase, predictions, send_metrics};
use async_trait::async_trait;
use derive_getters::Getters;
use gemini_tasks_client::{ChatSession, ClientFactory, Content};
use gemini_tasks_core::{ChatMessage, ChatMessageType, Prediction};
use gemini_tasks_error::{GeminiTasksResult, ValidationError, ValidationErrorKind};
use gemini_tasks_interface::{Property, RunContext};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Replays a conversation and answers every user message.
///
/// System messages become the system instruction, AI messages are seeded
/// as earlier model turns, and each user message is sent with the history
/// accumulated so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct ChatCompletion {
    /// API key and model
    #[serde(flatten)]
    base: TaskBase,
    /// Conversation, in order
    messages: Property<Vec<ChatMessage>>,
}

/// Output of [`ChatCompletion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct ChatCompletionOutput {
    /// Predictions of every response, in order
    predictions: Vec<Prediction>,
}

impl ChatCompletion {
    /// Starts a builder.
    pub fn builder() -> ChatCompletionBuilder {
        ChatCompletionBuilder::default()
    }

    fn render_messages(&self, ctx: &dyn RunContext) -> GeminiTasksResult<Vec<ChatMessage>> {
        let messages = self.messages.render_required("messages", ctx)?;
        if messages.is_empty() {
            return Err(
                ValidationError::new(ValidationErrorKind::EmptyList("messages".to_string())).into(),
            );
        }
        if !messages
            .iter()
            .any(|message| *message.message_type() == ChatMessageType::User)
        {
            return Err(ValidationError::new(ValidationErrorKind::NoUserMessage).into());
        }
        Ok(messages)
    }
}

fn system_instruction(messages: &[ChatMessage]) -> Option<String> {
    let system: Vec<&str> = messages
        .iter()
        .filter(|message| *message.message_type() == ChatMessageType::System)
        .map(|message| message.content().as_str())
        .collect();
    if system.is_empty() {
        None
    } else {
        Some(system.join("\n"))
    }
}

#[async_trait]
impl RunnableTask for ChatCompletion {
    type Output = ChatCompletionOutput;

    fn validate(&self, ctx: &dyn RunContext) -> GeminiTasksResult<()> {
        self.base.render(ctx)?;
        self.render_messages(ctx)?;
        Ok(())
    }

    #[instrument(skip_all, fields(task_id = %ctx.task_id()))]
    async fn run<F>(&self, ctx: &dyn RunContext, clients: &F) -> GeminiTasksResult<Self::Output>
    where
        F: ClientFactory,
    {
        let base = self.base.render(ctx)?;
        let messages = self.render_messages(ctx)?;
        let client = base.client(clients)?;

        info!(model = %base.model, messages = messages.len(), "Running chat completion");

        let mut chat = ChatSession::new(&client, base.model.as_str());
        if let Some(instruction) = system_instruction(&messages) {
            chat = chat.with_system_instruction(instruction);
        }

        let mut responses = Vec::new();
        for message in &messages {
            match message.message_type() {
                ChatMessageType::System => {}
                ChatMessageType::Ai => chat.push_history(Content::model_text(message.content())),
                ChatMessageType::User => {
                    debug!(turn = responses.len(), "Sending user message");
                    responses.push(chat.send_message(message.content().clone()).await?);
                }
            }
        }

        send_metrics(ctx, &responses);

        let predictions: Vec<Prediction> = responses.iter().flat_map(predictions).collect();
        info!(
            responses = responses.len(),
            predictions = predictions.len(),
            "Chat completion finished"
        );
        Ok(ChatCompletionOutput { predictions })
    }
}
