use crate::{Content, GeminiApi, GenerateContentRequest, GenerateContentResponse};
use gemini_tasks_error::GeminiError;
use tracing::{debug, instrument};

/// Multi-turn conversation against one model.
///
/// Each sent message carries the full history. Model replies are appended
/// so the next message sees them.
pub struct ChatSession<'a, A: GeminiApi + ?Sized> {
    api: &'a A,
    model: String,
    system_instruction: Option<Content>,
    history: Vec<Content>,
}

impl<'a, A: GeminiApi + ?Sized> ChatSession<'a, A> {
    /// Starts an empty conversation.
    pub fn new(api: &'a A, model: impl Into<String>) -> Self {
        Self {
            api,
            model: model.into(),
            system_instruction: None,
            history: Vec::new(),
        }
    }

    /// Sets the system instruction sent with every message.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(Content::instruction(instruction));
        self
    }

    /// Seeds a prior turn without calling the model.
    pub fn push_history(&mut self, content: Content) {
        self.history.push(content);
    }

    /// Turns exchanged so far.
    pub fn history(&self) -> &[Content] {
        &self.history
    }

    /// Sends a user message and records the reply.
    #[instrument(skip(self, text), fields(model = %self.model, turns = self.history.len()))]
    pub async fn send_message(
        &mut self,
        text: impl Into<String> + Send,
    ) -> Result<GenerateContentResponse, GeminiError> {
        self.history.push(Content::user_text(text));

        let mut request = GenerateContentRequest::new(self.history.clone());
        if let Some(instruction) = &self.system_instruction {
            request = request.with_system_instruction(instruction.clone());
        }

        let response = self.api.generate_content(&self.model, &request).await?;

        if let Some(content) = response
            .first_candidate()
            .and_then(|candidate| candidate.content().clone())
        {
            self.history.push(Content {
                role: Some("model".to_string()),
                parts: content.parts,
            });
        }
        debug!(turns = self.history.len(), "Chat message answered");

        Ok(response)
    }
}
