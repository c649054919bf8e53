//! Chat message types.

use serde::{Deserialize, Serialize};

/// Who authored a chat message.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum ChatMessageType {
    /// Instruction that frames the whole conversation
    System,
    /// Earlier answer from the model
    Ai,
    /// Turn sent by the user
    User,
}

/// A typed chat message.
///
/// # Examples
///
/// ```
/// use gemini_tasks_core::{ChatMessage, ChatMessageType};
///
/// let message = ChatMessage::user("What is the capital of Japan?");
/// assert_eq!(*message.message_type(), ChatMessageType::User);
///
/// let parsed: ChatMessage =
///     serde_json::from_str(r#"{"type": "SYSTEM", "content": "Answer in one word."}"#).unwrap();
/// assert_eq!(*parsed.message_type(), ChatMessageType::System);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ChatMessage {
    /// Author of the message
    #[serde(rename = "type")]
    message_type: ChatMessageType,
    /// Message text
    content: String,
}

impl ChatMessage {
    /// Creates a message of the given type.
    pub fn new(message_type: ChatMessageType, content: impl Into<String>) -> Self {
        Self {
            message_type,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatMessageType::User, content)
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatMessageType::System, content)
    }

    /// Creates a model message.
    pub fn ai(content: impl Into<String>) -> Self {
        Self::new(ChatMessageType::Ai, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_parses_case_insensitively() {
        assert_eq!("ai".parse::<ChatMessageType>().unwrap(), ChatMessageType::Ai);
        assert_eq!(ChatMessageType::User.to_string(), "USER");
    }
}
