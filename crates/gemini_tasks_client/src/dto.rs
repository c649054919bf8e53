//! Data transfer objects for `generateContent`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use derive_getters::Getters;
use gemini_tasks_core::{
    CitationMetadata, FinishReason, Prediction, SafetyRating, UsageMetadata,
};
use gemini_tasks_error::{GeminiError, GeminiErrorKind};
use serde::{Deserialize, Serialize};

/// A turn of content: a role plus ordered parts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// `user` or `model`; absent for system instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Ordered parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Creates content with a role and parts.
    pub fn new(role: impl Into<String>, parts: Vec<Part>) -> Self {
        Self {
            role: Some(role.into()),
            parts,
        }
    }

    /// Creates a single text part user turn.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new("user", vec![Part::text(text)])
    }

    /// Creates a single text part model turn.
    pub fn model_text(text: impl Into<String>) -> Self {
        Self::new("model", vec![Part::text(text)])
    }

    /// Creates a role-less text content, as used for system instructions.
    pub fn instruction(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenated text of all text parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

/// One part of a content turn.
///
/// Parts of kinds this crate does not model (function calls, executable code)
/// deserialize with every field absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline binary payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
    /// Marks a part as model reasoning rather than answer text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    /// Creates a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Creates an inline part from raw bytes.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            inline_data: Some(Blob {
                mime_type: mime_type.into(),
                data: STANDARD.encode(bytes),
            }),
            ..Self::default()
        }
    }
}

/// Base64 inline payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// MIME type of the payload
    pub mime_type: String,
    /// Base64 encoded bytes
    pub data: String,
}

impl Blob {
    /// Decodes the payload.
    pub fn decode(&self) -> Result<Vec<u8>, GeminiError> {
        STANDARD.decode(&self.data).map_err(|e| {
            GeminiError::new(GeminiErrorKind::ResponseParsing(format!(
                "Invalid base64 in inline data: {}",
                e
            )))
        })
    }
}

/// Generation settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, derive_setters::Setters)]
#[serde(rename_all = "camelCase")]
#[setters(prefix = "with_", strip_option, into)]
pub struct GenerationConfig {
    /// MIME type of the response, e.g. `application/json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// Schema the response must follow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

/// `generateContent` request body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, derive_setters::Setters)]
#[serde(rename_all = "camelCase")]
#[setters(prefix = "with_", strip_option, into)]
pub struct GenerateContentRequest {
    /// Conversation turns
    #[setters(skip)]
    pub contents: Vec<Content>,
    /// System instruction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    /// Generation settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Creates a request for the given turns.
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            ..Self::default()
        }
    }
}

/// One generated candidate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content
    #[serde(default)]
    content: Option<Content>,
    /// Why generation stopped
    #[serde(default)]
    finish_reason: Option<FinishReason>,
    /// Safety ratings
    #[serde(default)]
    safety_ratings: Option<Vec<SafetyRating>>,
    /// Citations
    #[serde(default)]
    citation_metadata: Option<CitationMetadata>,
    /// Candidate index
    #[serde(default)]
    index: Option<u32>,
}

impl Candidate {
    /// Creates a candidate.
    pub fn new(content: Option<Content>, finish_reason: Option<FinishReason>) -> Self {
        Self {
            content,
            finish_reason,
            ..Self::default()
        }
    }

    /// Adds safety ratings.
    pub fn with_safety_ratings(mut self, ratings: Vec<SafetyRating>) -> Self {
        self.safety_ratings = Some(ratings);
        self
    }

    /// Adds citation metadata.
    pub fn with_citation_metadata(mut self, metadata: CitationMetadata) -> Self {
        self.citation_metadata = Some(metadata);
        self
    }

    /// Text of the candidate, empty when it carried no content.
    pub fn text(&self) -> String {
        self.content.as_ref().map(Content::text).unwrap_or_default()
    }

    /// Output record for this candidate.
    pub fn to_prediction(&self) -> Prediction {
        Prediction::new(
            self.safety_ratings.clone(),
            self.citation_metadata.clone(),
            self.text(),
        )
    }
}

/// `generateContent` response body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidates, absent when the prompt itself was blocked
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
    /// Token usage
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    /// Model version that served the request
    #[serde(default)]
    model_version: Option<String>,
}

impl GenerateContentResponse {
    /// Creates a response.
    pub fn new(candidates: Vec<Candidate>, usage_metadata: Option<UsageMetadata>) -> Self {
        Self {
            candidates: Some(candidates),
            usage_metadata,
            model_version: None,
        }
    }

    /// Candidates, empty when absent.
    pub fn candidate_list(&self) -> &[Candidate] {
        self.candidates.as_deref().unwrap_or_default()
    }

    /// First candidate, if any.
    pub fn first_candidate(&self) -> Option<&Candidate> {
        self.candidate_list().first()
    }

    /// Finish reason of the first candidate.
    pub fn finish_reason(&self) -> FinishReason {
        self.first_candidate()
            .and_then(|candidate| candidate.finish_reason.clone())
            .unwrap_or_default()
    }

    /// Parts of the first candidate, empty when absent.
    pub fn parts(&self) -> &[Part] {
        self.first_candidate()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or_default()
    }

    /// Answer text of the first candidate, skipping reasoning parts.
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .parts()
            .iter()
            .filter(|part| part.thought != Some(true))
            .filter_map(|part| part.text.as_deref())
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

/// Error envelope returned by both backends.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

/// Error details.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}
