//! Core data types for the gemini_tasks workflow task package.
//!
//! These types are the output records handed back to the orchestrator. They
//! mirror the Gemini response fields one to one and default to absent or
//! empty when the API omits a field.

mod finish_reason;
mod media;
mod message;
mod metric;
mod prediction;
mod safety;
mod state;
mod token_usage;

pub use finish_reason::FinishReason;
pub use media::{ContentItem, ContentItemBuilder, GeneratedImage};
pub use message::{ChatMessage, ChatMessageType};
pub use metric::{Counter, CANDIDATE_TOKEN_COUNT, PROMPT_TOKEN_COUNT, TOTAL_TOKEN_COUNT};
pub use prediction::Prediction;
pub use safety::{CitationMetadata, CitationSource, SafetyRating};
pub use state::TaskState;
pub use token_usage::{TokenUsageData, UsageMetadata};
