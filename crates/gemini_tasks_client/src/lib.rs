//! Gemini API and Vertex AI access for gemini_tasks.
//!
//! [`GeminiApi`] is the seam the tasks call through. [`GeminiClient`] is the
//! reqwest implementation; tests substitute scripted implementations.

#![warn(missing_docs)]

mod api;
mod chat;
mod client;
mod dto;
mod video;

pub use api::{Backend, ClientFactory, ClientSettings, GeminiApi, HttpClientFactory};
pub use chat::ChatSession;
pub use client::GeminiClient;
pub use dto::{
    Blob, Candidate, Content, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, Part,
};
pub use video::{
    GenerateVideosConfig, GenerateVideosResponse, GenerateVideosSource, GeneratedVideo, Video,
    VideoOperation,
};
