//! Test utilities for gemini_tasks tests.
//!
//! This module provides the scripted client and run-context helpers.

#![allow(dead_code)]

pub mod mock_gemini;

#[allow(unused_imports)]
pub use mock_gemini::{MockClient, MockFactory, MockGemini, pending};

use gemini_tasks::{InMemoryMetricSink, LocalRunContext, MemoryStorage};
use gemini_tasks_client::{Candidate, Content, GenerateContentResponse, Part, VideoOperation};
use gemini_tasks_core::{FinishReason, UsageMetadata};
use serde_json::json;
use std::sync::Arc;

/// Run context plus handles on its collaborators.
pub struct TestContext {
    pub ctx: LocalRunContext,
    pub storage: Arc<MemoryStorage>,
    pub metrics: Arc<InMemoryMetricSink>,
}

/// Context with in-memory storage and a recording metric sink.
pub fn test_context() -> TestContext {
    let storage = Arc::new(MemoryStorage::new());
    let metrics = Arc::new(InMemoryMetricSink::new());
    let ctx = LocalRunContext::new("test-task", storage.clone(), metrics.clone());
    TestContext {
        ctx,
        storage,
        metrics,
    }
}

pub fn usage(prompt: u64, candidates: u64, total: u64) -> UsageMetadata {
    UsageMetadata {
        prompt_token_count: Some(prompt),
        candidates_token_count: Some(candidates),
        total_token_count: Some(total),
    }
}

/// One-candidate response finished with `STOP`.
pub fn text_response(text: &str, usage: UsageMetadata) -> GenerateContentResponse {
    GenerateContentResponse::new(
        vec![Candidate::new(
            Some(Content::model_text(text)),
            Some(FinishReason::Stop),
        )],
        Some(usage),
    )
}

/// Response with the given parts and finish reason.
pub fn parts_response(
    parts: Vec<Part>,
    finish_reason: FinishReason,
    usage: UsageMetadata,
) -> GenerateContentResponse {
    GenerateContentResponse::new(
        vec![Candidate::new(
            Some(Content::new("model", parts)),
            Some(finish_reason),
        )],
        Some(usage),
    )
}

/// Finished Gemini API operation with one video.
pub fn finished(name: &str, uri: &str) -> VideoOperation {
    let operation = json!({
        "name": name,
        "done": true,
        "response": {
            "generatedVideos": [{"video": {"uri": uri, "mimeType": "video/mp4"}}]
        }
    });
    serde_json::from_value(operation).unwrap()
}
