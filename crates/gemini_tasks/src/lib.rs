//! Gemini workflow tasks.
//!
//! Five tasks wrap the Gemini API: [`TextCompletion`], [`ChatCompletion`],
//! [`StructuredOutputCompletion`], [`MultimodalCompletion`] and
//! [`VideoGeneration`]. Each renders its properties through a
//! [`RunContext`](gemini_tasks_interface::RunContext), calls the API through a
//! [`ClientFactory`](gemini_tasks_client::ClientFactory), emits token usage
//! counters and returns an output record.
//!
//! # Example
//!
//! ```no_run
//! use gemini_tasks::{
//!     InMemoryMetricSink, LocalRunContext, MemoryStorage, RunnableTask, TaskBase, TextCompletion,
//! };
//! use gemini_tasks_client::HttpClientFactory;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = LocalRunContext::new(
//!     "example",
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(InMemoryMetricSink::new()),
//! );
//! let task = TextCompletion::builder()
//!     .base(TaskBase::new("{{ env.GEMINI_API_KEY }}", "gemini-2.5-flash"))
//!     .prompt("Name three moons of Jupiter.")
//!     .build()?;
//!
//! let output = task.run(&ctx, &HttpClientFactory::new()).await?;
//! println!("{}", output.predictions()[0].content());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chat;
mod definition;
mod multimodal;
mod runtime;
mod structured;
mod task;
mod text;
mod video;

pub mod cli;

pub use chat::{ChatCompletion, ChatCompletionBuilder, ChatCompletionOutput};
pub use definition::{DefinitionFormat, TaskDefinition, TaskOutput};
pub use multimodal::{MultimodalCompletion, MultimodalCompletionBuilder, MultimodalCompletionOutput};
pub use runtime::{
    DEFAULT_SETTINGS_FILE, ENV_PREFIX, FileStorage, InMemoryMetricSink, LocalRunContext, LogFormat,
    MemoryStorage, Settings, init_observability, init_tracing, shutdown_observability,
};
#[cfg(feature = "metrics")]
pub use runtime::OtelMetricSink;
pub use structured::{
    StructuredOutputCompletion, StructuredOutputCompletionBuilder,
    StructuredOutputCompletionOutput,
};
pub use task::{RenderedBase, RunnableTask, TaskBase, predictions, send_metrics};
pub use text::{TextCompletion, TextCompletionBuilder, TextCompletionOutput};
pub use video::{
    DEFAULT_DURATION_SECONDS, DEFAULT_TIMEOUT, MAX_DURATION_SECONDS, MIN_DURATION_SECONDS,
    POLL_INTERVAL, VideoGeneration, VideoGenerationBuilder, VideoGenerationOutput,
};
