//! Error types for the gemini_tasks workspace.
//!
//! Every error records the source location where it was created. Domain
//! errors convert into [`GeminiTasksError`] through a blanket `From`, so task
//! code can use `?` across crate boundaries.

mod config;
mod error;
mod gemini;
mod render;
mod storage;
mod validation;
mod video;

pub use config::{ConfigError, ConfigErrorKind};
pub use error::{GeminiTasksError, GeminiTasksErrorKind, GeminiTasksResult};
pub use gemini::{GeminiError, GeminiErrorKind};
pub use render::{RenderError, RenderErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
pub use video::{VideoGenerationError, VideoGenerationErrorKind};
