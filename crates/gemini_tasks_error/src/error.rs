//! Crate-level error wrapper.

use crate::{
    ConfigError, GeminiError, RenderError, StorageError, ValidationError, VideoGenerationError,
};

/// Crate-level error variants.
#[derive(Debug, derive_more::From)]
pub enum GeminiTasksErrorKind {
    /// Gemini API error
    Gemini(GeminiError),
    /// Task input rejected before any network call
    Validation(ValidationError),
    /// Property could not be rendered
    Render(RenderError),
    /// Storage collaborator error
    Storage(StorageError),
    /// Configuration error
    Config(ConfigError),
    /// Long-running video operation failed
    Video(VideoGenerationError),
}

impl std::fmt::Display for GeminiTasksErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeminiTasksErrorKind::Gemini(e) => write!(f, "{}", e),
            GeminiTasksErrorKind::Validation(e) => write!(f, "{}", e),
            GeminiTasksErrorKind::Render(e) => write!(f, "{}", e),
            GeminiTasksErrorKind::Storage(e) => write!(f, "{}", e),
            GeminiTasksErrorKind::Config(e) => write!(f, "{}", e),
            GeminiTasksErrorKind::Video(e) => write!(f, "{}", e),
        }
    }
}

/// Task error with kind discrimination.
///
/// # Examples
///
/// ```
/// use gemini_tasks_error::{GeminiTasksError, GeminiTasksErrorKind, ValidationError, ValidationErrorKind};
///
/// let err: GeminiTasksError = ValidationError::new(ValidationErrorKind::MissingOutputGcsUri).into();
/// assert!(matches!(err.kind(), GeminiTasksErrorKind::Validation(_)));
/// assert!(err.to_string().contains("outputGcsUri is required"));
/// ```
#[derive(Debug)]
pub struct GeminiTasksError(Box<GeminiTasksErrorKind>);

impl GeminiTasksError {
    /// Create a new error from a kind.
    pub fn new(kind: GeminiTasksErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GeminiTasksErrorKind {
        &self.0
    }

    /// True when the failure happened before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(*self.0, GeminiTasksErrorKind::Validation(_))
    }
}

impl std::fmt::Display for GeminiTasksError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gemini Tasks Error: {}", self.0)
    }
}

impl std::error::Error for GeminiTasksError {}

impl<T> From<T> for GeminiTasksError
where
    T: Into<GeminiTasksErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for task operations.
pub type GeminiTasksResult<T> = std::result::Result<T, GeminiTasksError>;
