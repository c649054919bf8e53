//! Input validation error types.
//!
//! Validation failures are raised before any network call is made.

/// Kinds of task input validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Video duration outside the accepted range
    #[display("Duration must be between {} and {} seconds", min, max)]
    DurationOutOfRange {
        /// Smallest accepted duration
        min: i64,
        /// Largest accepted duration
        max: i64,
        /// Rejected value
        actual: i64,
    },
    /// Vertex AI routing without a destination bucket
    #[display("outputGcsUri is required when using Vertex AI.")]
    MissingOutputGcsUri,
    /// Gemini API routing without a local destination
    #[display("downloadFilePath is required when not using Vertex AI.")]
    MissingDownloadFilePath,
    /// JSON response schema is not valid JSON
    #[display("Failed to deserialize the JSON string. {}", _0)]
    InvalidJsonSchema(String),
    /// A list that must not be empty was empty
    #[display("{} must not be empty", _0)]
    EmptyList(String),
    /// Chat conversation without any user turn
    #[display("At least one USER message is required")]
    NoUserMessage,
    /// Vertex AI routing without project or location
    #[display("{} is required when using Vertex AI.", _0)]
    MissingVertexSetting(String),
}

/// Validation error with location tracking.
///
/// # Examples
///
/// ```
/// use gemini_tasks_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::DurationOutOfRange {
///     min: 1,
///     max: 60,
///     actual: 0,
/// });
/// assert!(format!("{}", err).contains("Duration must be between 1 and 60 seconds"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The kind of error that occurred
    pub kind: ValidationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
