//! Property rendering error types.

/// Kinds of property rendering failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RenderErrorKind {
    /// A required property has no value
    #[display("Missing required property: {}", _0)]
    Missing(String),
    /// The template collaborator rejected an expression
    #[display("Failed to render expression '{}': {}", expression, message)]
    Template {
        /// Expression that failed
        expression: String,
        /// Reason given by the renderer
        message: String,
    },
    /// Rendered value could not be converted to the property type
    #[display("Property '{}' has an invalid value: {}", property, message)]
    Conversion {
        /// Name of the property
        property: String,
        /// Conversion failure
        message: String,
    },
}

/// Rendering error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Render Error: {} at line {} in {}", kind, line, file)]
pub struct RenderError {
    /// The kind of error that occurred
    pub kind: RenderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RenderError {
    /// Create a new rendering error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RenderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
