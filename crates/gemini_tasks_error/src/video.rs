//! Video generation error types.

/// Terminal failures of a video generation operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum VideoGenerationErrorKind {
    /// Operation did not complete within the configured timeout
    #[display("Video generation timed out after {} minutes.", minutes)]
    Timeout {
        /// Configured timeout, in whole minutes
        minutes: u64,
    },
    /// Operation completed without a response
    #[display(
        "No video was generated. Possible reasons: content policy violations or model limitations. Error :: {}",
        _0
    )]
    NoResponse(String),
    /// Response contained no generated video
    #[display("No video generated")]
    NoVideo,
    /// Generated video has no URI
    #[display("Generated video URI is null or empty")]
    EmptyUri,
}

/// Video generation error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Video Generation Error: {} at line {} in {}", kind, line, file)]
pub struct VideoGenerationError {
    /// The kind of error that occurred
    pub kind: VideoGenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl VideoGenerationError {
    /// Create a new video generation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: VideoGenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
