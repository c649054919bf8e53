//! Configuration error types.

/// Failures while loading settings, task definitions or the logging stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// Host settings could not be loaded
    #[display("Failed to load settings: {}", _0)]
    SettingsLoad(String),
    /// Task definition text did not deserialize
    #[display("Failed to parse {} task definition: {}", format, message)]
    DefinitionParse {
        /// Definition format (toml, yaml or json)
        format: String,
        /// Deserializer message
        message: String,
    },
    /// Task definition file has an extension no format claims
    #[display(
        "Unsupported task definition extension: {} (expected .toml, .yaml, .yml or .json)",
        _0
    )]
    UnsupportedExtension(String),
    /// Task definition file could not be read
    #[display("Failed to read {}: {}", path, message)]
    DefinitionRead {
        /// Path of the definition file
        path: String,
        /// I/O error message
        message: String,
    },
    /// Tracing or metrics export could not be initialized
    #[display("{}", _0)]
    Logging(String),
}

/// Configuration error with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The kind of error that occurred
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError of the given kind at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use gemini_tasks_error::{ConfigError, ConfigErrorKind};
    ///
    /// let err = ConfigError::new(ConfigErrorKind::UnsupportedExtension("task.ini".into()));
    /// assert!(err.to_string().contains("Unsupported task definition extension: task.ini"));
    /// ```
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
