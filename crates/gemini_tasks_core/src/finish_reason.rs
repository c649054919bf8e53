//! Finish reason reported for a generation candidate.

use serde::{Deserialize, Serialize};

/// Why the model stopped generating a candidate.
///
/// Values the API adds later parse into [`FinishReason::Unknown`] instead of
/// failing the whole response.
///
/// # Examples
///
/// ```
/// use gemini_tasks_core::FinishReason;
///
/// let reason: FinishReason = "SAFETY".parse().unwrap();
/// assert!(reason.is_blocked());
/// assert_eq!(reason.to_string(), "SAFETY");
///
/// let future: FinishReason = "SOMETHING_NEW".parse().unwrap();
/// assert_eq!(future, FinishReason::Unknown("SOMETHING_NEW".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FinishReason {
    /// Reason not set by the API
    #[default]
    Unspecified,
    /// Natural stop point or stop sequence
    Stop,
    /// Token limit reached
    MaxTokens,
    /// Flagged for safety reasons
    Safety,
    /// Flagged for reciting training data
    Recitation,
    /// Unsupported language
    Language,
    /// Other reason
    Other,
    /// Contains forbidden terms
    Blocklist,
    /// Potentially prohibited content
    ProhibitedContent,
    /// Sensitive personally identifiable information
    Spii,
    /// Invalid function call emitted by the model
    MalformedFunctionCall,
    /// Generated image flagged for safety reasons
    ImageSafety,
    /// Value not known to this crate
    Unknown(String),
}

impl FinishReason {
    /// True when generation was cut off by the safety or recitation filters.
    pub fn is_blocked(&self) -> bool {
        matches!(self, FinishReason::Safety | FinishReason::Recitation)
    }

    /// API spelling of this reason.
    pub fn as_str(&self) -> &str {
        match self {
            FinishReason::Unspecified => "FINISH_REASON_UNSPECIFIED",
            FinishReason::Stop => "STOP",
            FinishReason::MaxTokens => "MAX_TOKENS",
            FinishReason::Safety => "SAFETY",
            FinishReason::Recitation => "RECITATION",
            FinishReason::Language => "LANGUAGE",
            FinishReason::Other => "OTHER",
            FinishReason::Blocklist => "BLOCKLIST",
            FinishReason::ProhibitedContent => "PROHIBITED_CONTENT",
            FinishReason::Spii => "SPII",
            FinishReason::MalformedFunctionCall => "MALFORMED_FUNCTION_CALL",
            FinishReason::ImageSafety => "IMAGE_SAFETY",
            FinishReason::Unknown(value) => value,
        }
    }
}

impl From<String> for FinishReason {
    fn from(value: String) -> Self {
        match value.as_str() {
            "FINISH_REASON_UNSPECIFIED" => FinishReason::Unspecified,
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::MaxTokens,
            "SAFETY" => FinishReason::Safety,
            "RECITATION" => FinishReason::Recitation,
            "LANGUAGE" => FinishReason::Language,
            "OTHER" => FinishReason::Other,
            "BLOCKLIST" => FinishReason::Blocklist,
            "PROHIBITED_CONTENT" => FinishReason::ProhibitedContent,
            "SPII" => FinishReason::Spii,
            "MALFORMED_FUNCTION_CALL" => FinishReason::MalformedFunctionCall,
            "IMAGE_SAFETY" => FinishReason::ImageSafety,
            _ => FinishReason::Unknown(value),
        }
    }
}

impl From<FinishReason> for String {
    fn from(reason: FinishReason) -> Self {
        reason.as_str().to_string()
    }
}

impl std::str::FromStr for FinishReason {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FinishReason::from(s.to_string()))
    }
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
