//! Safety and citation annotations attached to candidates.

use serde::{Deserialize, Serialize};

/// Safety rating for one harm category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct SafetyRating {
    /// Harm category, e.g. `HARM_CATEGORY_HATE_SPEECH`
    #[serde(default)]
    category: String,
    /// Harm probability, e.g. `NEGLIGIBLE`
    #[serde(default)]
    probability: String,
    /// Whether this rating blocked the content
    #[serde(default)]
    blocked: bool,
    /// Numeric probability score (Vertex AI only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    probability_score: Option<f32>,
    /// Harm severity (Vertex AI only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    severity: Option<String>,
    /// Numeric severity score (Vertex AI only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    severity_score: Option<f32>,
}

impl SafetyRating {
    /// Creates a rating with only the fields every backend reports.
    pub fn new(category: impl Into<String>, probability: impl Into<String>, blocked: bool) -> Self {
        Self {
            category: category.into(),
            probability: probability.into(),
            blocked,
            probability_score: None,
            severity: None,
            severity_score: None,
        }
    }
}

/// Source attributions for a candidate.
///
/// The Gemini API names the list `citationSources`, Vertex AI names it
/// `citations`; both deserialize here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct CitationMetadata {
    /// Cited sources
    #[serde(default, alias = "citationSources")]
    citations: Vec<CitationSource>,
}

impl CitationMetadata {
    /// Creates citation metadata from its sources.
    pub fn new(citations: Vec<CitationSource>) -> Self {
        Self { citations }
    }
}

/// A single cited source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct CitationSource {
    /// Start of the attributed segment, in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_index: Option<i32>,
    /// End of the attributed segment, exclusive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_index: Option<i32>,
    /// Source URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uri: Option<String>,
    /// Source title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    /// Source license
    #[serde(default, skip_serializing_if = "Option::is_none")]
    license: Option<String>,
}
