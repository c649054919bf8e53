//! Prediction output record.

use crate::{CitationMetadata, SafetyRating};
use serde::{Deserialize, Serialize};

/// One candidate answer with its safety and citation annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Safety ratings reported for the candidate, if any
    #[serde(default)]
    safety_ratings: Option<Vec<SafetyRating>>,
    /// Citations reported for the candidate, if any
    #[serde(default)]
    citation_metadata: Option<CitationMetadata>,
    /// Concatenated text of the candidate, empty when it carried no content
    #[serde(default)]
    content: String,
}

impl Prediction {
    /// Creates a prediction.
    pub fn new(
        safety_ratings: Option<Vec<SafetyRating>>,
        citation_metadata: Option<CitationMetadata>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            safety_ratings,
            citation_metadata,
            content: content.into(),
        }
    }
}
