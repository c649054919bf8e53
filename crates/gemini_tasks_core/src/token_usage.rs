//! Token usage tracking.

use crate::{CANDIDATE_TOKEN_COUNT, Counter, PROMPT_TOKEN_COUNT, TOTAL_TOKEN_COUNT};
use serde::{Deserialize, Serialize};

/// Usage block of a single `generateContent` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_token_count: Option<u64>,
    /// Tokens across all generated candidates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates_token_count: Option<u64>,
    /// Total tokens billed for the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_token_count: Option<u64>,
}

/// Token usage summed over every response a task observed.
///
/// # Examples
///
/// ```
/// use gemini_tasks_core::{TokenUsageData, UsageMetadata};
///
/// let usage = TokenUsageData::sum(&[
///     UsageMetadata { prompt_token_count: Some(10), candidates_token_count: Some(4), total_token_count: Some(14) },
///     UsageMetadata { prompt_token_count: Some(20), candidates_token_count: None, total_token_count: Some(20) },
/// ]);
/// assert_eq!(*usage.prompt_tokens(), 30);
/// assert_eq!(*usage.candidate_tokens(), 4);
/// assert_eq!(*usage.total_tokens(), 34);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_getters::Getters,
)]
pub struct TokenUsageData {
    /// Tokens in the prompts.
    prompt_tokens: u64,
    /// Tokens in the generated candidates.
    candidate_tokens: u64,
    /// Total tokens, as reported by the API.
    total_tokens: u64,
}

impl TokenUsageData {
    /// Creates new token usage data.
    pub fn new(prompt_tokens: u64, candidate_tokens: u64, total_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            candidate_tokens,
            total_tokens,
        }
    }

    /// Sums usage blocks; absent counts contribute zero.
    pub fn sum(usages: &[UsageMetadata]) -> Self {
        usages.iter().fold(Self::default(), |acc, usage| Self {
            prompt_tokens: acc.prompt_tokens + usage.prompt_token_count.unwrap_or(0),
            candidate_tokens: acc.candidate_tokens + usage.candidates_token_count.unwrap_or(0),
            total_tokens: acc.total_tokens + usage.total_token_count.unwrap_or(0),
        })
    }

    /// The three counters emitted after a task run.
    pub fn counters(&self) -> [Counter; 3] {
        [
            Counter::of(CANDIDATE_TOKEN_COUNT, self.candidate_tokens),
            Counter::of(PROMPT_TOKEN_COUNT, self.prompt_tokens),
            Counter::of(TOTAL_TOKEN_COUNT, self.total_tokens),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_of_nothing_is_zero() {
        assert_eq!(TokenUsageData::sum(&[]), TokenUsageData::new(0, 0, 0));
    }

    #[test]
    fn test_counters_order_and_names() {
        let counters = TokenUsageData::new(7, 3, 10).counters();
        assert_eq!(counters[0], Counter::of("candidate.token.count", 3));
        assert_eq!(counters[1], Counter::of("prompt.token.count", 7));
        assert_eq!(counters[2], Counter::of("total.token.count", 10));
    }
}
