//! Metric records emitted by tasks.

use serde::{Deserialize, Serialize};

/// Counter name for tokens generated across candidates.
pub const CANDIDATE_TOKEN_COUNT: &str = "candidate.token.count";
/// Counter name for tokens in the prompt.
pub const PROMPT_TOKEN_COUNT: &str = "prompt.token.count";
/// Counter name for all tokens billed.
pub const TOTAL_TOKEN_COUNT: &str = "total.token.count";

/// A named counter value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct Counter {
    /// Metric name
    name: String,
    /// Counter increment
    value: u64,
}

impl Counter {
    /// Creates a counter.
    pub fn of(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}
