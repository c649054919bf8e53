//! Final state hint of a task output.

use serde::{Deserialize, Serialize};

/// State the orchestrator should record for a finished task.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum TaskState {
    /// Completed normally
    #[default]
    Success,
    /// Completed, but the result needs attention
    Warning,
}
