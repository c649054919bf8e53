//! Metric emission sink.

use gemini_tasks_core::Counter;

/// Destination for counters emitted by tasks.
pub trait MetricSink: Send + Sync {
    /// Record a counter increment.
    fn counter(&self, counter: &Counter);
}
