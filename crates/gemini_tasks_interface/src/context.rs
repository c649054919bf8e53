//! Per-execution context handed to every task.

use crate::Storage;
use gemini_tasks_core::Counter;
use gemini_tasks_error::RenderError;

/// Services the host provides to a running task.
///
/// Implementations decide what an expression means; a host with a template
/// engine evaluates it, the local runtime returns it unchanged.
pub trait RunContext: Send + Sync {
    /// Identifier of the running task, used in log fields.
    fn task_id(&self) -> &str;

    /// Resolve placeholders in a configuration string.
    fn render_template(&self, template: &str) -> Result<String, RenderError>;

    /// Blob storage for inputs and generated files.
    fn storage(&self) -> &dyn Storage;

    /// Emit a metric for this execution.
    fn metric(&self, counter: Counter);
}
