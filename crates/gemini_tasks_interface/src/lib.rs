//! Collaborator traits for gemini_tasks.
//!
//! Tasks never talk to the orchestrator directly. Rendering, blob storage and
//! metric emission go through the traits defined here, so the same task code
//! runs inside a host, in the local CLI runtime, or against test doubles.

mod context;
mod metrics;
mod property;
mod storage;

pub use context::RunContext;
pub use metrics::MetricSink;
pub use property::{HumanDuration, Property};
pub use storage::Storage;
