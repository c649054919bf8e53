//! In-process runtime used by the CLI and tests.

mod context;
mod metrics;
mod observability;
mod settings;
mod storage;

pub use context::LocalRunContext;
#[cfg(feature = "metrics")]
pub use metrics::OtelMetricSink;
pub use metrics::InMemoryMetricSink;
pub use observability::{init_observability, init_tracing, shutdown_observability};
pub use settings::{DEFAULT_SETTINGS_FILE, ENV_PREFIX, LogFormat, Settings};
pub use storage::{FileStorage, MemoryStorage};
