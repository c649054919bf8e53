//! Metric sinks.

use gemini_tasks_core::Counter;
use gemini_tasks_interface::MetricSink;
use std::sync::Mutex;
use tracing::debug;

/// Records counters in memory.
#[derive(Debug, Default)]
pub struct InMemoryMetricSink {
    counters: Mutex<Vec<Counter>>,
}

impl InMemoryMetricSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every counter recorded so far, in emission order.
    pub fn counters(&self) -> Vec<Counter> {
        self.counters
            .lock()
            .map(|counters| counters.clone())
            .unwrap_or_default()
    }

    /// Sum of every counter recorded under `name`.
    pub fn total(&self, name: &str) -> u64 {
        self.counters()
            .iter()
            .filter(|counter| counter.name() == name)
            .map(|counter| *counter.value())
            .sum()
    }
}

impl MetricSink for InMemoryMetricSink {
    fn counter(&self, counter: &Counter) {
        debug!(name = %counter.name(), value = counter.value(), "Counter");
        if let Ok(mut counters) = self.counters.lock() {
            counters.push(counter.clone());
        }
    }
}

#[cfg(feature = "metrics")]
pub use otel::OtelMetricSink;

#[cfg(feature = "metrics")]
mod otel {
    use super::*;
    use opentelemetry::global;
    use opentelemetry::metrics::{Counter as OtelCounter, Meter};
    use std::collections::HashMap;

    /// Forwards counters to the global OpenTelemetry meter provider.
    pub struct OtelMetricSink {
        meter: Meter,
        instruments: Mutex<HashMap<String, OtelCounter<u64>>>,
    }

    impl OtelMetricSink {
        /// Sink using the meter named `scope`.
        pub fn new(scope: &'static str) -> Self {
            Self {
                meter: global::meter(scope),
                instruments: Mutex::new(HashMap::new()),
            }
        }
    }

    impl std::fmt::Debug for OtelMetricSink {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("OtelMetricSink").finish_non_exhaustive()
        }
    }

    impl MetricSink for OtelMetricSink {
        fn counter(&self, counter: &Counter) {
            let Ok(mut instruments) = self.instruments.lock() else {
                return;
            };
            let instrument = instruments
                .entry(counter.name().clone())
                .or_insert_with(|| self.meter.u64_counter(counter.name().clone()).build());
            instrument.add(*counter.value(), &[]);
            debug!(name = %counter.name(), value = counter.value(), "Exported counter");
        }
    }
}
