//! Observability module for the XeroML client.
//!
//! Request spans and events go through `tracing`; counters are kept by a
//! [`MetricsCollector`].

mod logging;
mod metrics;

pub use logging::{redact, LogConfig, LogFormat, LogLevel};
pub use metrics::{DefaultMetricsCollector, MetricsCollector, NoopMetricsCollector, RequestMetrics};

pub(crate) use logging::body_preview;

use std::time::{Duration, Instant};

/// Request timer for measuring operation duration.
#[derive(Debug)]
pub struct RequestTimer {
    start: Instant,
    operation: &'static str,
}

impl RequestTimer {
    /// Starts timing an operation.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Returns the elapsed time.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Returns the operation name.
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}
