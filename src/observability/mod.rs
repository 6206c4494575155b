//! Observability for the catalog service
//!
//! - Structured logging through `tracing` (text in development, JSON in
//!   production)
//! - Request counters and latency histograms exposed at `/metrics/`

mod logging;
mod metrics;

pub use logging::init_logging;
pub use metrics::{MetricsRegistry, CONTENT_TYPE as METRICS_CONTENT_TYPE, DURATION_BUCKETS};
