//! Request metrics in Prometheus text format
//!
//! - Counters per (method, route template, status)
//! - Latency histogram per (method, route template)
//! - Reset only on process start

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Prometheus client default buckets, in seconds
pub const DURATION_BUCKETS: [f64; 14] = [
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// Content type of [`MetricsRegistry::render`] output
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Debug, Default, Clone)]
struct Histogram {
    /// Non-cumulative count per bucket; rendered cumulatively
    buckets: [u64; DURATION_BUCKETS.len()],
    sum: f64,
    count: u64,
}

impl Histogram {
    fn observe(&mut self, seconds: f64) {
        if let Some(i) = DURATION_BUCKETS.iter().position(|le| seconds <= *le) {
            self.buckets[i] += 1;
        }
        self.sum += seconds;
        self.count += 1;
    }
}

#[derive(Debug, Default)]
struct Series {
    requests: BTreeMap<(String, String, u16), u64>,
    durations: BTreeMap<(String, String), Histogram>,
}

/// Registry of HTTP request metrics
///
/// # Thread Safety
///
/// The labelled series sit behind one mutex; the grand total is a lock-free
/// atomic so cheap reads never contend with recording.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    total_requests: AtomicU64,
    series: Mutex<Series>,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed request
    pub fn record_request(&self, method: &str, endpoint: &str, status: u16, elapsed: Duration) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);

        let mut series = self.series.lock().unwrap_or_else(PoisonError::into_inner);
        *series
            .requests
            .entry((method.to_string(), endpoint.to_string(), status))
            .or_insert(0) += 1;
        series
            .durations
            .entry((method.to_string(), endpoint.to_string()))
            .or_default()
            .observe(elapsed.as_secs_f64());
    }

    /// Requests recorded across all series
    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    /// Requests recorded for one label set
    pub fn request_count(&self, method: &str, endpoint: &str, status: u16) -> u64 {
        let series = self.series.lock().unwrap_or_else(PoisonError::into_inner);
        series
            .requests
            .get(&(method.to_string(), endpoint.to_string(), status))
            .copied()
            .unwrap_or(0)
    }

    /// Prometheus text exposition of every series
    pub fn render(&self) -> String {
        let series = self.series.lock().unwrap_or_else(PoisonError::into_inner);
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "# HELP http_requests_total Total HTTP requests");
        let _ = writeln!(out, "# TYPE http_requests_total counter");
        for ((method, endpoint, status), count) in &series.requests {
            let _ = writeln!(
                out,
                "http_requests_total{{method=\"{}\",endpoint=\"{}\",status=\"{}\"}} {}",
                escape_label(method),
                escape_label(endpoint),
                status,
                count
            );
        }

        let _ = writeln!(out, "# HELP http_request_duration_seconds HTTP request latency");
        let _ = writeln!(out, "# TYPE http_request_duration_seconds histogram");
        for ((method, endpoint), histogram) in &series.durations {
            let labels = format!(
                "method=\"{}\",endpoint=\"{}\"",
                escape_label(method),
                escape_label(endpoint)
            );
            let mut cumulative = 0;
            for (le, n) in DURATION_BUCKETS.iter().zip(histogram.buckets.iter()) {
                cumulative += n;
                let _ = writeln!(
                    out,
                    "http_request_duration_seconds_bucket{{{},le=\"{}\"}} {}",
                    labels, le, cumulative
                );
            }
            let _ = writeln!(
                out,
                "http_request_duration_seconds_bucket{{{},le=\"+Inf\"}} {}",
                labels, histogram.count
            );
            let _ = writeln!(
                out,
                "http_request_duration_seconds_sum{{{}}} {}",
                labels, histogram.sum
            );
            let _ = writeln!(
                out,
                "http_request_duration_seconds_count{{{}}} {}",
                labels, histogram.count
            );
        }

        out
    }
}

fn escape_label(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_renders_headers_only() {
        let metrics = MetricsRegistry::new();
        let text = metrics.render();
        assert!(text.contains("# TYPE http_requests_total counter"));
        assert!(text.contains("# TYPE http_request_duration_seconds histogram"));
        assert!(!text.contains("http_requests_total{"));
        assert_eq!(metrics.total_requests(), 0);
    }

    #[test]
    fn test_record_request() {
        let metrics = MetricsRegistry::new();
        metrics.record_request("GET", "/healthz/", 200, Duration::from_millis(3));
        metrics.record_request("GET", "/healthz/", 200, Duration::from_millis(30));
        metrics.record_request("GET", "/healthz/", 503, Duration::from_millis(3));

        assert_eq!(metrics.request_count("GET", "/healthz/", 200), 2);
        assert_eq!(metrics.request_count("GET", "/healthz/", 503), 1);
        assert_eq!(metrics.total_requests(), 3);

        let text = metrics.render();
        assert!(text.contains(
            "http_requests_total{method=\"GET\",endpoint=\"/healthz/\",status=\"200\"} 2"
        ));
        assert!(text.contains(
            "http_request_duration_seconds_bucket{method=\"GET\",endpoint=\"/healthz/\",le=\"0.005\"} 2"
        ));
        assert!(text.contains(
            "http_request_duration_seconds_bucket{method=\"GET\",endpoint=\"/healthz/\",le=\"0.05\"} 3"
        ));
        assert!(text.contains(
            "http_request_duration_seconds_count{method=\"GET\",endpoint=\"/healthz/\"} 3"
        ));
    }

    #[test]
    fn test_label_escaping() {
        assert_eq!(escape_label("a\"b\\c"), "a\\\"b\\\\c");
    }
}
