//! Metrics collection and exposition.
//!
//! # Metrics
//! - `headers_by_request_resolutions_total` (counter): lookups by outcome
//! - `headers_by_request_rewrites_total` (counter): requests by rewrite applied/skipped
//! - `headers_by_request_decision_duration_seconds` (histogram): time spent in the middleware

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of a decision lookup (`ok` or an error kind).
pub fn record_resolution(outcome: &'static str) {
    counter!("headers_by_request_resolutions_total", "outcome" => outcome).increment(1);
}

/// Record whether a rewrite rule was applied.
pub fn record_rewrite(applied: bool) {
    let label = if applied { "applied" } else { "skipped" };
    counter!("headers_by_request_rewrites_total", "result" => label).increment(1);
}

/// Record time spent resolving and applying a decision.
pub fn record_duration(middleware: &str, elapsed: Duration) {
    histogram!(
        "headers_by_request_decision_duration_seconds",
        "middleware" => middleware.to_string()
    )
    .record(elapsed.as_secs_f64());
}
