/// Metrics and telemetry for the resolve gateway
///
/// Provides Prometheus-compatible metrics for monitoring:
/// - Resolutions by winning source
/// - Failures by error kind
/// - End-to-end resolution latency
/// - Upstream request outcomes per service

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    /// Successful resolutions by source
    pub static ref RESOLUTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "resolutions_total",
        "Total number of successful address resolutions",
        &["source"]
    )
    .unwrap();

    /// Failed resolutions by error kind
    pub static ref RESOLUTION_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "resolution_failures_total",
        "Total number of failed address resolutions",
        &["kind"]
    )
    .unwrap();

    /// Resolution duration in seconds, labelled by outcome
    pub static ref RESOLUTION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "resolution_duration_seconds",
        "Address resolution latencies in seconds",
        &["outcome"],
        vec![0.0001, 0.001, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    /// Upstream requests by service and outcome
    pub static ref UPSTREAM_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "upstream_requests_total",
        "Total number of requests made to upstream resolution services",
        &["service", "outcome"]
    )
    .unwrap();
}

/// Record a successful resolution
pub fn record_resolution(source: &str, elapsed_ms: f64) {
    RESOLUTIONS_TOTAL.with_label_values(&[source]).inc();
    RESOLUTION_DURATION_SECONDS
        .with_label_values(&[source])
        .observe(elapsed_ms / 1000.0);
}

/// Record a failed resolution
pub fn record_failure(kind: &str, elapsed_ms: f64) {
    RESOLUTION_FAILURES_TOTAL.with_label_values(&[kind]).inc();
    RESOLUTION_DURATION_SECONDS
        .with_label_values(&["error"])
        .observe(elapsed_ms / 1000.0);
}

/// Record one upstream call
pub fn record_upstream(service: &str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    UPSTREAM_REQUESTS_TOTAL
        .with_label_values(&[service, outcome])
        .inc();
}

/// Encode all registered metrics in the Prometheus text format
pub fn gather() -> Result<String, String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| format!("Failed to encode metrics: {}", e))?;
    String::from_utf8(buffer).map_err(|e| format!("Metrics are not valid UTF-8: {}", e))
}
