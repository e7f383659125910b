use std::time::Instant;

use once_cell::sync::Lazy;
use prometheus::{register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec, TextEncoder};
use service::errors::ServiceError;

// Prometheus metrics (default registry)
pub static REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "pokedex_requests_total",
        "Total catalog operations handled",
        &["operation"]
    )
    .expect("register requests_total")
});

pub static ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "pokedex_errors_total",
        "Total catalog operations that failed, by error kind",
        &["operation", "kind"]
    )
    .expect("register errors_total")
});

pub static REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "pokedex_request_duration_seconds",
        "Catalog operation duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("register request_duration")
});

/// Record one service call: count, latency and, on failure, its error kind.
pub fn record<T>(operation: &'static str, started: Instant, result: &Result<T, ServiceError>) {
    REQUESTS_TOTAL.with_label_values(&[operation]).inc();
    REQUEST_DURATION.with_label_values(&[operation]).observe(started.elapsed().as_secs_f64());
    if let Err(e) = result {
        ERRORS_TOTAL.with_label_values(&[operation, e.kind().as_str()]).inc();
    }
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
