use lazy_static::lazy_static;
use prometheus::{
    Counter, Encoder, Gauge, Histogram, TextEncoder, register_counter, register_gauge,
    register_histogram,
};

use crate::error::AppError;

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("gateway_requests_total", "Total number of rate limited route requests").unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter =
        register_counter!("gateway_rate_limited_total", "Requests rejected by the rate limiter").unwrap();
    pub static ref UPSTREAM_ERRORS: Counter =
        register_counter!("gateway_upstream_errors_total", "Failed inference API calls").unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "gateway_generate_latency_seconds",
        "Prompt generation latency in seconds"
    )
    .unwrap();
    pub static ref TRACKED_CLIENTS: Gauge =
        register_gauge!("gateway_rate_limit_tracked_clients", "Client keys held by the rate limiter").unwrap();
}

// Prometheus text exposition of every registered metric
pub fn render() -> Result<String, AppError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| AppError::Metrics(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| AppError::Metrics(e.to_string()))
}
