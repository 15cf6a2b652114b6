//! Request metrics.
//!
//! # Metrics
//! - `solr_requests_total` (counter): requests by method, status
//! - `solr_request_duration_seconds` (histogram): latency by method
//!
//! Status is the HTTP code, or `error` when no response was received.

use std::time::Instant;

pub fn record_request(method: &str, status: Option<u16>, start: Instant) {
    let status = status.map_or_else(|| "error".to_string(), |s| s.to_string());
    metrics::counter!("solr_requests_total", "method" => method.to_string(), "status" => status).increment(1);
    metrics::histogram!("solr_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}
