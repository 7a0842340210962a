//! Metrics collection and exposition.
//!
//! # Metrics
//! - `apod_http_requests_total` (counter): inbound requests by status
//! - `apod_http_request_duration_seconds` (histogram): inbound latency
//! - `apod_upstream_requests_total` (counter): upstream calls by outcome
//! - `apod_upstream_request_duration_seconds` (histogram): upstream latency
//! - `apod_upstream_in_flight` (gauge): calls currently admitted by the gate

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(status: u16, start: Instant) {
    metrics::counter!("apod_http_requests_total", "status" => status.to_string()).increment(1);
    metrics::histogram!("apod_http_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_upstream(outcome: &'static str, start: Instant) {
    metrics::counter!("apod_upstream_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("apod_upstream_request_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

pub fn record_in_flight(in_flight: usize) {
    metrics::gauge!("apod_upstream_in_flight").set(in_flight as f64);
}
