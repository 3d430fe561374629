//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dispatch_requests_total` (counter): requests by method, status
//! - `dispatch_duration_seconds` (histogram): time spent in dispatch + handler
//! - `dispatch_table_rules` (gauge): rules in the active table
//!
//! # Design Decisions
//! - Recorded in the HTTP adapter only; the routing core stays pure
//! - Without an installed recorder every call is a no-op
//! - Methods outside the standard set share the `other` label

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one dispatched request.
pub fn record_dispatch(method: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method_label(method).to_string()),
        ("status", status.to_string()),
    ];
    counter!("dispatch_requests_total", &labels).increment(1);
    histogram!("dispatch_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "PATCH" => "PATCH",
        "HEAD" => "HEAD",
        "OPTIONS" => "OPTIONS",
        "CONNECT" => "CONNECT",
        "TRACE" => "TRACE",
        _ => "other",
    }
}

/// Record the size of the active rule table.
pub fn record_table_size(rules: usize) {
    gauge!("dispatch_table_rules").set(rules as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_label_bounds_cardinality() {
        assert_eq!(method_label("GET"), "GET");
        assert_eq!(method_label("OPTIONS"), "OPTIONS");
        assert_eq!(method_label("PROPFIND"), "other");
        assert_eq!(method_label("get"), "other");
        assert_eq!(method_label("X-RANDOM-1234"), "other");
    }
}
