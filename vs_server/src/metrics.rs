//! Prometheus metrics for monitoring server health.
//!
//! Metrics are exposed in Prometheus text format on a dedicated listener.
//! Recording is a no-op until [`init_metrics`] installs the exporter.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use vs_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::http_requests_total("POST", "/auth/login", 200);
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
///
/// `path` should be the matched route template, not the raw URI, to keep label
/// cardinality bounded.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Auth Metrics
// ============================================================================

/// Increment login attempts counter.
pub fn login_attempts_total(success: bool) {
    metrics::counter!("login_attempts_total",
        "success" => success.to_string()
    )
    .increment(1);
}

/// Increment auth flow counter (register, refresh, logout, verify, reset).
pub fn auth_events_total(event: &'static str, success: bool) {
    metrics::counter!("auth_events_total",
        "event" => event,
        "success" => success.to_string()
    )
    .increment(1);
}

/// Increment rejected-session counter.
pub fn sessions_rejected_total() {
    metrics::counter!("sessions_rejected_total").increment(1);
}

// ============================================================================
// Engagement Metrics
// ============================================================================

/// Increment engagement toggle counter.
///
/// `target` is one of `video`, `comment`, `bookmark`, `subscription`.
pub fn engagement_toggles_total(target: &'static str, active: bool) {
    metrics::counter!("engagement_toggles_total",
        "target" => target,
        "active" => active.to_string()
    )
    .increment(1);
}
