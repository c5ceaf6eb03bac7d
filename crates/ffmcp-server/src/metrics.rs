//! Prometheus metrics for the HTTP transport.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "ffmcp_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "ffmcp_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "ffmcp_http_requests_in_flight";

    // Access gate
    pub const AUTH_REJECTIONS_TOTAL: &str = "ffmcp_auth_rejections_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a request turned away by the access gate.
pub fn record_auth_rejection(path: &str) {
    let labels = [("path", sanitize_path(path))];
    counter!(names::AUTH_REJECTIONS_TOTAL, &labels).increment(1);
}

/// Collapse paths to the routes we serve so scanners can't blow up label cardinality.
fn sanitize_path(path: &str) -> String {
    match path {
        "/mcp" | "/health" | "/metrics" => path.to_string(),
        _ => "other".to_string(),
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
