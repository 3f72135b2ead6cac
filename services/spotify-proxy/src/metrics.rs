//! Prometheus metrics exposition
//!
//! - `spotify_proxy_requests_total` (counter): labels `route`, `method`, `status`
//! - `spotify_proxy_request_duration_seconds` (histogram): label `route`
//! - `spotify_proxy_upstream_errors_total` (counter): label `operation`

use std::time::Instant;

use anyhow::Context;
use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

const DURATION_METRIC: &str = "spotify_proxy_request_duration_seconds";

/// Each request makes at most two sequential Spotify calls bounded by the
/// client timeout, so the buckets stop at 30s.
const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
];

fn builder() -> anyhow::Result<PrometheusBuilder> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(DURATION_METRIC.to_string()), DURATION_BUCKETS)
        .context("failed to set histogram buckets")
}

/// Install the global Prometheus recorder and return a handle for `/metrics`.
pub fn install_recorder() -> anyhow::Result<PrometheusHandle> {
    builder()?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Record a completed request.
pub fn record_request(route: &str, method: &str, status: u16, duration_secs: f64) {
    metrics::counter!(
        "spotify_proxy_requests_total",
        "route" => route.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(DURATION_METRIC, "route" => route.to_string()).record(duration_secs);
}

/// Record a failed or rejected Spotify call.
pub fn record_upstream_error(operation: &str) {
    metrics::counter!("spotify_proxy_upstream_errors_total", "operation" => operation.to_string())
        .increment(1);
}

/// Middleware recording every request under its route template, so
/// unmatched paths cannot blow up label cardinality.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let method = request.method().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    record_request(
        &route,
        &method,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );
    response
}
