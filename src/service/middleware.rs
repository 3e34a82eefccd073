//! Service middleware and metric events.
//!
//! ## Metrics Exposed
//!
//! - `request_metric` - path, method, status and latency of every request
//! - `rewrite_metric` - disposition and latency of every rewrite
//!
//! Metrics are emitted as tracing events under `rewrite_kernel::metrics`
//! and aggregated from logs.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::info;

/// Metrics middleware that records request counts and latency.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        target: "rewrite_kernel::metrics",
        metric_type = "request",
        path = %path,
        method = %method,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "request_metric"
    );

    response
}

/// Record the outcome of one rewrite.
///
/// `disposition` is `accepted` or a rejection label such as
/// `excessive_drift`.
pub fn record_rewrite_metrics(endpoint: &str, disposition: &str, latency_ms: u64) {
    info!(
        target: "rewrite_kernel::metrics",
        metric_type = "rewrite",
        endpoint = endpoint,
        disposition = disposition,
        latency_ms = latency_ms,
        "rewrite_metric"
    );
}
