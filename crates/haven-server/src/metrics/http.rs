//! HTTP metrics middleware.

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use std::time::Instant;

const REQUESTS_TOTAL: &str = "haven_http_requests_total";
const REQUEST_DURATION: &str = "haven_http_request_duration_seconds";

/// Registra metricas por request, etiquetadas con la plantilla de ruta
/// (`/listings/{id}`) para mantener baja la cardinalidad.
pub async fn http_metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let route = matched_path.map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string());
    let labels = [
        ("method", request.method().as_str().to_string()),
        ("route", route),
    ];

    let response = next.run(request).await;
    let elapsed = start.elapsed().as_secs_f64();

    histogram!(REQUEST_DURATION, &labels).record(elapsed);

    let [method, route] = labels;
    counter!(
        REQUESTS_TOTAL,
        &[method, route, ("status", response.status().as_u16().to_string())]
    )
    .increment(1);

    response
}

pub fn register_http_metrics() {
    metrics::describe_counter!(REQUESTS_TOTAL, "HTTP requests by method, route and status");
    metrics::describe_histogram!(
        REQUEST_DURATION,
        metrics::Unit::Seconds,
        "HTTP request latency by method and route"
    );
}
