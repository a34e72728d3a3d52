//! Middleware de logging estructurado.

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
};
use std::{
    task::{Context, Poll},
    time::Instant,
};
use tower::{Layer, Service};
use tracing::{Instrument, debug, info, info_span, warn};

use super::ResponseFuture;
use super::request_id::RequestId;

/// Layer that logs requests and responses.
#[derive(Clone, Default)]
pub struct LoggingLayer;

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddleware { inner }
    }
}

/// Middleware that logs request/response details inside an `http_request`
/// span carrying the request id.
#[derive(Clone)]
pub struct LoggingMiddleware<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for LoggingMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = ResponseFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let start = Instant::now();
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map_or("unknown", |id| id.0.as_str());

        let span = info_span!(
            "http_request",
            request_id = %request_id,
            method = %request.method(),
            path = %request.uri().path(),
            query = request.uri().query().unwrap_or(""),
        );

        let mut inner = self.inner.clone();

        Box::pin(
            async move {
                debug!("Request started");
                let response = inner.call(request).await?;
                log_outcome(response.status(), start.elapsed().as_millis() as u64);
                Ok(response)
            }
            .instrument(span),
        )
    }
}

/// 5xx at warn, everything else at info.
fn log_outcome(status: StatusCode, duration_ms: u64) {
    let status_code = status.as_u16();
    if status.is_server_error() {
        warn!(status = status_code, duration_ms, "Request failed");
    } else if status.is_client_error() {
        info!(status = status_code, duration_ms, "Request rejected");
    } else {
        info!(status = status_code, duration_ms, "Request completed");
    }
}
