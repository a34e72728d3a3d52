//! Tower middleware applied to every route.
//!
//! `RequestIdLayer` runs first so that `LoggingLayer` can tag its span with
//! the id it stored in the request extensions.

use std::future::Future;
use std::pin::Pin;

mod logging;
mod request_id;

pub use logging::{LoggingLayer, LoggingMiddleware};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer, RequestIdMiddleware};

/// Boxed future returned by the middleware services.
pub type ResponseFuture<R, E> = Pin<Box<dyn Future<Output = Result<R, E>> + Send>>;
