use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use haven_core::HavenError;
use serde::Serialize;

use crate::service::ServiceError;

#[derive(Debug)]
pub enum AppError {
    /// Parametros o body invalidos
    BadRequest(String),

    /// Listing no encontrado
    NotFound(String),

    /// Error interno; el detalle solo se registra en logs
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad Request", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not Found", msg),
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "An internal error occurred".to_string(),
                )
            },
        };

        let body = Json(ErrorResponse {
            success: false,
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<HavenError> for AppError {
    fn from(err: HavenError) -> Self {
        match err {
            HavenError::InvalidId { .. } | HavenError::InvalidParameter { .. } => {
                AppError::BadRequest(err.to_string())
            },
            HavenError::NotFound { .. } => AppError::NotFound(err.to_string()),
            HavenError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => e.into(),
            ServiceError::Store(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
