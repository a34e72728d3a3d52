//! Handlers de los endpoints de flush de cache.

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Serialize;
use tracing::instrument;

use crate::cache::{InvalidationReport, NamespaceKind};
use crate::error::AppError;
use crate::state::AppState;

/// Response para operaciones de invalidación.
#[derive(Debug, Serialize)]
pub struct FlushResponse {
    pub success: bool,
    /// Número de entries invalidadas.
    pub invalidated: usize,
    /// Mensaje descriptivo.
    pub message: String,
    /// Pasos que fallaron; sus entries expiran por TTL.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
}

impl FlushResponse {
    fn from_report(report: InvalidationReport, scope: &str) -> Self {
        Self {
            success: report.is_complete(),
            invalidated: report.removed,
            message: format!("Invalidated {} cache entries ({})", report.removed, scope),
            failures: report.failures,
        }
    }
}

/// DELETE /cache
/// Invalida toda la cache.
#[instrument(skip_all)]
pub async fn flush_all(State(state): State<AppState>) -> Json<FlushResponse> {
    let report = state.invalidator().flush_all().await;
    Json(FlushResponse::from_report(report, "all namespaces"))
}

/// DELETE /cache/{namespace}
/// Invalida un namespace: `list`, `record` u `owner`.
#[instrument(skip_all, fields(namespace = %namespace))]
pub async fn flush_namespace(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Result<Json<FlushResponse>, AppError> {
    let kind: NamespaceKind = namespace.parse()?;
    let report = state.invalidator().flush(kind).await;

    Ok(Json(FlushResponse::from_report(
        report,
        &format!("namespace '{}'", kind.label()),
    )))
}
