use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use haven_core::{ListingId, OwnerId};

use crate::error::AppError;

/// Extractor for `/listings/{id}` routes.
///
/// Malformed ids are rejected with 400 before any handler runs.
#[derive(Debug, Clone, Copy)]
pub struct ListingIdPath(pub ListingId);

/// Extractor for `/owners/{owner_id}/listings` routes.
#[derive(Debug, Clone, Copy)]
pub struct OwnerIdPath(pub OwnerId);

impl<S> FromRequestParts<S> for ListingIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = single_segment(parts, state).await?;
        Ok(Self(raw.parse()?))
    }
}

impl<S> FromRequestParts<S> for OwnerIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = single_segment(parts, state).await?;
        Ok(Self(raw.parse()?))
    }
}

async fn single_segment<S: Send + Sync>(parts: &mut Parts, state: &S) -> Result<String, AppError> {
    let Path(raw) = Path::<String>::from_request_parts(parts, state)
        .await
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    Ok(raw)
}
