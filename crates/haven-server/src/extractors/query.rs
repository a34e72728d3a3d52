use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use haven_core::RawParams;

use crate::error::AppError;

/// Query string as an ordered parameter map.
///
/// Every parameter is optional and unknown names are ignored downstream.
/// When a name repeats, the last occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct ListParams(pub RawParams);

impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self(RawParams::from_pairs(pairs)))
    }
}
