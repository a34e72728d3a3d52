//! Listing endpoint handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use haven_core::{
    ListEnvelope, Listing, ListingPatch, ListingQuery, NewListing, Pagination, RecordEnvelope,
    SortSpec,
};
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::{ListParams, ListingIdPath, OwnerIdPath};
use crate::service::DeleteSummary;
use crate::state::AppState;

/// GET /listings
#[instrument(skip_all, fields(params = params.len()))]
pub async fn list_listings(
    State(state): State<AppState>,
    ListParams(params): ListParams,
) -> Result<Json<ListEnvelope>, AppError> {
    let query = ListingQuery::from_params(&params)?;
    let envelope = state.service().list(&query).await?;

    tracing::debug!(
        total = envelope.pagination.total_count,
        from_cache = envelope.is_from_cache(),
        "Listings served"
    );

    Ok(Json(envelope))
}

/// GET /listings/{id}
#[instrument(skip_all, fields(id = %id))]
pub async fn get_listing(
    State(state): State<AppState>,
    ListingIdPath(id): ListingIdPath,
) -> Result<Json<RecordEnvelope<Listing>>, AppError> {
    Ok(Json(state.service().get_by_id(id).await?))
}

/// POST /listings
#[instrument(skip_all)]
pub async fn create_listing(
    State(state): State<AppState>,
    body: Result<Json<NewListing>, JsonRejection>,
) -> Result<(StatusCode, Json<RecordEnvelope<Listing>>), AppError> {
    let Json(listing) = body?;
    let created = state.service().create(listing).await?;

    tracing::info!(id = %created.id, owner = %created.owner_id, "Listing created");
    Ok((StatusCode::CREATED, Json(RecordEnvelope::new(created))))
}

/// PUT /listings/{id}
/// Partial update: only the fields present in the body change.
#[instrument(skip_all, fields(id = %id))]
pub async fn update_listing(
    State(state): State<AppState>,
    ListingIdPath(id): ListingIdPath,
    body: Result<Json<ListingPatch>, JsonRejection>,
) -> Result<Json<RecordEnvelope<Listing>>, AppError> {
    let Json(patch) = body?;
    if patch.is_empty() {
        return Err(AppError::BadRequest(
            "Update body must contain at least one field".to_string(),
        ));
    }

    let updated = state.service().update(id, patch).await?;

    tracing::info!(id = %id, "Listing updated");
    Ok(Json(RecordEnvelope::new(updated)))
}

/// DELETE /listings/{id}
#[instrument(skip_all, fields(id = %id))]
pub async fn delete_listing(
    State(state): State<AppState>,
    ListingIdPath(id): ListingIdPath,
) -> Result<Json<RecordEnvelope<Listing>>, AppError> {
    let deleted = state.service().delete(id).await?;

    tracing::info!(id = %id, "Listing deleted");
    Ok(Json(RecordEnvelope::new(deleted)))
}

/// GET /owners/{owner_id}/listings
#[instrument(skip_all, fields(owner = %owner))]
pub async fn list_owner_listings(
    State(state): State<AppState>,
    OwnerIdPath(owner): OwnerIdPath,
    ListParams(params): ListParams,
) -> Result<Json<ListEnvelope>, AppError> {
    let pagination = Pagination::from_params(&params)?;
    let sort = SortSpec::from_params(&params);

    Ok(Json(
        state
            .service()
            .list_by_owner(owner, &pagination, sort)
            .await?,
    ))
}

/// DELETE /owners/{owner_id}/listings
#[instrument(skip_all, fields(owner = %owner))]
pub async fn delete_owner_listings(
    State(state): State<AppState>,
    OwnerIdPath(owner): OwnerIdPath,
) -> Result<Json<DeleteSummary>, AppError> {
    let summary = state.service().delete_by_owner(owner).await?;

    tracing::info!(owner = %owner, deleted = summary.deleted, "Owner listings deleted");
    Ok(Json(summary))
}
