//! Seed file loading.
//!
//! A seed file is a JSON array of listing payloads in the same shape the
//! create endpoint accepts. Ids and timestamps are assigned on insert.

use std::path::Path;

use haven_core::NewListing;
use tracing::{debug, info};

use crate::contract::ListingStore;
use crate::error::StoreError;

/// Reads and parses a seed file.
pub async fn load_seed_file(path: impl AsRef<Path>) -> Result<Vec<NewListing>, StoreError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Reading seed file");

    let content = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&content).map_err(|e| StoreError::parse(path, e.to_string()))
}

/// Inserts every seed listing into the store; returns how many were inserted.
pub async fn seed_store(
    store: &dyn ListingStore,
    listings: Vec<NewListing>,
) -> Result<usize, StoreError> {
    let total = listings.len();
    for listing in listings {
        store.insert(listing).await?;
    }

    info!(store = store.name(), count = total, "Store seeded");
    Ok(total)
}
