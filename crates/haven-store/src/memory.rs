//! In-memory listing store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use haven_core::{Listing, ListingId, ListingPatch, NewListing};
use parking_lot::RwLock;
use tracing::debug;

use crate::contract::{ListingPredicate, ListingStore, StoreQuery};
use crate::error::StoreError;

/// A process-local [`ListingStore`].
///
/// Each operation takes the lock once, so single-record writes are atomic
/// and reads never observe a half-applied patch.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    listings: RwLock<HashMap<ListingId, Listing>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with existing listings (ids preserved).
    pub fn with_listings(listings: impl IntoIterator<Item = Listing>) -> Result<Self, StoreError> {
        let store = Self::new();
        for listing in listings {
            store.insert_existing(listing)?;
        }
        Ok(store)
    }

    /// Inserts a fully formed listing, keeping its id and timestamps.
    pub fn insert_existing(&self, listing: Listing) -> Result<(), StoreError> {
        let mut listings = self.listings.write();
        if listings.contains_key(&listing.id) {
            return Err(StoreError::Conflict(format!(
                "listing {} already exists",
                listing.id
            )));
        }
        listings.insert(listing.id, listing);
        Ok(())
    }

    /// Number of stored listings.
    pub fn len(&self) -> usize {
        self.listings.read().len()
    }

    /// Returns true if the store holds no listings.
    pub fn is_empty(&self) -> bool {
        self.listings.read().is_empty()
    }
}

#[async_trait]
impl ListingStore for InMemoryStore {
    async fn insert(&self, listing: NewListing) -> Result<Listing, StoreError> {
        let listing = listing.into_listing(ListingId::generate(), Utc::now());
        self.insert_existing(listing.clone())?;

        debug!(id = %listing.id, owner = %listing.owner_id, "Listing inserted");
        Ok(listing)
    }

    async fn find(&self, query: &StoreQuery) -> Result<Vec<Listing>, StoreError> {
        let mut matching: Vec<Listing> = self
            .listings
            .read()
            .values()
            .filter(|l| query.predicate().matches(l))
            .cloned()
            .collect();

        let sort = query.sort();
        matching.sort_by(|a, b| sort.compare(a, b));

        let skip = usize::try_from(query.skip()).unwrap_or(usize::MAX);
        let limit = query
            .limit()
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        Ok(matching.into_iter().skip(skip).take(limit).collect())
    }

    async fn count(&self, predicate: &ListingPredicate) -> Result<u64, StoreError> {
        let count = self
            .listings
            .read()
            .values()
            .filter(|l| predicate.matches(l))
            .count();
        Ok(count as u64)
    }

    async fn find_by_id(&self, id: ListingId) -> Result<Option<Listing>, StoreError> {
        Ok(self.listings.read().get(&id).cloned())
    }

    async fn update_by_id(
        &self,
        id: ListingId,
        patch: ListingPatch,
    ) -> Result<Option<Listing>, StoreError> {
        let mut listings = self.listings.write();
        let Some(listing) = listings.get_mut(&id) else {
            return Ok(None);
        };

        patch.apply(listing, Utc::now());
        debug!(id = %id, "Listing updated");
        Ok(Some(listing.clone()))
    }

    async fn delete_by_id(&self, id: ListingId) -> Result<Option<Listing>, StoreError> {
        let removed = self.listings.write().remove(&id);
        if removed.is_some() {
            debug!(id = %id, "Listing deleted");
        }
        Ok(removed)
    }

    async fn delete_many(&self, predicate: &ListingPredicate) -> Result<Vec<Listing>, StoreError> {
        let mut listings = self.listings.write();
        let ids: Vec<ListingId> = listings
            .values()
            .filter(|l| predicate.matches(l))
            .map(|l| l.id)
            .collect();
        let removed: Vec<Listing> = ids.iter().filter_map(|id| listings.remove(id)).collect();

        debug!(deleted = removed.len(), "Listings deleted by predicate");
        Ok(removed)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use haven_core::{FilterCriteria, OwnerId, Pagination, SortField, SortOrder, SortSpec, TextField};

    fn new_listing(owner: OwnerId, city: &str, price: f64) -> NewListing {
        NewListing {
            owner_id: owner,
            title: format!("{} {}", city, price),
            description: String::new(),
            property_type: "Condo".to_string(),
            price,
            state: "Texas".to_string(),
            city: city.to_string(),
            area_sq_ft: 1000.0,
            bedrooms: 2,
            bathrooms: 2,
            amenities: String::new(),
            furnished: "Furnished".to_string(),
            available_from: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            listed_by: "Builder".to_string(),
            tags: String::new(),
            color_theme: String::new(),
            rating: 4.0,
            is_verified: true,
            listing_type: "sale".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_by_id() {
        let store = InMemoryStore::new();
        let created = store
            .insert(new_listing(OwnerId::generate(), "Austin", 1.0))
            .await
            .unwrap();

        let found = store.find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_find_filters_sorts_and_pages() {
        let store = InMemoryStore::new();
        let owner = OwnerId::generate();
        for price in [300.0, 100.0, 500.0, 200.0, 400.0] {
            store.insert(new_listing(owner, "Austin", price)).await.unwrap();
        }
        store.insert(new_listing(owner, "Dallas", 50.0)).await.unwrap();

        let predicate =
            ListingPredicate::new(FilterCriteria::new().with_text(TextField::City, "austin"));
        let query = StoreQuery::new(predicate.clone())
            .sorted(SortSpec::new(SortField::Price, SortOrder::Asc))
            .paged(&Pagination::new(2, 2).unwrap());

        let page = store.find(&query).await.unwrap();
        let prices: Vec<f64> = page.iter().map(|l| l.price).collect();

        assert_eq!(prices, vec![300.0, 400.0]);
        assert_eq!(store.count(&predicate).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_owner_scope() {
        let store = InMemoryStore::new();
        let alice = OwnerId::generate();
        let bob = OwnerId::generate();
        store.insert(new_listing(alice, "Austin", 1.0)).await.unwrap();
        store.insert(new_listing(bob, "Austin", 2.0)).await.unwrap();

        let count = store.count(&ListingPredicate::owned_by(alice)).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let store = InMemoryStore::new();
        let result = store
            .update_by_id(ListingId::generate(), ListingPatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_applies_patch() {
        let store = InMemoryStore::new();
        let created = store
            .insert(new_listing(OwnerId::generate(), "Austin", 1.0))
            .await
            .unwrap();

        let patch = ListingPatch {
            city: Some("Houston".to_string()),
            ..Default::default()
        };
        let updated = store.update_by_id(created.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.city, "Houston");
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(store.find_by_id(created.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_delete_and_delete_many() {
        let store = InMemoryStore::new();
        let alice = OwnerId::generate();
        let bob = OwnerId::generate();
        let first = store.insert(new_listing(alice, "Austin", 1.0)).await.unwrap();
        store.insert(new_listing(alice, "Austin", 2.0)).await.unwrap();
        store.insert(new_listing(bob, "Austin", 3.0)).await.unwrap();

        let removed = store.delete_by_id(first.id).await.unwrap();
        assert_eq!(removed.map(|l| l.id), Some(first.id));
        assert!(store.delete_by_id(first.id).await.unwrap().is_none());

        let deleted = store
            .delete_many(&ListingPredicate::owned_by(alice))
            .await
            .unwrap();
        assert_eq!(deleted.len(), 1);
        assert!(deleted.iter().all(|l| l.owner_id == alice));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_existing_listing_conflicts() {
        let store = InMemoryStore::new();
        let listing = new_listing(OwnerId::generate(), "Austin", 1.0)
            .into_listing(ListingId::generate(), Utc::now());

        store.insert_existing(listing.clone()).unwrap();
        let err = store.insert_existing(listing).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
