//! Cache-first listing reads and invalidating writes.

use std::sync::Arc;
use std::time::Duration;

use haven_core::{
    AppliedFilters, FilterCriteria, HavenError, ListEnvelope, Listing, ListingId, ListingPatch,
    ListingQuery, NewListing, OwnerId, PageInfo, Pagination, RecordEnvelope, SortSpec,
};
use haven_store::{ListingPredicate, ListingStore, StoreError, StoreQuery};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::pending::PendingWrites;
use crate::cache::{CacheBackend, CacheKey, InvalidationCoordinator, Namespace};
use crate::metrics::CacheMetrics;

/// Time-to-live per namespace.
///
/// Single records live longest, owner-scoped lists shortest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub list: Duration,
    pub record: Duration,
    pub owner: Duration,
}

impl CacheTtls {
    /// True if `record > list > owner`.
    pub fn is_ordered(&self) -> bool {
        self.record > self.list && self.list > self.owner
    }
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            list: Duration::from_secs(300),
            record: Duration::from_secs(600),
            owner: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Invalid input or missing listing.
    #[error(transparent)]
    Domain(#[from] HavenError),

    /// The durable store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_not_found())
    }
}

/// Result of a bulk delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteSummary {
    pub success: bool,
    pub deleted: u64,
}

/// Serves listing queries from the cache when possible and from the store
/// otherwise, and invalidates the cache after every write.
#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn ListingStore>,
    cache: Arc<dyn CacheBackend>,
    invalidator: InvalidationCoordinator,
    ttls: CacheTtls,
    metrics: CacheMetrics,
    pending: PendingWrites,
}

impl ListingService {
    pub fn new(store: Arc<dyn ListingStore>, cache: Arc<dyn CacheBackend>, ttls: CacheTtls) -> Self {
        let metrics = CacheMetrics::new();
        Self {
            invalidator: InvalidationCoordinator::new(Arc::clone(&cache), metrics.clone()),
            store,
            cache,
            ttls,
            metrics,
            pending: PendingWrites::default(),
        }
    }

    pub fn store(&self) -> &dyn ListingStore {
        self.store.as_ref()
    }

    pub fn cache(&self) -> &dyn CacheBackend {
        self.cache.as_ref()
    }

    pub fn invalidator(&self) -> &InvalidationCoordinator {
        &self.invalidator
    }

    pub fn ttls(&self) -> CacheTtls {
        self.ttls
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Cache writes spawned by reads that have not finished yet.
    pub fn pending_writes(&self) -> &PendingWrites {
        &self.pending
    }

    /// Waits until every spawned cache write has finished.
    pub async fn wait_for_cache_writes(&self) {
        self.pending.wait_idle().await;
    }

    /// One page of listings matching the query.
    #[instrument(skip_all, fields(filters = %query.criteria))]
    pub async fn list(&self, query: &ListingQuery) -> Result<ListEnvelope, ServiceError> {
        let key = CacheKey::list(query);
        if let Some(cached) = self.lookup::<ListEnvelope>(&key, Namespace::List).await {
            return Ok(cached.served_from_cache());
        }

        let predicate = ListingPredicate::new(query.criteria.clone());
        let applied = AppliedFilters::new(&query.criteria, &query.sort);
        let envelope = self
            .fetch_page(predicate, &query.pagination, query.sort, applied)
            .await?;

        self.populate(&key, &envelope, self.ttls.list);
        Ok(envelope)
    }

    /// A single listing by id.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: ListingId) -> Result<RecordEnvelope<Listing>, ServiceError> {
        let key = CacheKey::record(id);
        if let Some(cached) = self
            .lookup::<RecordEnvelope<Listing>>(&key, Namespace::Record)
            .await
        {
            return Ok(cached.served_from_cache());
        }

        let listing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| HavenError::not_found(id))?;
        let envelope = RecordEnvelope::new(listing);

        self.populate(&key, &envelope, self.ttls.record);
        Ok(envelope)
    }

    /// One page of an owner's listings.
    #[instrument(skip(self, pagination, sort))]
    pub async fn list_by_owner(
        &self,
        owner: OwnerId,
        pagination: &Pagination,
        sort: SortSpec,
    ) -> Result<ListEnvelope, ServiceError> {
        let key = CacheKey::owner(owner, pagination, &sort);
        let namespace = Namespace::Owner(owner);
        if let Some(cached) = self.lookup::<ListEnvelope>(&key, namespace).await {
            return Ok(cached.served_from_cache());
        }

        let predicate = ListingPredicate::owned_by(owner);
        let applied =
            AppliedFilters::new(&FilterCriteria::new(), &sort).with("ownerId", owner.to_string());
        let envelope = self.fetch_page(predicate, pagination, sort, applied).await?;

        self.populate(&key, &envelope, self.ttls.owner);
        Ok(envelope)
    }

    /// Inserts a listing and invalidates the list and owner namespaces.
    #[instrument(skip_all, fields(owner = %listing.owner_id))]
    pub async fn create(&self, listing: NewListing) -> Result<Listing, ServiceError> {
        let created = self.store.insert(listing).await?;
        self.invalidator.listing_created(&created).await;
        Ok(created)
    }

    /// Applies a partial update.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: ListingId, patch: ListingPatch) -> Result<Listing, ServiceError> {
        let updated = self
            .store
            .update_by_id(id, patch)
            .await?
            .ok_or_else(|| HavenError::not_found(id))?;

        self.invalidator.listing_changed(&updated).await;
        Ok(updated)
    }

    /// Deletes a listing and returns it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ListingId) -> Result<Listing, ServiceError> {
        let deleted = self
            .store
            .delete_by_id(id)
            .await?
            .ok_or_else(|| HavenError::not_found(id))?;

        self.invalidator.listing_changed(&deleted).await;
        Ok(deleted)
    }

    /// Deletes every listing of an owner.
    #[instrument(skip(self))]
    pub async fn delete_by_owner(&self, owner: OwnerId) -> Result<DeleteSummary, ServiceError> {
        let deleted = self
            .store
            .delete_many(&ListingPredicate::owned_by(owner))
            .await?;

        if !deleted.is_empty() {
            self.invalidator
                .listings_changed(deleted.iter().map(|l| l.id), [owner])
                .await;
        }

        Ok(DeleteSummary {
            success: true,
            deleted: deleted.len() as u64,
        })
    }

    async fn fetch_page(
        &self,
        predicate: ListingPredicate,
        pagination: &Pagination,
        sort: SortSpec,
        applied: AppliedFilters,
    ) -> Result<ListEnvelope, ServiceError> {
        let query = StoreQuery::new(predicate).sorted(sort).paged(pagination);

        let (data, total) = tokio::try_join!(
            self.store.find(&query),
            self.store.count(query.predicate())
        )?;

        Ok(ListEnvelope::new(
            data,
            PageInfo::compute(pagination, total),
            applied,
        ))
    }

    /// Reads and decodes a cached value. Backend failures and undecodable
    /// payloads are misses.
    async fn lookup<T: DeserializeOwned>(&self, key: &CacheKey, namespace: Namespace) -> Option<T> {
        let label = namespace.label();
        let payload = match self.cache.get(key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!(key = %key, "Cache miss");
                self.metrics.record_miss(label);
                return None;
            },
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed; serving from store");
                self.metrics.record_error("get");
                self.metrics.record_miss(label);
                return None;
            },
        };

        match serde_json::from_str(&payload) {
            Ok(value) => {
                debug!(key = %key, "Cache hit");
                self.metrics.record_hit(label);
                Some(value)
            },
            Err(e) => {
                warn!(key = %key, error = %e, "Cached payload could not be decoded");
                self.metrics.record_error("decode");
                self.metrics.record_miss(label);
                None
            },
        }
    }

    /// Encodes the value and hands the write to a background task; the
    /// caller never waits on the backend. Failures are logged and dropped.
    fn populate<T: Serialize>(&self, key: &CacheKey, value: &T, ttl: Duration) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key = %key, error = %e, "Response could not be encoded for caching");
                self.metrics.record_error("encode");
                return;
            },
        };

        let cache = Arc::clone(&self.cache);
        let metrics = self.metrics.clone();
        let key = key.clone();
        let guard = self.pending.start();

        tokio::spawn(async move {
            if let Err(e) = cache.put(&key, payload, ttl).await {
                warn!(key = %key, error = %e, "Cache write failed");
                metrics.record_error("put");
            }
            drop(guard);
        });
    }
}
