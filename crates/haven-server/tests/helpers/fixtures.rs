//! Shared fixtures: sample listings, controllable backends and an app
//! wired over them.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use haven_core::{Listing, ListingId, ListingPatch, NewListing, OwnerId};
use haven_server::cache::{CacheBackend, CacheError, CacheKey, MokaBackend, MokaConfig};
use haven_server::{AppState, CacheTtls, create_router};
use haven_store::{InMemoryStore, ListingPredicate, ListingStore, StoreError, StoreQuery};

use super::client::TestClient;

/// Payload accepted by `POST /listings`.
pub fn new_listing(owner: OwnerId, city: &str, price: f64) -> NewListing {
    NewListing {
        owner_id: owner,
        title: format!("{} listing at {}", city, price),
        description: "Bright and quiet".to_string(),
        property_type: "Apartment".to_string(),
        price,
        state: "Texas".to_string(),
        city: city.to_string(),
        area_sq_ft: 980.0,
        bedrooms: 2,
        bathrooms: 2,
        amenities: "pool|gym|parking".to_string(),
        furnished: "Furnished".to_string(),
        available_from: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        listed_by: "Agent".to_string(),
        tags: "downtown|new".to_string(),
        color_theme: "#336699".to_string(),
        rating: 4.4,
        is_verified: true,
        listing_type: "rent".to_string(),
    }
}

/// Moka backend whose operations can be made to fail at runtime.
#[derive(Default)]
pub struct FlakyCache {
    inner: MokaBackendCell,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub fail_deletes: AtomicBool,
    pub puts: AtomicUsize,
}

/// Wrapper so `FlakyCache` can derive Default.
pub struct MokaBackendCell(MokaBackend);

impl Default for MokaBackendCell {
    fn default() -> Self {
        Self(MokaBackend::new(MokaConfig::default()))
    }
}

impl FlakyCache {
    /// Every operation fails.
    pub fn down() -> Self {
        let cache = Self::default();
        cache.fail_reads.store(true, Ordering::SeqCst);
        cache.fail_writes.store(true, Ordering::SeqCst);
        cache.fail_deletes.store(true, Ordering::SeqCst);
        cache
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheBackend for FlakyCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::unavailable("read refused"));
        }
        self.inner.0.get(key).await
    }

    async fn put(&self, key: &CacheKey, value: String, ttl: Duration) -> Result<(), CacheError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::unavailable("write refused"));
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.0.put(key, value, ttl).await
    }

    async fn delete(&self, key: &CacheKey) -> Result<(), CacheError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(CacheError::unavailable("delete refused"));
        }
        self.inner.0.delete(key).await
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(CacheError::unavailable("delete refused"));
        }
        self.inner.0.delete_by_prefix(prefix).await
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

/// Store that is always unreachable.
pub struct DownStore;

#[async_trait]
impl ListingStore for DownStore {
    async fn insert(&self, _listing: NewListing) -> Result<Listing, StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn find(&self, _query: &StoreQuery) -> Result<Vec<Listing>, StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn count(&self, _predicate: &ListingPredicate) -> Result<u64, StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn find_by_id(&self, _id: ListingId) -> Result<Option<Listing>, StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn update_by_id(
        &self,
        _id: ListingId,
        _patch: ListingPatch,
    ) -> Result<Option<Listing>, StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn delete_by_id(&self, _id: ListingId) -> Result<Option<Listing>, StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn delete_many(&self, _predicate: &ListingPredicate) -> Result<Vec<Listing>, StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }

    fn name(&self) -> &str {
        "down"
    }
}

/// An app over an in-memory store and a controllable cache.
pub struct TestApp {
    pub client: TestClient,
    pub store: Arc<InMemoryStore>,
    pub cache: Arc<FlakyCache>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(FlakyCache::default(), CacheTtls::default())
    }

    pub fn with_ttls(ttls: CacheTtls) -> Self {
        Self::build(FlakyCache::default(), ttls)
    }

    /// Cache that fails every operation.
    pub fn with_cache_down() -> Self {
        Self::build(FlakyCache::down(), CacheTtls::default())
    }

    fn build(cache: FlakyCache, ttls: CacheTtls) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let cache = Arc::new(cache);
        let state = AppState::new(store.clone(), cache.clone(), ttls);
        let service = state.service().clone();

        Self {
            client: TestClient::settling(create_router(state), service),
            store,
            cache,
        }
    }

    /// Inserts directly into the store, bypassing the API and invalidation.
    pub async fn insert(&self, listing: NewListing) -> Listing {
        self.store.insert(listing).await.unwrap()
    }
}

/// Client over an unreachable store.
pub fn down_store_client() -> TestClient {
    let state = AppState::new(
        Arc::new(DownStore),
        Arc::new(MokaBackend::new(MokaConfig::default())),
        CacheTtls::default(),
    );
    TestClient::new(create_router(state))
}
