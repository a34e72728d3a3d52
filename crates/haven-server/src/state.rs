//! Application state.

use std::sync::Arc;

use haven_store::ListingStore;

use crate::cache::{CacheBackend, InvalidationCoordinator};
use crate::service::{CacheTtls, ListingService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    service: ListingService,
}

impl AppState {
    /// Creates a new AppState over the given store and cache backend.
    pub fn new(store: Arc<dyn ListingStore>, cache: Arc<dyn CacheBackend>, ttls: CacheTtls) -> Self {
        Self {
            service: ListingService::new(store, cache, ttls),
        }
    }

    /// Creates an AppState from an already assembled service.
    pub fn from_service(service: ListingService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &ListingService {
        &self.service
    }

    /// Returns a reference to the durable store.
    pub fn store(&self) -> &dyn ListingStore {
        self.service.store()
    }

    pub fn cache(&self) -> &dyn CacheBackend {
        self.service.cache()
    }

    pub fn invalidator(&self) -> &InvalidationCoordinator {
        self.service.invalidator()
    }
}
