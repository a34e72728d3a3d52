//! Listing store trait definition.

use async_trait::async_trait;
use haven_core::{Listing, ListingId, ListingPatch, NewListing};

use super::{ListingPredicate, StoreQuery};
use crate::error::StoreError;

/// The durable record store.
///
/// This trait abstracts over the database holding listings, allowing the
/// server to query and mutate records without knowing the underlying storage.
/// Implementations are expected to serialize their own writes per record; the
/// server never wraps calls in cross-record transactions.
///
/// # Implementors
///
/// - `InMemoryStore` - Process-local map, used by the binary and tests
///
/// # Example
///
/// ```ignore
/// use haven_store::{ListingStore, ListingPredicate, StoreQuery, StoreError};
///
/// struct MyStore;
///
/// #[async_trait]
/// impl ListingStore for MyStore {
///     async fn find(&self, query: &StoreQuery) -> Result<Vec<Listing>, StoreError> {
///         // Implementation here
///     }
///     // ...
///     fn name(&self) -> &str {
///         "my-store"
///     }
/// }
/// ```
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Persists a new listing, assigning its id and timestamps.
    async fn insert(&self, listing: NewListing) -> Result<Listing, StoreError>;

    /// Returns the listings matching the query's predicate, sorted, then
    /// skipped and limited.
    async fn find(&self, query: &StoreQuery) -> Result<Vec<Listing>, StoreError>;

    /// Counts the listings matching the predicate (ignoring paging).
    async fn count(&self, predicate: &ListingPredicate) -> Result<u64, StoreError>;

    /// Looks up a listing by id.
    async fn find_by_id(&self, id: ListingId) -> Result<Option<Listing>, StoreError>;

    /// Applies a patch atomically and returns the updated listing, or `None`
    /// if no listing has that id.
    async fn update_by_id(
        &self,
        id: ListingId,
        patch: ListingPatch,
    ) -> Result<Option<Listing>, StoreError>;

    /// Deletes a listing and returns it, or `None` if no listing has that id.
    async fn delete_by_id(&self, id: ListingId) -> Result<Option<Listing>, StoreError>;

    /// Deletes every listing matching the predicate and returns the deleted
    /// listings. Matching and removal happen under one write.
    async fn delete_many(&self, predicate: &ListingPredicate) -> Result<Vec<Listing>, StoreError>;

    /// Verifies that the store is reachable.
    ///
    /// The default implementation always succeeds.
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Returns the name of this store, for logging and health reporting.
    fn name(&self) -> &str;
}
