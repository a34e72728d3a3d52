//! # Haven Store
//!
//! Durable record store contract for Haven listings.
//!
//! The store is the source of truth: the server's cache only ever holds
//! views of query results computed against it. This crate defines the
//! [`ListingStore`] trait the server consumes and ships an in-memory
//! implementation used by the binary and by tests.
//!
//! ## Example
//!
//! ```ignore
//! use haven_store::{InMemoryStore, ListingPredicate, ListingStore, StoreQuery};
//!
//! let store = InMemoryStore::new();
//! let created = store.insert(new_listing).await?;
//!
//! let query = StoreQuery::new(ListingPredicate::owned_by(created.owner_id));
//! let page = store.find(&query).await?;
//! ```

pub mod contract;
pub mod error;
pub mod memory;
pub mod seed;

// Re-exports
pub use contract::{ListingPredicate, ListingStore, StoreQuery};
pub use error::StoreError;
pub use memory::InMemoryStore;
pub use seed::{load_seed_file, seed_store};

// Re-export haven_core for consumers
pub use haven_core;
