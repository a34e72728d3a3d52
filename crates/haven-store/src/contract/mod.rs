//! Listing store abstraction.
//!
//! This module defines the core trait for durable stores and the query types
//! it accepts.

mod query;
mod traits;

pub use query::{ListingPredicate, StoreQuery};
pub use traits::ListingStore;
