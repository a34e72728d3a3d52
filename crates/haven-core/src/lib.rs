//! Haven Core - Domain types for the listing query service
//!
//! This crate provides the pure, I/O-free building blocks shared by the
//! store and the server:
//!
//! - [`Listing`] records and their write-side counterparts
//! - [`FilterCriteria`], the canonical typed predicate built from raw query
//!   parameters
//! - [`Pagination`] and [`SortSpec`] with their clamping/fallback rules
//! - [`ListEnvelope`], the response shape returned to clients
//!
//! # Example
//!
//! ```
//! use haven_core::{ListingQuery, RawParams};
//!
//! let params = RawParams::from_pairs([("city", " Austin "), ("minPrice", "200000")]);
//! let query = ListingQuery::from_params(&params).unwrap();
//!
//! assert_eq!(query.pagination.page(), 1);
//! assert_eq!(query.pagination.limit(), 10);
//! assert!(!query.criteria.is_empty());
//! ```

pub mod envelope;
pub mod error;
pub mod filter;
pub mod listing;
pub mod params;
pub mod query;
pub mod types;

// Re-exports
pub use envelope::{AppliedFilters, ListEnvelope, PageInfo, RecordEnvelope};
pub use error::{HavenError, Result};
pub use filter::{Bounds, DateMatch, ExactField, FilterCriteria, RangeField, TextField};
pub use listing::{Listing, ListingPatch, NewListing};
pub use params::RawParams;
pub use query::{ListingQuery, MAX_LIMIT, Pagination, SortField, SortOrder, SortSpec};
pub use types::{ListingId, OwnerId};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
