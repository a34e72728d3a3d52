//! Listing service: the read-through cache in front of the durable store.

mod listing;
mod pending;

pub use listing::{CacheTtls, DeleteSummary, ListingService, ServiceError};
pub use pending::{PendingGuard, PendingWrites};
