//! Request extractors that resolve raw path and query input into domain types.

pub mod path;
pub mod query;

pub use path::{ListingIdPath, OwnerIdPath};
pub use query::ListParams;
