//! Filter criteria: the typed predicate, its builder and its matcher.
//!
//! - [`FilterCriteria`]: closed set of dimensions (text, exact, range,
//!   boolean, date) with canonical values
//! - `builder`: raw request parameters into criteria (fails open)
//! - `matcher`: evaluation against a [`crate::Listing`]

mod builder;
mod criteria;
mod matcher;

pub use criteria::{Bounds, DateMatch, ExactField, FilterCriteria, RangeField, TextField};
