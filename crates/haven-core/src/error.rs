//! Error types for Haven.
//!
//! Only two families of errors ever reach a caller from the domain layer:
//! malformed input that the caller can correct, and lookups that found
//! nothing. Everything else (cache trouble, store trouble) is handled by the
//! layers that own those collaborators.
//!
//! # Example
//!
//! ```
//! use haven_core::{HavenError, ListingId, Result};
//!
//! fn parse(raw: &str) -> Result<ListingId> {
//!     raw.parse()
//! }
//!
//! let err = parse("not-an-id").unwrap_err();
//! assert!(err.is_invalid_input());
//! ```

use thiserror::Error;

/// Main error type for Haven domain operations.
#[derive(Debug, Error)]
pub enum HavenError {
    /// An identifier did not have the expected format.
    #[error("Invalid id '{value}': {reason}")]
    InvalidId {
        /// The raw value supplied by the caller
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// A request parameter was well-formed but outside the representable range.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name as it appears in the request
        name: String,
        /// Description of the problem
        message: String,
    },

    /// The id was valid but no listing matched it.
    #[error("Listing '{id}' not found")]
    NotFound {
        /// The id that was looked up
        id: String,
    },

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HavenError {
    /// Creates an InvalidId error.
    pub fn invalid_id(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidId {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates an InvalidParameter error.
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a NotFound error.
    pub fn not_found(id: impl ToString) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if the caller can fix the request and retry.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidId { .. } | Self::InvalidParameter { .. })
    }

    /// Returns true if the lookup found nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Type alias for Results with HavenError.
pub type Result<T> = std::result::Result<T, HavenError>;
