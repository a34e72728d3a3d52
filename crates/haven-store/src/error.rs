//! Error types for listing stores.

use std::path::PathBuf;

/// Errors that can occur when talking to the durable store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store is not reachable or refused the operation.
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    /// A write conflicted with existing data (e.g. a duplicate id).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A timeout occurred while waiting for the store.
    #[error("operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a seed file.
    #[error("parse error in {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// Any other failure reported by the backing system.
    #[error("store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Creates a new unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout { .. })
    }
}
