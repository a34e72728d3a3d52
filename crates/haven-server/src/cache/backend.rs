//! Cache backend contract.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::cache::keys::CacheKey;

/// Error del backend de cache.
///
/// Callers never surface these to clients: a failed read is a miss and a
/// failed write or delete is logged and dropped.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("cache operation '{operation}' failed: {reason}")]
    Operation {
        operation: &'static str,
        reason: String,
    },
}

impl CacheError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    pub fn operation(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Operation {
            operation,
            reason: reason.into(),
        }
    }
}

/// A key/value store for serialized query results.
///
/// Values are opaque strings; entries must never be returned once their TTL
/// has elapsed. Any operation may fail.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the stored value, or `None` on a miss.
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheError>;

    /// Stores a value for at most `ttl`.
    async fn put(&self, key: &CacheKey, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Removes one entry. Removing an absent key is not an error.
    async fn delete(&self, key: &CacheKey) -> Result<(), CacheError>;

    /// Removes every entry whose key starts with `prefix`; returns how many.
    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize, CacheError>;

    /// Approximate number of live entries, if the backend can tell.
    fn entry_count(&self) -> Option<u64> {
        None
    }

    /// Backend name for logs and health output.
    fn name(&self) -> &str;
}

/// Backend that stores nothing. Every read is a miss.
///
/// Injected when caching is disabled in configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBackend;

#[async_trait]
impl CacheBackend for NoopBackend {
    async fn get(&self, _key: &CacheKey) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn put(&self, _key: &CacheKey, _value: String, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &CacheKey) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete_by_prefix(&self, _prefix: &str) -> Result<usize, CacheError> {
        Ok(0)
    }

    fn entry_count(&self) -> Option<u64> {
        Some(0)
    }

    fn name(&self) -> &str {
        "noop"
    }
}
