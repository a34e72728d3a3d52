//! Cache module for the Haven listing service.
//!
//! This module provides the read-through cache layer: deterministic key
//! derivation, the backend contract with a Moka implementation, and the
//! coordinator that invalidates namespaces after mutations.

pub mod backend;
pub mod invalidation;
pub mod keys;
pub mod moka_backend;

// Re-exports
pub use backend::{CacheBackend, CacheError, NoopBackend};
pub use invalidation::{InvalidationCoordinator, InvalidationReport};
pub use keys::{CacheKey, KEY_ROOT, Namespace, NamespaceKind};
pub use moka_backend::{MokaBackend, MokaConfig};
