//! Haven Server - HTTP listing query service
//!
//! Serves filtered, paginated listing queries through a read-through cache
//! in front of a [`haven_store::ListingStore`], and invalidates the affected
//! cache namespaces whenever a listing is created, updated or deleted.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use haven_server::{AppState, CacheTtls, create_router};
//! use haven_server::cache::{MokaBackend, MokaConfig};
//! use haven_store::InMemoryStore;
//!
//! let state = AppState::new(
//!     Arc::new(InMemoryStore::new()),
//!     Arc::new(MokaBackend::new(MokaConfig::default())),
//!     CacheTtls::default(),
//! );
//! let app = create_router(state);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod service;
pub mod state;

// Re-exports
pub use config::{ConfigError, ServerConfig};
pub use error::AppError;
pub use handlers::health::HealthResponse;
pub use server::{create_router, create_router_with_metrics, run_server};
pub use service::{CacheTtls, ListingService, ServiceError};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
