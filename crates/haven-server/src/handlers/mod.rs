//! HTTP handlers.

pub mod cache;
pub mod health;
pub mod listings;
pub mod metrics;
