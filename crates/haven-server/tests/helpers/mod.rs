//! Test helpers para haven-server.

#![allow(dead_code, unused_imports)]

pub mod assertions;
pub mod client;
pub mod fixtures;

pub use assertions::*;
pub use client::{TestClient, TestResponse};
pub use fixtures::{DownStore, FlakyCache, TestApp, down_store_client, new_listing};
