//! Haven listing service binary.

use std::sync::Arc;

use anyhow::Context;
use haven_server::cache::{CacheBackend, MokaBackend, MokaConfig, NoopBackend};
use haven_server::{AppState, ServerConfig, metrics::init_metrics, run_server};
use haven_store::{InMemoryStore, ListingStore, load_seed_file, seed_store};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load().context("failed to load configuration")?;
    let addr = config.socket_addr()?;

    tracing::info!("Starting Haven listing service v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn ListingStore> = Arc::new(InMemoryStore::new());
    if let Some(path) = &config.store.seed_path {
        let listings = load_seed_file(path)
            .await
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        seed_store(store.as_ref(), listings).await?;
    }

    let cache: Arc<dyn CacheBackend> = if config.cache.enabled {
        Arc::new(MokaBackend::new(MokaConfig {
            max_capacity: config.cache.max_capacity,
        }))
    } else {
        tracing::warn!("Cache disabled; every read goes to the store");
        Arc::new(NoopBackend)
    };

    tracing::info!(
        store = store.name(),
        cache = cache.name(),
        list_ttl_secs = config.cache.list_ttl_secs,
        record_ttl_secs = config.cache.record_ttl_secs,
        owner_ttl_secs = config.cache.owner_ttl_secs,
        "Backends initialized"
    );

    let state = AppState::new(store, cache, config.ttls());
    let prometheus_handle = init_metrics().context("failed to install metrics recorder")?;

    run_server(addr, state, prometheus_handle).await?;

    Ok(())
}
