//! Backend de cache en proceso usando Moka.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use moka::notification::RemovalCause;
use tracing::debug;

use crate::cache::backend::{CacheBackend, CacheError};
use crate::cache::keys::CacheKey;
use crate::metrics::CacheMetrics;

/// Configuracion del cache.
#[derive(Debug, Clone)]
pub struct MokaConfig {
    /// Maximo numero de entries (default: 10000)
    pub max_capacity: u64,
}

impl Default for MokaConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    payload: Arc<str>,
    ttl: Duration,
}

/// Cada entry expira tras el TTL con el que fue escrita.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Cache de resultados usando Moka.
/// Thread-safe y async-friendly.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use haven_server::cache::{CacheBackend, CacheKey, MokaBackend, MokaConfig, Namespace};
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache = MokaBackend::new(MokaConfig::default());
/// let key = CacheKey::derive(&Namespace::List, [("city", "Austin")]);
///
/// cache.put(&key, "{}".to_string(), Duration::from_secs(300)).await.unwrap();
/// assert!(cache.get(&key).await.unwrap().is_some());
/// # }
/// ```
#[derive(Clone)]
pub struct MokaBackend {
    inner: Cache<String, Entry>,
    metrics: CacheMetrics,
}

impl MokaBackend {
    /// Crea un nuevo cache con la configuracion dada.
    pub fn new(config: MokaConfig) -> Self {
        let metrics = CacheMetrics::new();

        // Configurar listener para evictions
        let eviction_metrics = metrics.clone();
        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .eviction_listener(move |_key, _value, cause| {
                let reason = match cause {
                    RemovalCause::Expired => "ttl",
                    RemovalCause::Size => "capacity",
                    RemovalCause::Explicit => "manual",
                    RemovalCause::Replaced => "replaced",
                };
                eviction_metrics.record_eviction(reason);
            })
            .build();

        Self { inner, metrics }
    }

    /// Actualiza el gauge de entry count.
    fn update_entry_gauge(&self) {
        self.metrics.update_entry_count(self.inner.entry_count());
    }

    /// Fuerza la limpieza de entries expiradas e invalidadas.
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }
}

#[async_trait]
impl CacheBackend for MokaBackend {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheError> {
        let start = Instant::now();
        let result = self.inner.get(key.as_str()).await;

        self.metrics.record_operation_duration("get", start.elapsed());
        Ok(result.map(|entry| entry.payload.to_string()))
    }

    async fn put(&self, key: &CacheKey, value: String, ttl: Duration) -> Result<(), CacheError> {
        let start = Instant::now();
        let entry = Entry {
            payload: Arc::from(value),
            ttl,
        };
        self.inner.insert(key.as_str().to_string(), entry).await;

        self.metrics.record_operation_duration("put", start.elapsed());
        self.update_entry_gauge();
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.inner.invalidate(key.as_str()).await;
        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        let start = Instant::now();

        // Snapshot de las keys que coinciden; entries pueden cambiar durante iteracion
        let matching: Vec<Arc<String>> = self
            .inner
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key)
            .collect();

        let count = matching.len();
        for key in matching {
            self.inner.invalidate(key.as_str()).await;
        }

        debug!(prefix = %prefix, count = count, "Cache entries removed by prefix");
        self.metrics
            .record_operation_duration("delete_by_prefix", start.elapsed());
        self.update_entry_gauge();
        Ok(count)
    }

    fn entry_count(&self) -> Option<u64> {
        Some(self.inner.entry_count())
    }

    fn name(&self) -> &str {
        "moka"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::keys::Namespace;
    use haven_core::{ListingId, OwnerId, Pagination, SortSpec};

    fn backend() -> MokaBackend {
        MokaBackend::new(MokaConfig::default())
    }

    fn list_key(city: &str) -> CacheKey {
        CacheKey::derive(&Namespace::List, [("city", city)])
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let cache = backend();
        let key = list_key("Austin");

        cache
            .put(&key, "payload".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some("payload"));
    }

    #[tokio::test]
    async fn test_miss_returns_none() {
        let cache = backend();
        assert!(cache.get(&list_key("Nowhere")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_entry_expires_after_its_ttl() {
        let cache = backend();
        let short = list_key("Austin");
        let long = list_key("Dallas");

        cache
            .put(&short, "a".to_string(), Duration::from_millis(50))
            .await
            .unwrap();
        cache
            .put(&long, "b".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(cache.get(&short).await.unwrap().is_none());
        assert!(cache.get(&long).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_overwrite_resets_ttl() {
        let cache = backend();
        let key = list_key("Austin");

        cache
            .put(&key, "old".to_string(), Duration::from_millis(50))
            .await
            .unwrap();
        cache
            .put(&key, "new".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_delete_removes_entry() {
        let cache = backend();
        let key = CacheKey::record(ListingId::generate());

        cache
            .put(&key, "x".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        cache.delete(&key).await.unwrap();

        assert!(cache.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_by_prefix_only_touches_namespace() {
        let cache = backend();
        let owner = OwnerId::generate();
        let other_owner = OwnerId::generate();
        let ttl = Duration::from_secs(60);

        for city in ["Austin", "Dallas", "Houston"] {
            cache.put(&list_key(city), city.to_string(), ttl).await.unwrap();
        }
        let record = CacheKey::record(ListingId::generate());
        let owned = CacheKey::owner(owner, &Pagination::default(), &SortSpec::default());
        let other = CacheKey::owner(other_owner, &Pagination::default(), &SortSpec::default());
        cache.put(&record, "r".to_string(), ttl).await.unwrap();
        cache.put(&owned, "o".to_string(), ttl).await.unwrap();
        cache.put(&other, "o2".to_string(), ttl).await.unwrap();

        let removed = cache
            .delete_by_prefix(&Namespace::List.prefix())
            .await
            .unwrap();
        assert_eq!(removed, 3);
        assert!(cache.get(&list_key("Austin")).await.unwrap().is_none());
        assert!(cache.get(&record).await.unwrap().is_some());

        let removed = cache
            .delete_by_prefix(&Namespace::Owner(owner).prefix())
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(cache.get(&owned).await.unwrap().is_none());
        assert!(cache.get(&other).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_concurrent_puts_and_gets() {
        let cache = backend();
        let ttl = Duration::from_secs(60);

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let cache = cache.clone();
                tokio::spawn(async move {
                    let key = list_key(&format!("city-{}", i));
                    cache.put(&key, i.to_string(), ttl).await.unwrap();
                    cache.get(&key).await.unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await.unwrap(), Some(i.to_string()));
        }

        cache.sync().await;
        assert_eq!(cache.entry_count(), Some(50));
    }
}
