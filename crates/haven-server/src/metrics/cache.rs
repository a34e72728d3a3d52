//! Registro de metricas de cache.

use metrics::{counter, gauge, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Registra las metricas de cache.
pub fn register_cache_metrics() {
    metrics::describe_counter!("haven_cache_hits_total", "Total number of cache hits");
    metrics::describe_counter!("haven_cache_misses_total", "Total number of cache misses");
    metrics::describe_counter!(
        "haven_cache_errors_total",
        "Total number of failed cache operations"
    );
    metrics::describe_counter!(
        "haven_cache_invalidations_total",
        "Total number of cache entries removed by invalidation"
    );
    metrics::describe_counter!(
        "haven_cache_evictions_total",
        "Total number of cache evictions"
    );
    metrics::describe_gauge!("haven_cache_entries", "Current number of entries in cache");
    metrics::describe_histogram!(
        "haven_cache_operation_seconds",
        "Time spent on cache operations"
    );
}

/// Recorder de metricas de cache.
///
/// Los clones comparten los mismos contadores.
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    errors: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un cache hit en el namespace dado
    pub fn record_hit(&self, namespace: &'static str) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("haven_cache_hits_total", "namespace" => namespace).increment(1);
    }

    /// Registra un cache miss en el namespace dado
    pub fn record_miss(&self, namespace: &'static str) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("haven_cache_misses_total", "namespace" => namespace).increment(1);
    }

    /// Registra una operacion fallida (get, put, delete, delete_by_prefix, decode)
    pub fn record_error(&self, operation: &'static str) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        counter!("haven_cache_errors_total", "operation" => operation).increment(1);
    }

    /// Registra entries eliminadas por invalidacion
    pub fn record_invalidation(&self, scope: &'static str, removed: usize) {
        counter!("haven_cache_invalidations_total", "scope" => scope).increment(removed as u64);
    }

    /// Registra una eviction
    pub fn record_eviction(&self, reason: &'static str) {
        counter!("haven_cache_evictions_total", "reason" => reason).increment(1);
    }

    /// Actualiza el gauge de entries
    pub fn update_entry_count(&self, count: u64) {
        gauge!("haven_cache_entries").set(count as f64);
    }

    /// Registra la duracion de una operacion
    pub fn record_operation_duration(&self, operation: &'static str, duration: Duration) {
        histogram!("haven_cache_operation_seconds", "operation" => operation)
            .record(duration.as_secs_f64());
    }

    /// Calcula hit rate (para logging/debugging)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let misses = self.misses() as f64;
        let total = hits + misses;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }
}
