//! Invalidation of cached views after listing mutations.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use haven_core::{Listing, ListingId, OwnerId};
use serde::Serialize;
use tracing::{info, warn};

use crate::cache::backend::CacheBackend;
use crate::cache::keys::{CacheKey, KEY_ROOT, Namespace, NamespaceKind};
use crate::metrics::CacheMetrics;

/// Outcome of one invalidation.
///
/// Every step is attempted even if an earlier one failed; failures are
/// listed here rather than propagated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvalidationReport {
    /// Number of entries removed.
    pub removed: usize,
    /// Prefixes and keys touched, in order.
    pub scopes: Vec<String>,
    /// Scopes whose deletion failed, with the error.
    pub failures: Vec<String>,
}

impl InvalidationReport {
    /// True if every step succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for InvalidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "removed {} entries across {} scopes ({} failed)",
            self.removed,
            self.scopes.len(),
            self.failures.len()
        )
    }
}

/// Deletes the cache namespaces that may hold stale views of a mutated listing.
///
/// For each mutation, in order: the whole list namespace, the listing's own
/// entry, then the owner's namespace.
#[derive(Clone)]
pub struct InvalidationCoordinator {
    cache: Arc<dyn CacheBackend>,
    metrics: CacheMetrics,
}

impl InvalidationCoordinator {
    pub fn new(cache: Arc<dyn CacheBackend>, metrics: CacheMetrics) -> Self {
        Self { cache, metrics }
    }

    /// After a create. No record entry can exist for a fresh id.
    pub async fn listing_created(&self, listing: &Listing) -> InvalidationReport {
        let mut report = InvalidationReport::default();
        self.purge_prefix(Namespace::List, &mut report).await;
        self.purge_prefix(Namespace::Owner(listing.owner_id), &mut report).await;

        self.log(&report, "create", Some(listing.id));
        report
    }

    /// After an update or delete of one listing.
    pub async fn listing_changed(&self, listing: &Listing) -> InvalidationReport {
        let mut report = InvalidationReport::default();
        self.purge_prefix(Namespace::List, &mut report).await;
        self.purge_key(listing.id, &mut report).await;
        self.purge_prefix(Namespace::Owner(listing.owner_id), &mut report).await;

        self.log(&report, "change", Some(listing.id));
        report
    }

    /// After a bulk mutation. The list namespace and each owner namespace are
    /// purged once regardless of how many listings they held.
    pub async fn listings_changed(
        &self,
        ids: impl IntoIterator<Item = ListingId>,
        owners: impl IntoIterator<Item = OwnerId>,
    ) -> InvalidationReport {
        let mut report = InvalidationReport::default();
        self.purge_prefix(Namespace::List, &mut report).await;

        let ids: BTreeSet<ListingId> = ids.into_iter().collect();
        for id in &ids {
            self.purge_key(*id, &mut report).await;
        }

        let owners: BTreeSet<OwnerId> = owners.into_iter().collect();
        for owner in owners {
            self.purge_prefix(Namespace::Owner(owner), &mut report).await;
        }

        self.log(&report, "bulk", None);
        report
    }

    /// Flushes one namespace kind (all owners for [`NamespaceKind::Owner`]).
    pub async fn flush(&self, kind: NamespaceKind) -> InvalidationReport {
        let mut report = InvalidationReport::default();
        self.purge_raw(&kind.prefix(), kind.label(), &mut report).await;

        self.log(&report, kind.label(), None);
        report
    }

    /// Flushes every entry this service has written.
    pub async fn flush_all(&self) -> InvalidationReport {
        let mut report = InvalidationReport::default();
        self.purge_raw(&format!("{}:", KEY_ROOT), "all", &mut report).await;

        self.log(&report, "all", None);
        report
    }

    async fn purge_prefix(&self, namespace: Namespace, report: &mut InvalidationReport) {
        self.purge_raw(&namespace.prefix(), namespace.label(), report)
            .await;
    }

    async fn purge_raw(&self, prefix: &str, scope: &'static str, report: &mut InvalidationReport) {
        report.scopes.push(format!("{}*", prefix));
        match self.cache.delete_by_prefix(prefix).await {
            Ok(count) => {
                report.removed += count;
                self.metrics.record_invalidation(scope, count);
            },
            Err(e) => {
                warn!(prefix = %prefix, error = %e, "Cache prefix invalidation failed");
                self.metrics.record_error("delete_by_prefix");
                report.failures.push(format!("{}*: {}", prefix, e));
            },
        }
    }

    async fn purge_key(&self, id: ListingId, report: &mut InvalidationReport) {
        let key = CacheKey::record(id);
        report.scopes.push(key.to_string());
        match self.cache.delete(&key).await {
            Ok(()) => {
                // delete does not report whether the key existed
                self.metrics.record_invalidation("record", 1);
            },
            Err(e) => {
                warn!(key = %key, error = %e, "Cache key invalidation failed");
                self.metrics.record_error("delete");
                report.failures.push(format!("{}: {}", key, e));
            },
        }
    }

    fn log(&self, report: &InvalidationReport, trigger: &str, id: Option<ListingId>) {
        let id = id.map(|id| id.to_string()).unwrap_or_default();
        if report.is_complete() {
            info!(
                trigger = %trigger,
                listing_id = %id,
                removed = report.removed,
                scopes = report.scopes.len(),
                "Cache invalidated"
            );
        } else {
            warn!(
                trigger = %trigger,
                listing_id = %id,
                removed = report.removed,
                failures = ?report.failures,
                "Cache invalidation incomplete; stale entries expire by TTL"
            );
        }
    }
}
