//! Tracking of cache writes running in the background.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

#[derive(Default)]
struct Inner {
    in_flight: AtomicUsize,
    idle: Notify,
}

/// Counts spawned cache writes so callers can wait for them to settle.
#[derive(Clone, Default)]
pub struct PendingWrites {
    inner: Arc<Inner>,
}

impl PendingWrites {
    /// Registers a write. The write counts as finished when the guard drops.
    pub fn start(&self) -> PendingGuard {
        self.inner.in_flight.fetch_add(1, Ordering::SeqCst);
        PendingGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Resolves once no write is in flight.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.in_flight() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Marks one write as in flight until dropped.
pub struct PendingGuard {
    inner: Arc<Inner>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if self.inner.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}
