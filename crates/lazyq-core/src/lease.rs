//! Release-exactly-once accounting for externally owned iteration resources.
//!
//! A cursor wrapping a native iterator acquires a [`Lease`] when it opens the
//! resource. Dropping the lease (or calling `release`) returns it to the
//! tracker, so abandoning a cursor early still balances the books.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct TrackerInner {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

/// Counts leases handed out and returned.
#[derive(Clone, Default)]
pub struct LeaseTracker {
    inner: Arc<TrackerInner>,
}

impl LeaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, tag: &'static str) -> Lease {
        self.inner.acquired.fetch_add(1, Ordering::AcqRel);
        Lease {
            inner: Some(Arc::clone(&self.inner)),
            tag,
        }
    }

    pub fn acquired(&self) -> usize {
        self.inner.acquired.load(Ordering::Relaxed)
    }

    pub fn released(&self) -> usize {
        self.inner.released.load(Ordering::Relaxed)
    }

    /// Leases currently held (advisory).
    pub fn outstanding(&self) -> usize {
        self.acquired().saturating_sub(self.released())
    }
}

/// RAII handle for one open resource. Releases on drop, at most once.
pub struct Lease {
    inner: Option<Arc<TrackerInner>>,
    tag: &'static str,
}

impl Lease {
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn is_released(&self) -> bool {
        self.inner.is_none()
    }

    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if let Some(inner) = self.inner.take() {
            inner.released.fetch_add(1, Ordering::AcqRel);
        }
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.release_once();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_release_is_not_double_counted() {
        let tracker = LeaseTracker::new();
        let lease = tracker.acquire("test");
        assert_eq!(tracker.outstanding(), 1);
        lease.release();
        assert_eq!(tracker.released(), 1);
        assert_eq!(tracker.outstanding(), 0);
    }

    #[test]
    fn drop_releases() {
        let tracker = LeaseTracker::new();
        {
            let _a = tracker.acquire("a");
            let _b = tracker.acquire("b");
            assert_eq!(tracker.outstanding(), 2);
        }
        assert_eq!(tracker.acquired(), 2);
        assert_eq!(tracker.released(), 2);
    }
}
