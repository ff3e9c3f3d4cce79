use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters for the send pipeline
#[derive(Debug, Clone, Default)]
pub struct ReportMetrics {
    pub dispatched: Arc<AtomicU64>,
    pub buffered: Arc<AtomicU64>,
    pub batches_flushed: Arc<AtomicU64>,
    pub duplicates: Arc<AtomicU64>,
    pub ignored: Arc<AtomicU64>,
    pub below_limit: Arc<AtomicU64>,
    pub cancelled: Arc<AtomicU64>,
    pub missing_url: Arc<AtomicU64>,
}

impl ReportMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::SeqCst);
    }

    #[must_use]
    pub fn snapshot(&self) -> ReportMetricsSnapshot {
        ReportMetricsSnapshot {
            dispatched: self.dispatched.load(Ordering::SeqCst),
            buffered: self.buffered.load(Ordering::SeqCst),
            batches_flushed: self.batches_flushed.load(Ordering::SeqCst),
            duplicates: self.duplicates.load(Ordering::SeqCst),
            ignored: self.ignored.load(Ordering::SeqCst),
            below_limit: self.below_limit.load(Ordering::SeqCst),
            cancelled: self.cancelled.load(Ordering::SeqCst),
            missing_url: self.missing_url.load(Ordering::SeqCst),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportMetricsSnapshot {
    /// Records sent on the immediate path
    pub dispatched: u64,
    /// Records accepted into the buffer
    pub buffered: u64,
    /// Batch envelopes handed to delivery by the debounce timer or teardown
    pub batches_flushed: u64,
    pub duplicates: u64,
    pub ignored: u64,
    pub below_limit: u64,
    pub cancelled: u64,
    pub missing_url: u64,
}
