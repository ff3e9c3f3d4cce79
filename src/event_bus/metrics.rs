use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters for bus activity
#[derive(Debug, Clone, Default)]
pub struct BusMetrics {
    pub notifications: Arc<AtomicU64>,
    pub deliveries: Arc<AtomicU64>,
    pub subscriber_faults: Arc<AtomicU64>,
    pub unrouted: Arc<AtomicU64>,
}

impl BusMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_notifications(&self) {
        self.notifications.fetch_add(1, Ordering::SeqCst);
    }

    pub fn increment_deliveries(&self) {
        self.deliveries.fetch_add(1, Ordering::SeqCst);
    }

    pub fn increment_faults(&self) {
        self.subscriber_faults.fetch_add(1, Ordering::SeqCst);
    }

    pub fn increment_unrouted(&self) {
        self.unrouted.fetch_add(1, Ordering::SeqCst);
    }

    #[must_use]
    pub fn snapshot(&self) -> BusMetricsSnapshot {
        BusMetricsSnapshot {
            notifications: self.notifications.load(Ordering::SeqCst),
            deliveries: self.deliveries.load(Ordering::SeqCst),
            subscriber_faults: self.subscriber_faults.load(Ordering::SeqCst),
            unrouted: self.unrouted.load(Ordering::SeqCst),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusMetricsSnapshot {
    /// `notify` calls that reached at least one subscriber
    pub notifications: u64,
    /// Individual subscriber invocations, failed or not
    pub deliveries: u64,
    pub subscriber_faults: u64,
    /// `notify` calls dropped for an empty name or no subscribers
    pub unrouted: u64,
}
