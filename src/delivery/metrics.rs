use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Default)]
pub struct DeliveryMetrics {
    pub envelopes_sent: Arc<AtomicU64>,
    pub records_sent: Arc<AtomicU64>,
    pub failures: Arc<AtomicU64>,
}

impl DeliveryMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, records: usize) {
        self.envelopes_sent.fetch_add(1, Ordering::SeqCst);
        self.records_sent.fetch_add(records as u64, Ordering::SeqCst);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }

    #[must_use]
    pub fn snapshot(&self) -> DeliveryMetricsSnapshot {
        DeliveryMetricsSnapshot {
            envelopes_sent: self.envelopes_sent.load(Ordering::SeqCst),
            records_sent: self.records_sent.load(Ordering::SeqCst),
            failures: self.failures.load(Ordering::SeqCst),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryMetricsSnapshot {
    pub envelopes_sent: u64,
    pub records_sent: u64,
    pub failures: u64,
}
