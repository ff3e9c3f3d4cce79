use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::record::EventRecord;

/// Records awaiting batch delivery plus the single pending flush timer
#[derive(Debug, Default)]
pub struct ReportBuffer {
    records: Mutex<Vec<EventRecord>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl ReportBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: EventRecord) {
        self.records.lock().push(record);
    }

    /// Copy of the buffered records in arrival order
    #[must_use]
    pub fn snapshot(&self) -> Vec<EventRecord> {
        self.records.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Take every record, but only if at least `threshold` are buffered
    pub fn drain_if_at_least(&self, threshold: usize) -> Option<Vec<EventRecord>> {
        let mut records = self.records.lock();
        if records.is_empty() || records.len() < threshold {
            return None;
        }
        Some(std::mem::take(&mut *records))
    }

    pub fn drain_all(&self) -> Vec<EventRecord> {
        std::mem::take(&mut *self.records.lock())
    }

    /// Install a new flush timer, aborting the one it replaces
    pub fn replace_timer(&self, timer: JoinHandle<()>) {
        if let Some(previous) = self.timer.lock().replace(timer) {
            previous.abort();
        }
    }

    pub fn cancel_timer(&self) {
        if let Some(timer) = self.timer.lock().take() {
            timer.abort();
        }
    }

    #[must_use]
    pub fn has_pending_timer(&self) -> bool {
        self.timer
            .lock()
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }
}
