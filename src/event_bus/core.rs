//! Core EventBus struct definition and constructors

use std::collections::HashMap;

use parking_lot::RwLock;

use super::metrics::BusMetrics;
use super::subscription::Subscriber;

/// Name-keyed subscriber registry with synchronous dispatch
pub struct EventBus {
    pub(super) subscribers: RwLock<HashMap<String, Vec<Subscriber>>>,
    pub(super) metrics: BusMetrics,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            metrics: BusMetrics::new(),
        }
    }

    #[must_use]
    pub fn metrics(&self) -> &BusMetrics {
        &self.metrics
    }

    /// Number of subscribers registered under `event`
    #[must_use]
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.subscribers.read().get(event).map_or(0, Vec::len)
    }

    /// Registered event names
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.subscribers.read().keys().cloned().collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subscribers = self.subscribers.read();
        let counts: HashMap<&str, usize> = subscribers
            .iter()
            .map(|(name, list)| (name.as_str(), list.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("subscribers", &counts)
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}
