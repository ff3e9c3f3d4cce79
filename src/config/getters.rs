//! Accessors for `MonitorConfig`

use std::time::Duration;

use super::types::MonitorConfig;

impl MonitorConfig {
    #[must_use]
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }

    #[must_use]
    pub fn flush_interval_duration(&self) -> Duration {
        Duration::from_millis(self.flush_interval)
    }

    /// Whether `message` contains any configured ignore pattern
    #[must_use]
    pub fn is_ignored(&self, message: &str) -> bool {
        self.ignore_errors
            .iter()
            .any(|pattern| !pattern.is_empty() && message.contains(pattern.as_str()))
    }

    /// Whether a resource record of `transfer_size` bytes falls below the floor
    #[must_use]
    pub fn is_below_resource_limit(&self, transfer_size: f64) -> bool {
        self.resource_limit_size
            .is_some_and(|limit| transfer_size < limit as f64)
    }
}
