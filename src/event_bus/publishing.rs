//! Notification dispatch

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use serde_json::Value;

use super::core::EventBus;
use super::errors::{PluginError, panic_message};

impl EventBus {
    /// Deliver `data` to every subscriber of `event`, in registration order.
    ///
    /// A subscriber that errors or panics is logged and counted, and the
    /// remaining subscribers still run. Never panics and never returns an
    /// error to the publisher.
    ///
    /// # Arguments
    ///
    /// * `event` - Event name the subscribers registered under
    /// * `data` - Raw payload handed to each subscriber by reference
    ///
    /// # Returns
    ///
    /// The number of subscribers that completed without a fault. An empty
    /// name or an event with no subscribers is a no-op returning 0.
    ///
    /// # Examples
    /// ```
    /// # use kodegen_telemetry::event_bus::{EventBus, PluginError};
    /// # use serde_json::json;
    /// let bus = EventBus::new();
    /// bus.watch_fn("click", |_| Ok(()));
    /// bus.watch_fn("click", |_| Err(PluginError::other("bad payload")));
    ///
    /// assert_eq!(bus.notify("click", &json!({ "x": 1 })), 1);
    /// assert_eq!(bus.notify("", &json!({})), 0);
    /// ```
    pub fn notify(&self, event: &str, data: &Value) -> usize {
        if event.is_empty() {
            self.metrics.increment_unrouted();
            return 0;
        }

        // callbacks may watch or notify re-entrantly, so dispatch off a copy
        let subscribers = match self.subscribers.read().get(event) {
            Some(list) if !list.is_empty() => list.clone(),
            _ => {
                self.metrics.increment_unrouted();
                return 0;
            }
        };

        self.metrics.increment_notifications();
        let mut completed = 0;
        for subscriber in &subscribers {
            self.metrics.increment_deliveries();
            let outcome = catch_unwind(AssertUnwindSafe(|| (subscriber.callback)(data)));
            let fault = match outcome {
                Ok(Ok(())) => {
                    completed += 1;
                    continue;
                }
                Ok(Err(error)) => PluginError::SubscriberFailed {
                    event: event.to_string(),
                    subscriber: subscriber.name.clone(),
                    message: error.to_string(),
                },
                Err(payload) => PluginError::SubscriberPanicked {
                    event: event.to_string(),
                    subscriber: subscriber.name.clone(),
                    message: panic_message(payload.as_ref()),
                },
            };
            self.metrics.increment_faults();
            log::error!("{fault}");
        }
        completed
    }
}

/// Publisher handle given to a plugin's `monitor`
///
/// Cloneable and `'static`, so instrumentation installed by `monitor` can keep
/// it and publish long after activation returns.
#[derive(Clone, Debug)]
pub struct Notifier {
    bus: Arc<EventBus>,
}

impl Notifier {
    #[must_use]
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }

    /// Publish `data` under `event`; see [`EventBus::notify`].
    pub fn notify(&self, event: &str, data: Value) -> usize {
        self.bus.notify(event, &data)
    }

    /// Serialize `data` and publish it; serialization failures are logged.
    pub fn notify_serialize<T: serde::Serialize>(&self, event: &str, data: &T) -> usize {
        match serde_json::to_value(data) {
            Ok(value) => self.bus.notify(event, &value),
            Err(e) => {
                log::warn!("Dropping '{event}' notification: {e}");
                0
            }
        }
    }

    #[must_use]
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }
}
