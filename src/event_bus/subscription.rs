//! Subscriber registration

use std::sync::Arc;

use serde_json::Value;

use super::core::EventBus;
use super::errors::PluginError;

/// Callback invoked with the data passed to `notify`
pub type SubscriberFn = Arc<dyn Fn(&Value) -> Result<(), PluginError> + Send + Sync>;

/// A named callback; the name identifies it in fault logs
#[derive(Clone)]
pub struct Subscriber {
    pub name: String,
    pub callback: SubscriberFn,
}

impl Subscriber {
    pub fn new<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&Value) -> Result<(), PluginError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            callback: Arc::new(callback),
        }
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber").field("name", &self.name).finish()
    }
}

impl EventBus {
    /// Append a subscriber under `event`.
    ///
    /// Repeated calls accumulate; every subscriber fires on each matching
    /// notification in registration order.
    pub fn watch(&self, event: impl Into<String>, subscriber: Subscriber) {
        let event = event.into();
        log::debug!("Subscriber '{}' watching '{}'", subscriber.name, event);
        self.subscribers.write().entry(event).or_default().push(subscriber);
    }

    /// Convenience for `watch` with an anonymous subscriber named after the event
    pub fn watch_fn<F>(&self, event: impl Into<String>, callback: F)
    where
        F: Fn(&Value) -> Result<(), PluginError> + Send + Sync + 'static,
    {
        let event = event.into();
        let subscriber = Subscriber::new(event.clone(), callback);
        self.watch(event, subscriber);
    }
}
