use serde_json::Value;

use super::descriptor::{Plugin, passthrough_record};
use super::guard::InstrumentationGuard;
use crate::client::Client;
use crate::event_bus::{Notifier, PluginError};
use crate::record::{EventKind, EventRecord};

type MonitorFn =
    Box<dyn Fn(Notifier) -> Result<Option<InstrumentationGuard>, PluginError> + Send + Sync>;
type TransformFn =
    Box<dyn Fn(&Client, &Value) -> Result<Option<EventRecord>, PluginError> + Send + Sync>;
type ConsumeFn = Box<dyn Fn(&Client, EventRecord) -> Result<(), PluginError> + Send + Sync>;

/// Plugin assembled from closures
///
/// ```
/// # use kodegen_telemetry::plugin::{FnPlugin, PluginKind};
/// let plugin = FnPlugin::new("custom-event", PluginKind::Custom)
///     .on_monitor(|notifier| {
///         notifier.notify("custom-event", serde_json::json!({ "msg": "ready" }));
///         Ok(None)
///     })
///     .on_consume(|client, record| {
///         let _ = client.report().dispatch(record, true);
///         Ok(())
///     });
/// # let _ = plugin;
/// ```
pub struct FnPlugin {
    name: String,
    kind: EventKind,
    monitor: MonitorFn,
    transform: Option<TransformFn>,
    consume: Option<ConsumeFn>,
}

impl FnPlugin {
    pub fn new(name: impl Into<String>, kind: EventKind) -> Self {
        Self {
            name: name.into(),
            kind,
            monitor: Box::new(|_| Ok(None)),
            transform: None,
            consume: None,
        }
    }

    #[must_use]
    pub fn on_monitor<F>(mut self, monitor: F) -> Self
    where
        F: Fn(Notifier) -> Result<Option<InstrumentationGuard>, PluginError> + Send + Sync + 'static,
    {
        self.monitor = Box::new(monitor);
        self
    }

    #[must_use]
    pub fn on_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Client, &Value) -> Result<Option<EventRecord>, PluginError> + Send + Sync + 'static,
    {
        self.transform = Some(Box::new(transform));
        self
    }

    #[must_use]
    pub fn on_consume<F>(mut self, consume: F) -> Self
    where
        F: Fn(&Client, EventRecord) -> Result<(), PluginError> + Send + Sync + 'static,
    {
        self.consume = Some(Box::new(consume));
        self
    }
}

impl Plugin for FnPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> EventKind {
        self.kind
    }

    fn monitor(&self, notifier: Notifier) -> Result<Option<InstrumentationGuard>, PluginError> {
        (self.monitor)(notifier)
    }

    fn transform(&self, client: &Client, data: &Value) -> Result<Option<EventRecord>, PluginError> {
        match &self.transform {
            Some(transform) => transform(client, data),
            None => Ok(Some(passthrough_record(self.kind, &self.name, client, data))),
        }
    }

    fn consume(&self, client: &Client, record: EventRecord) -> Result<(), PluginError> {
        match &self.consume {
            Some(consume) => consume(client, record),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for FnPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnPlugin")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("transform", &self.transform.is_some())
            .field("consume", &self.consume.is_some())
            .finish()
    }
}
