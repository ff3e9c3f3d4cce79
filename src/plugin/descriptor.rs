use serde_json::Value;

use super::guard::InstrumentationGuard;
use crate::client::Client;
use crate::event_bus::{Notifier, PluginError};
use crate::record::{EventKind, EventRecord, MainData};

/// An instrumentation unit
pub trait Plugin: Send + Sync {
    /// Event key the plugin publishes under; unique within its kind
    fn name(&self) -> &str;

    fn kind(&self) -> EventKind;

    /// Install instrumentation. Called once per activation.
    ///
    /// `notifier` may be kept and used for as long as the instrumentation
    /// lives. Return a guard when the installation can be undone.
    fn monitor(&self, notifier: Notifier) -> Result<Option<InstrumentationGuard>, PluginError>;

    /// Map raw published data into a record; `None` means "do not report".
    ///
    /// Defaults to wrapping the raw data as the record payload.
    fn transform(&self, client: &Client, data: &Value) -> Result<Option<EventRecord>, PluginError> {
        Ok(Some(passthrough_record(self.kind(), self.name(), client, data)))
    }

    /// Act on a transformed record, typically by reporting it
    fn consume(&self, _client: &Client, _record: EventRecord) -> Result<(), PluginError> {
        Ok(())
    }
}

/// Record carrying `data` unchanged as its payload, sub-typed by plugin name
pub(crate) fn passthrough_record(
    kind: EventKind,
    name: &str,
    client: &Client,
    data: &Value,
) -> EventRecord {
    EventRecord::new(kind, name, MainData::from_value(kind, data.clone()))
        .with_page_url(client.page_url())
}
