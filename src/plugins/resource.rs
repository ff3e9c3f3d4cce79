use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::source::SourceSlot;
use crate::client::Client;
use crate::event_bus::{Notifier, PluginError};
use crate::plugin::{InstrumentationGuard, Plugin};
use crate::record::{EventKind, EventRecord};
use crate::utils::now_millis;

pub const RESOURCE_EVENT: &str = "resource";

/// Initiators that are requests themselves and are measured elsewhere
const EXCLUDED_INITIATORS: [&str; 3] = ["fetch", "xmlhttprequest", "beacon"];

/// Timing entry for one loaded resource; offsets in milliseconds
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceTiming {
    pub name: String,
    pub initiator_type: String,
    pub next_hop_protocol: String,
    pub transfer_size: f64,
    pub encoded_body_size: f64,
    pub decoded_body_size: f64,
    pub redirect_start: f64,
    pub redirect_end: f64,
    pub domain_lookup_start: f64,
    pub domain_lookup_end: f64,
    pub connect_start: f64,
    pub connect_end: f64,
    pub request_start: f64,
    pub response_start: f64,
    pub response_end: f64,
    pub duration: f64,
}

impl ResourceTiming {
    /// Served from cache, or revalidated with an empty body
    #[must_use]
    pub fn is_cache_hit(&self) -> bool {
        self.transfer_size == 0.0 || self.encoded_body_size == 0.0
    }

    /// Entries without a protocol failed or were cross-origin
    #[must_use]
    pub fn is_reportable(&self) -> bool {
        !self.next_hop_protocol.is_empty()
            && !EXCLUDED_INITIATORS.contains(&self.initiator_type.as_str())
    }

    fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(self.name.as_str())
    }
}

/// Batches resource timings; performance kind, so subject to sampling
#[derive(Debug, Default)]
pub struct ResourcePlugin {
    slot: SourceSlot,
}

impl ResourcePlugin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn observer(&self) -> ResourceObserver {
        ResourceObserver {
            slot: self.slot.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResourceObserver {
    slot: SourceSlot,
}

impl ResourceObserver {
    /// Publish `entry` unless it is filtered out at the source
    pub fn observe(&self, entry: &ResourceTiming) -> bool {
        if !entry.is_reportable() {
            return false;
        }
        self.slot.emit(RESOURCE_EVENT, entry)
    }
}

impl Plugin for ResourcePlugin {
    fn name(&self) -> &str {
        RESOURCE_EVENT
    }

    fn kind(&self) -> EventKind {
        EventKind::Performance
    }

    fn monitor(&self, notifier: Notifier) -> Result<Option<InstrumentationGuard>, PluginError> {
        Ok(Some(self.slot.install(RESOURCE_EVENT, notifier)))
    }

    fn transform(&self, client: &Client, data: &Value) -> Result<Option<EventRecord>, PluginError> {
        let entry: ResourceTiming = serde_json::from_value(data.clone())?;
        let ratio = if entry.encoded_body_size > 0.0 {
            entry.decoded_body_size / entry.encoded_body_size
        } else {
            1.0
        };

        let Value::Object(main) = json!({
            "name": entry.short_name(),
            "sourceType": entry.initiator_type,
            "ttfb": entry.response_start,
            "transferSize": entry.transfer_size,
            "protocol": entry.next_hop_protocol,
            "encodedBodySize": entry.encoded_body_size,
            "decodedBodySize": entry.decoded_body_size,
            "resourceRatio": ratio,
            "isCache": entry.is_cache_hit(),
            "redirect": entry.redirect_end - entry.redirect_start,
            "dns": entry.domain_lookup_end - entry.domain_lookup_start,
            "tcp": entry.connect_end - entry.connect_start,
            "request": entry.response_start - entry.request_start,
            "response": entry.response_end - entry.response_start,
            "duration": entry.duration,
        }) else {
            return Ok(None);
        };

        Ok(Some(
            EventRecord::performance(RESOURCE_EVENT, main)
                .with_page_url(client.page_url())
                .with_time(now_millis()),
        ))
    }

    fn consume(&self, client: &Client, record: EventRecord) -> Result<(), PluginError> {
        let _ = client.report().dispatch(record, false);
        Ok(())
    }
}
