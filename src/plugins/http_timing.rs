use serde_json::{Value, json};

use super::http::HttpExchange;
use super::source::SourceSlot;
use crate::client::Client;
use crate::event_bus::{Notifier, PluginError};
use crate::plugin::{InstrumentationGuard, Plugin};
use crate::record::{EventKind, EventRecord};
use crate::utils::strip_query;

pub const HTTP_TIMING_EVENT: &str = "http-timing";

/// Batches the duration of every outbound HTTP exchange
///
/// Performance kind, so subject to sampling. Fed by an
/// [`HttpObserver`](super::HttpObserver) built with `with_timing`.
#[derive(Debug, Default)]
pub struct HttpTimingPlugin {
    slot: SourceSlot,
}

impl HttpTimingPlugin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn slot(&self) -> SourceSlot {
        self.slot.clone()
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

impl Plugin for HttpTimingPlugin {
    fn name(&self) -> &str {
        HTTP_TIMING_EVENT
    }

    fn kind(&self) -> EventKind {
        EventKind::Performance
    }

    fn monitor(&self, notifier: Notifier) -> Result<Option<InstrumentationGuard>, PluginError> {
        Ok(Some(self.slot.install(HTTP_TIMING_EVENT, notifier)))
    }

    fn transform(&self, client: &Client, data: &Value) -> Result<Option<EventRecord>, PluginError> {
        let exchange: HttpExchange = serde_json::from_value(data.clone())?;
        let duration = i64::try_from(exchange.duration_ms).unwrap_or(i64::MAX);
        let Value::Object(main) = json!({
            "url": strip_query(&exchange.url),
            "method": exchange.method,
            "status": exchange.status,
            "success": is_success(exchange.status),
            "duration": exchange.duration_ms,
            "startTime": exchange.started_at,
            "endTime": exchange.started_at.saturating_add(duration),
        }) else {
            return Ok(None);
        };
        Ok(Some(
            EventRecord::performance(HTTP_TIMING_EVENT, main)
                .with_page_url(client.page_url())
                .with_time(exchange.started_at),
        ))
    }

    fn consume(&self, client: &Client, record: EventRecord) -> Result<(), PluginError> {
        let _ = client.report().dispatch(record, false);
        Ok(())
    }
}
