use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::http_timing::{HTTP_TIMING_EVENT, HttpTimingPlugin};
use super::source::SourceSlot;
use crate::breadcrumb::{BreadcrumbEntry, BreadcrumbKind, SeverityLevel};
use crate::client::Client;
use crate::event_bus::{Notifier, PluginError};
use crate::plugin::{InstrumentationGuard, Plugin};
use crate::record::{ErrorData, EventKind, EventRecord, MainData, error_uid};
use crate::utils::{CROSS_ORIGIN_THRESHOLD_MS, now_millis, strip_query};

pub const HTTP_EVENT: &str = "http";

const STATUS_OK: &str = "ok";

/// One completed outbound request, as observed by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpExchange {
    pub method: String,
    pub url: String,
    /// 0 when no response arrived
    pub status: u16,
    pub duration_ms: u64,
    /// Request start, epoch milliseconds
    pub started_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
}

impl HttpExchange {
    pub fn new(method: impl Into<String>, url: impl Into<String>, status: u16, duration_ms: u64) -> Self {
        Self {
            method: method.into().to_uppercase(),
            url: url.into(),
            status,
            duration_ms,
            started_at: now_millis().saturating_sub(i64::try_from(duration_ms).unwrap_or(0)),
            request_body: None,
            response_body: None,
        }
    }
}

/// Span-status name for an HTTP status code
#[must_use]
pub fn message_for_status(status: u16) -> &'static str {
    match status {
        100..=399 => STATUS_OK,
        401 => "unauthenticated",
        403 => "permission_denied",
        404 => "not_found",
        409 => "already_exists",
        413 => "failed_precondition",
        429 => "resource_exhausted",
        400..=499 => "invalid_argument",
        501 => "unimplemented",
        503 => "unavailable",
        504 => "deadline_exceeded",
        500..=599 => "internal_error",
        _ => "unknown_error",
    }
}

/// Failures worth an immediate report: no response, 400, or above 401
#[must_use]
pub fn is_error_status(status: u16) -> bool {
    status == 0 || status == 400 || status > 401
}

fn exchange_message(exchange: &HttpExchange) -> String {
    let message = if exchange.status == 0 {
        if exchange.duration_ms <= CROSS_ORIGIN_THRESHOLD_MS {
            "http request failed: cross-origin restriction or unreachable host"
        } else {
            "http request failed: timeout"
        }
    } else {
        message_for_status(exchange.status)
    };
    if message == STATUS_OK {
        message.to_string()
    } else {
        format!("{message}: {}", exchange.url)
    }
}

/// Reports failed outbound HTTP exchanges and records every exchange as a breadcrumb
#[derive(Debug, Default)]
pub struct HttpPlugin {
    slot: SourceSlot,
}

impl HttpPlugin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle the host's HTTP layer calls after each exchange
    #[must_use]
    pub fn observer(&self) -> HttpObserver {
        HttpObserver {
            slot: self.slot.clone(),
            timing: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpObserver {
    slot: SourceSlot,
    timing: Option<SourceSlot>,
}

impl HttpObserver {
    /// Also feed every exchange to `plugin` as a duration record
    #[must_use]
    pub fn with_timing(mut self, plugin: &HttpTimingPlugin) -> Self {
        self.timing = Some(plugin.slot());
        self
    }

    /// Publish `exchange`; `false` when neither plugin is active
    pub fn record(&self, exchange: &HttpExchange) -> bool {
        let reported = self.slot.emit(HTTP_EVENT, exchange);
        let timed = self
            .timing
            .as_ref()
            .is_some_and(|timing| timing.emit(HTTP_TIMING_EVENT, exchange));
        reported || timed
    }
}

impl Plugin for HttpPlugin {
    fn name(&self) -> &str {
        HTTP_EVENT
    }

    fn kind(&self) -> EventKind {
        EventKind::Error
    }

    fn monitor(&self, notifier: Notifier) -> Result<Option<InstrumentationGuard>, PluginError> {
        Ok(Some(self.slot.install(HTTP_EVENT, notifier)))
    }

    fn transform(&self, client: &Client, data: &Value) -> Result<Option<EventRecord>, PluginError> {
        let exchange: HttpExchange = serde_json::from_value(data.clone())?;
        let uid = error_uid(&format!("{HTTP_EVENT}-{}", strip_query(&exchange.url)));
        let error = ErrorData::new("HttpError", uid, exchange_message(&exchange)).with_meta(json!({
            "request": {
                "method": exchange.method,
                "url": exchange.url,
                "data": exchange.request_body,
            },
            "response": {
                "status": exchange.status,
                "data": exchange.response_body,
            },
            "duration": exchange.duration_ms,
        }));
        Ok(Some(
            EventRecord::error(HTTP_EVENT, error)
                .with_page_url(client.page_url())
                .with_time(exchange.started_at),
        ))
    }

    fn consume(&self, client: &Client, record: EventRecord) -> Result<(), PluginError> {
        let status = match &record.main_data {
            MainData::Error(error) => error.meta["response"]["status"].as_u64().unwrap_or(0),
            _ => return Err(PluginError::other("http record without error payload")),
        };
        let data = record.main_data.to_value();

        client.push_breadcrumb(
            BreadcrumbEntry::new(BreadcrumbKind::Http, data.clone(), SeverityLevel::Info).at(record.time),
        );
        if is_error_status(u16::try_from(status).unwrap_or(u16::MAX)) {
            client.push_breadcrumb(
                BreadcrumbEntry::new(BreadcrumbKind::Http, data, SeverityLevel::Error).at(record.time),
            );
            let _ = client.report().dispatch(record, true);
        }
        Ok(())
    }
}
