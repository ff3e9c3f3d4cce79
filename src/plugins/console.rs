use std::cell::Cell;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::source::SourceSlot;
use crate::breadcrumb::{BreadcrumbEntry, BreadcrumbKind, SeverityLevel};
use crate::client::Client;
use crate::event_bus::{Notifier, PluginError};
use crate::plugin::{InstrumentationGuard, Plugin};
use crate::record::{ErrorData, EventKind, EventRecord, error_uid};
use crate::utils::now_millis;

pub const LOG_EVENT: &str = "console-error";

/// Records from this crate never feed back into the pipeline
const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

thread_local! {
    static IN_LOGGER: Cell<bool> = const { Cell::new(false) };
}

/// An error-level log line as captured by [`CapturingLogger`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogLine {
    pub message: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub time: i64,
}

impl LogLine {
    fn capture(record: &log::Record<'_>) -> Self {
        Self {
            message: record.args().to_string(),
            target: record.target().to_string(),
            file: record.file().map(str::to_string),
            line: record.line(),
            time: now_millis(),
        }
    }
}

/// Reports `log::error!` output from the host
///
/// Install the wrapper returned by [`logger`](Self::logger) with
/// `log::set_boxed_logger`. It forwards every record to the wrapped logger
/// and publishes error-level ones while the plugin is active.
#[derive(Debug, Default)]
pub struct LogPlugin {
    slot: SourceSlot,
}

impl LogPlugin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap the host's logger
    #[must_use]
    pub fn logger(&self, inner: Box<dyn log::Log>) -> CapturingLogger {
        CapturingLogger {
            inner,
            slot: self.slot.clone(),
        }
    }
}

pub struct CapturingLogger {
    inner: Box<dyn log::Log>,
    slot: SourceSlot,
}

fn is_reportable(record: &log::Record<'_>) -> bool {
    record.level() == log::Level::Error && !record.target().starts_with(OWN_TARGET)
}

impl log::Log for CapturingLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record<'_>) {
        // an error logged while reporting must not re-enter the pipeline
        if is_reportable(record)
            && self.slot.is_installed()
            && !IN_LOGGER.with(|flag| flag.replace(true))
        {
            self.slot.emit(LOG_EVENT, &LogLine::capture(record));
            IN_LOGGER.with(|flag| flag.set(false));
        }
        self.inner.log(record);
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

impl std::fmt::Debug for CapturingLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturingLogger")
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

impl Plugin for LogPlugin {
    fn name(&self) -> &str {
        LOG_EVENT
    }

    fn kind(&self) -> EventKind {
        EventKind::Error
    }

    fn monitor(&self, notifier: Notifier) -> Result<Option<InstrumentationGuard>, PluginError> {
        Ok(Some(self.slot.install(LOG_EVENT, notifier)))
    }

    fn transform(&self, client: &Client, data: &Value) -> Result<Option<EventRecord>, PluginError> {
        let line: LogLine = serde_json::from_value(data.clone())?;
        let uid = error_uid(&format!("{LOG_EVENT}-{}", line.message));
        let error = ErrorData::new("log", uid, line.message.as_str()).with_meta(json!({
            "target": line.target,
            "file": line.file,
            "line": line.line,
        }));
        Ok(Some(
            EventRecord::error(LOG_EVENT, error)
                .with_page_url(client.page_url())
                .with_time(line.time),
        ))
    }

    fn consume(&self, client: &Client, record: EventRecord) -> Result<(), PluginError> {
        client.push_breadcrumb(
            BreadcrumbEntry::new(
                BreadcrumbKind::Console,
                record.main_data.to_value(),
                SeverityLevel::Error,
            )
            .at(record.time),
        );
        let _ = client.report().dispatch(record, true);
        Ok(())
    }
}
