use std::backtrace::Backtrace;
use std::cell::Cell;
use std::panic::{self, PanicHookInfo};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::breadcrumb::{BreadcrumbEntry, BreadcrumbKind, SeverityLevel};
use crate::client::Client;
use crate::event_bus::errors::panic_message;
use crate::event_bus::{Notifier, PluginError};
use crate::plugin::{InstrumentationGuard, Plugin};
use crate::record::{ErrorData, EventKind, EventRecord, StackTrace, error_uid};
use crate::utils::now_millis;

pub const PANIC_EVENT: &str = "panic-error";

thread_local! {
    static IN_HOOK: Cell<bool> = const { Cell::new(false) };
}

/// What the panic hook captured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanicReport {
    pub message: String,
    pub file: String,
    pub line: u32,
    pub col: u32,
    pub thread: String,
    pub backtrace: String,
    pub time: i64,
}

impl PanicReport {
    fn capture(info: &PanicHookInfo<'_>) -> Self {
        let (file, line, col) = info
            .location()
            .map(|l| (l.file().to_string(), l.line(), l.column()))
            .unwrap_or_default();
        Self {
            message: panic_message(info.payload()),
            file,
            line,
            col,
            thread: std::thread::current()
                .name()
                .unwrap_or("<unnamed>")
                .to_string(),
            backtrace: Backtrace::force_capture().to_string(),
            time: now_millis(),
        }
    }
}

/// Reports panics through a chained process panic hook
///
/// The previously installed hook still runs after each report. Uninstalling
/// puts back the hook that was active when the plugin was activated.
#[derive(Debug, Default)]
pub struct PanicPlugin;

impl PanicPlugin {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for PanicPlugin {
    fn name(&self) -> &str {
        PANIC_EVENT
    }

    fn kind(&self) -> EventKind {
        EventKind::Error
    }

    fn monitor(&self, notifier: Notifier) -> Result<Option<InstrumentationGuard>, PluginError> {
        if std::thread::panicking() {
            return Err(PluginError::other("cannot install panic hook while panicking"));
        }

        let previous = Arc::new(panic::take_hook());
        let chained = Arc::clone(&previous);
        panic::set_hook(Box::new(move |info| {
            // a panic raised while reporting must not re-enter the hook
            if !IN_HOOK.with(|flag| flag.replace(true)) {
                notifier.notify_serialize(PANIC_EVENT, &PanicReport::capture(info));
                IN_HOOK.with(|flag| flag.set(false));
            }
            chained(info);
        }));

        Ok(Some(InstrumentationGuard::new(PANIC_EVENT, move || {
            if std::thread::panicking() {
                return;
            }
            let _ = panic::take_hook();
            panic::set_hook(Box::new(move |info| previous(info)));
        })))
    }

    fn transform(&self, client: &Client, data: &Value) -> Result<Option<EventRecord>, PluginError> {
        let report: PanicReport = serde_json::from_value(data.clone())?;
        let uid = error_uid(&format!("{PANIC_EVENT}-{}-{}", report.message, report.file));
        let error = ErrorData::new("panic", uid, report.message.as_str())
            .with_meta(json!({
                "file": report.file,
                "line": report.line,
                "col": report.col,
                "thread": report.thread,
            }))
            .with_stack_trace(StackTrace::parse(&report.backtrace));
        Ok(Some(
            EventRecord::error(PANIC_EVENT, error)
                .with_page_url(client.page_url())
                .with_time(report.time),
        ))
    }

    fn consume(&self, client: &Client, record: EventRecord) -> Result<(), PluginError> {
        client.push_breadcrumb(
            BreadcrumbEntry::new(
                BreadcrumbKind::CodeError,
                record.main_data.to_value(),
                SeverityLevel::Error,
            )
            .at(record.time),
        );
        let _ = client.report().dispatch(record, true);
        Ok(())
    }
}
