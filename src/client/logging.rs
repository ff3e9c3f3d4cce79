use serde_json::Value;

use super::core::Client;
use crate::record::{EventKind, EventRecord, MainData};
use crate::report::{ReportError, SendOutcome};

/// Sub-type used for manual records that do not name one
const DEFAULT_LOG_SUB_TYPE: &str = "custom";

/// Partially filled record for manual reporting
#[derive(Debug, Clone, Default)]
pub struct LogEntry {
    pub kind: Option<EventKind>,
    pub sub_type: Option<String>,
    pub page_url: Option<String>,
    pub time: Option<i64>,
    pub data: Value,
}

impl LogEntry {
    #[must_use]
    pub fn new(data: Value) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: EventKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn sub_type(mut self, sub_type: impl Into<String>) -> Self {
        self.sub_type = Some(sub_type.into());
        self
    }

    #[must_use]
    pub fn page_url(mut self, page_url: impl Into<String>) -> Self {
        self.page_url = Some(page_url.into());
        self
    }

    #[must_use]
    pub fn time(mut self, time: i64) -> Self {
        self.time = Some(time);
        self
    }
}

impl Client {
    /// Report a manual record.
    ///
    /// Missing kind defaults to custom, missing page to the `page_url`
    /// hook's value; the record then goes through the normal send pipeline.
    pub async fn log(&self, entry: LogEntry, immediate: bool) -> Result<SendOutcome, ReportError> {
        let record = self.record_from_entry(entry);
        self.inner.reporter.send(record, immediate).await
    }

    fn record_from_entry(&self, entry: LogEntry) -> EventRecord {
        let kind = entry.kind.unwrap_or_default();
        let sub_type = entry
            .sub_type
            .unwrap_or_else(|| DEFAULT_LOG_SUB_TYPE.to_string());
        let page_url = entry.page_url.unwrap_or_else(|| self.page_url());
        EventRecord::new(kind, sub_type, MainData::from_value(kind, entry.data))
            .with_page_url(page_url)
            .with_time(entry.time.unwrap_or_default())
    }
}
