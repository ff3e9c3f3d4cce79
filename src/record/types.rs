use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::stack::StackTrace;
use crate::breadcrumb::BreadcrumbEntry;

/// Coarse classification shared by plugins and the records they produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Error,
    Performance,
    Behavior,
    #[default]
    Custom,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Error,
        EventKind::Performance,
        EventKind::Behavior,
        EventKind::Custom,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Error => "error",
            EventKind::Performance => "performance",
            EventKind::Behavior => "behavior",
            EventKind::Custom => "custom",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of an error-family record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorData {
    /// Error class name (`TypeError`, `panic`, `HttpError`, ...)
    #[serde(rename = "type")]
    pub error_type: String,
    pub error_uid: String,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub meta: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<StackTrace>,
}

impl ErrorData {
    #[must_use]
    pub fn new(error_type: impl Into<String>, error_uid: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            error_uid: error_uid.into(),
            msg: msg.into(),
            meta: Value::Null,
            stack_trace: None,
        }
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = meta;
        self
    }

    #[must_use]
    pub fn with_stack_trace(mut self, stack_trace: StackTrace) -> Self {
        self.stack_trace = Some(stack_trace);
        self
    }
}

/// Timing fields of a performance-family record
pub type PerformanceData = Map<String, Value>;

/// Contextual fields of a behavior-family record (e.g. `{ from, to }`)
pub type BehaviorData = Map<String, Value>;

/// Per-family record payload.
///
/// Serialized untagged so the collector sees the payload object itself; the
/// family is recovered from the record's `type` on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MainData {
    Error(ErrorData),
    Performance(PerformanceData),
    Behavior(BehaviorData),
    Custom(Value),
}

impl MainData {
    /// Rebuild a payload from its wire value using the record family.
    ///
    /// Values that do not fit the family's shape are kept as `Custom`.
    #[must_use]
    pub fn from_value(kind: EventKind, value: Value) -> Self {
        match (kind, value) {
            (EventKind::Error, value) => match serde_json::from_value::<ErrorData>(value.clone()) {
                Ok(error) => MainData::Error(error),
                Err(_) => MainData::Custom(value),
            },
            (EventKind::Performance, Value::Object(map)) => MainData::Performance(map),
            (EventKind::Behavior, Value::Object(map)) => MainData::Behavior(map),
            (_, value) => MainData::Custom(value),
        }
    }

    #[must_use]
    pub fn error_uid(&self) -> Option<&str> {
        match self {
            MainData::Error(error) => Some(error.error_uid.as_str()),
            MainData::Custom(Value::Object(map)) => map.get("errorUid").and_then(Value::as_str),
            _ => None,
        }
    }

    /// The error message used for ignore-list matching
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            MainData::Error(error) => Some(error.msg.as_str()),
            MainData::Custom(Value::Object(map)) => map.get("msg").and_then(Value::as_str),
            _ => None,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            MainData::Performance(map) | MainData::Behavior(map) => map.get(key),
            MainData::Custom(Value::Object(map)) => map.get(key),
            MainData::Error(_) | MainData::Custom(_) => None,
        }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Default for MainData {
    fn default() -> Self {
        MainData::Custom(Value::Null)
    }
}

/// The normalized unit a plugin's transform produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "WireRecord")]
pub struct EventRecord {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub sub_type: String,
    #[serde(rename = "pageURL")]
    pub page_url: String,
    /// Unix epoch milliseconds; 0 until the report pipeline stamps it
    pub time: i64,
    pub main_data: MainData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breadcrumb_data: Option<Vec<BreadcrumbEntry>>,
}

impl EventRecord {
    #[must_use]
    pub fn new(kind: EventKind, sub_type: impl Into<String>, main_data: MainData) -> Self {
        Self {
            kind,
            sub_type: sub_type.into(),
            page_url: String::new(),
            time: 0,
            main_data,
            breadcrumb_data: None,
        }
    }

    #[must_use]
    pub fn error(sub_type: impl Into<String>, data: ErrorData) -> Self {
        Self::new(EventKind::Error, sub_type, MainData::Error(data))
    }

    #[must_use]
    pub fn performance(sub_type: impl Into<String>, data: PerformanceData) -> Self {
        Self::new(EventKind::Performance, sub_type, MainData::Performance(data))
    }

    #[must_use]
    pub fn behavior(sub_type: impl Into<String>, data: BehaviorData) -> Self {
        Self::new(EventKind::Behavior, sub_type, MainData::Behavior(data))
    }

    #[must_use]
    pub fn custom(sub_type: impl Into<String>, data: Value) -> Self {
        Self::new(EventKind::Custom, sub_type, MainData::Custom(data))
    }

    #[must_use]
    pub fn with_page_url(mut self, page_url: impl Into<String>) -> Self {
        self.page_url = page_url.into();
        self
    }

    #[must_use]
    pub fn with_time(mut self, time: i64) -> Self {
        self.time = time;
        self
    }

    #[must_use]
    pub fn error_uid(&self) -> Option<&str> {
        self.main_data.error_uid()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRecord {
    #[serde(rename = "type", default)]
    kind: EventKind,
    #[serde(default)]
    sub_type: String,
    #[serde(rename = "pageURL", default)]
    page_url: String,
    #[serde(default)]
    time: i64,
    #[serde(default)]
    main_data: Value,
    #[serde(default)]
    breadcrumb_data: Option<Vec<BreadcrumbEntry>>,
}

impl From<WireRecord> for EventRecord {
    fn from(wire: WireRecord) -> Self {
        Self {
            kind: wire.kind,
            sub_type: wire.sub_type,
            page_url: wire.page_url,
            time: wire.time,
            main_data: MainData::from_value(wire.kind, wire.main_data),
            breadcrumb_data: wire.breadcrumb_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_record_serializes_with_wire_names() {
        let record = EventRecord::error("js-error", ErrorData::new("TypeError", "42", "boom"))
            .with_page_url("https://app.test/home")
            .with_time(1_700_000_000_000);

        let value = serde_json::to_value(&record).unwrap_or_default();
        assert_eq!(value["type"], "error");
        assert_eq!(value["subType"], "js-error");
        assert_eq!(value["pageURL"], "https://app.test/home");
        assert_eq!(value["mainData"]["errorUid"], "42");
        assert_eq!(value["mainData"]["type"], "TypeError");
        assert!(value.get("breadcrumbData").is_none());
    }

    #[test]
    fn deserialization_recovers_family_from_type() {
        let value = json!({
            "type": "behavior",
            "subType": "route",
            "pageURL": "",
            "time": 5,
            "mainData": { "from": "/a", "to": "/b" }
        });
        let record: EventRecord = serde_json::from_value(value).unwrap_or_else(|_| {
            EventRecord::custom("invalid", Value::Null)
        });
        assert!(matches!(record.main_data, MainData::Behavior(_)));
        assert_eq!(record.main_data.get("to"), Some(&json!("/b")));
    }

    #[test]
    fn malformed_error_payload_falls_back_to_custom() {
        let data = MainData::from_value(EventKind::Error, json!({ "msg": "no uid" }));
        assert!(matches!(data, MainData::Custom(_)));
        assert_eq!(data.message(), Some("no uid"));
        assert_eq!(data.error_uid(), None);
    }
}
