use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What kind of action a breadcrumb records
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreadcrumbKind {
    Route,
    Console,
    Http,
    Click,
    Resource,
    Unhandledrejection,
    #[serde(rename = "Code Error")]
    CodeError,
    Customer,
    #[serde(untagged)]
    Other(String),
}

/// Severity attached to breadcrumbs and log entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Else,
    Error,
    Warning,
    #[default]
    Info,
    Debug,
    Low,
    Normal,
    High,
    Critical,
}

impl SeverityLevel {
    /// Map a free-form level name onto the levels collectors group by.
    ///
    /// # Examples
    /// ```
    /// # use kodegen_telemetry::breadcrumb::SeverityLevel;
    /// assert_eq!(SeverityLevel::from_str_lossy("warn"), SeverityLevel::Warning);
    /// assert_eq!(SeverityLevel::from_str_lossy("critical"), SeverityLevel::Error);
    /// assert_eq!(SeverityLevel::from_str_lossy("verbose"), SeverityLevel::Else);
    /// ```
    #[must_use]
    pub fn from_str_lossy(level: &str) -> Self {
        match level {
            "debug" => SeverityLevel::Debug,
            "info" | "log" | "assert" => SeverityLevel::Info,
            "warn" | "warning" => SeverityLevel::Warning,
            "error" | "low" | "normal" | "high" | "critical" => SeverityLevel::Error,
            _ => SeverityLevel::Else,
        }
    }
}

/// A recorded prior action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadcrumbEntry {
    #[serde(rename = "type")]
    pub kind: BreadcrumbKind,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub level: SeverityLevel,
    /// Unix epoch milliseconds; assigned on push when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
}

impl BreadcrumbEntry {
    #[must_use]
    pub fn new(kind: BreadcrumbKind, data: Value, level: SeverityLevel) -> Self {
        Self {
            kind,
            data,
            level,
            time: None,
        }
    }

    #[must_use]
    pub fn at(mut self, time: i64) -> Self {
        self.time = Some(time);
        self
    }
}
