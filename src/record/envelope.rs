use serde::{Deserialize, Serialize};

use super::types::EventRecord;

/// Connection quality the host reports alongside each envelope
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downlink: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtt: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_data: Option<bool>,
}

/// One record on the immediate path, the drained buffer on the batched path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportData {
    Batch(Vec<EventRecord>),
    Single(Box<EventRecord>),
}

impl ReportData {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ReportData::Single(_) => 1,
            ReportData::Batch(records) => records.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records in delivery order
    #[must_use]
    pub fn records(&self) -> Vec<&EventRecord> {
        match self {
            ReportData::Single(record) => vec![record.as_ref()],
            ReportData::Batch(records) => records.iter().collect(),
        }
    }
}

/// Outer wire object wrapping records with app and session identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub id: String,
    #[serde(rename = "appID")]
    pub app_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "appName", default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(rename = "sdkName", default, skip_serializing_if = "Option::is_none")]
    pub sdk_name: Option<String>,
    #[serde(rename = "sdkVersion", default, skip_serializing_if = "Option::is_none")]
    pub sdk_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(rename = "networkInfo", default, skip_serializing_if = "Option::is_none")]
    pub network_info: Option<NetworkInfo>,
    pub data: ReportData,
}

impl Envelope {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Number of records carried
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
