use serde::{Deserialize, Serialize};

use super::toggles::PluginToggles;
use crate::utils::{
    DEFAULT_CACHE_NUM, DEFAULT_FLUSH_INTERVAL_MS, DEFAULT_MAX_BREADCRUMBS, DEFAULT_SAMPLE,
    SDK_NAME, SDK_VERSION,
};

/// What the debounce timer does when it fires below the batch threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlushPolicy {
    /// Keep the records buffered until a later fire sees `cache_num` of them,
    /// or until teardown
    #[default]
    WaitForThreshold,
    /// Deliver whatever is buffered once the quiet window elapses
    FlushPartial,
}

/// Settings consumed by the client, report pipeline and delivery engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorConfig {
    /// Collector endpoint; an empty value aborts every send
    #[serde(default)]
    pub url: String,
    #[serde(rename = "appID")]
    pub app_id: String,
    #[serde(rename = "appName", default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    /// Fixed user id; generated and persisted per device when absent
    #[serde(rename = "userID", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default = "default_sdk_name")]
    pub sdk_name: String,
    #[serde(default = "default_sdk_version")]
    pub sdk_version: String,
    #[serde(default = "default_cache_num")]
    pub cache_num: usize,
    /// Trailing-debounce quiet window in milliseconds
    #[serde(default = "default_flush_interval")]
    pub flush_interval: u64,
    #[serde(default)]
    pub flush_policy: FlushPolicy,
    /// Percentage (0-100) of clients that activate performance plugins
    #[serde(default = "default_sample")]
    pub sample: f64,
    #[serde(default = "default_max_breadcrumbs")]
    pub max_breadcrumbs: usize,
    /// Error messages containing any of these substrings are dropped
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_errors: Vec<String>,
    /// Resource records transferring fewer bytes than this are dropped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_limit_size: Option<u64>,
    #[serde(default)]
    pub use_pixel_upload: bool,
    #[serde(default = "default_true")]
    pub beacon: bool,
    #[serde(flatten)]
    pub toggles: PluginToggles,
}

fn default_sdk_name() -> String {
    SDK_NAME.to_string()
}

fn default_sdk_version() -> String {
    SDK_VERSION.to_string()
}

fn default_cache_num() -> usize {
    DEFAULT_CACHE_NUM
}

fn default_flush_interval() -> u64 {
    DEFAULT_FLUSH_INTERVAL_MS
}

fn default_sample() -> f64 {
    DEFAULT_SAMPLE
}

fn default_max_breadcrumbs() -> usize {
    DEFAULT_MAX_BREADCRUMBS
}

fn default_true() -> bool {
    true
}

impl MonitorConfig {
    pub(crate) fn with_app_id(app_id: String) -> Self {
        Self {
            url: String::new(),
            app_id,
            app_name: None,
            user_id: None,
            environment: None,
            sdk_name: default_sdk_name(),
            sdk_version: default_sdk_version(),
            cache_num: DEFAULT_CACHE_NUM,
            flush_interval: DEFAULT_FLUSH_INTERVAL_MS,
            flush_policy: FlushPolicy::default(),
            sample: DEFAULT_SAMPLE,
            max_breadcrumbs: DEFAULT_MAX_BREADCRUMBS,
            ignore_errors: Vec::new(),
            resource_limit_size: None,
            use_pixel_upload: false,
            beacon: true,
            toggles: PluginToggles::default(),
        }
    }
}
