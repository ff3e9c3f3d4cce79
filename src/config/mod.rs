//! Configuration for the telemetry client
//!
//! `MonitorConfig` carries the serializable settings and is built through a
//! typestate builder that requires an application id. Behavior hooks live in
//! the separate, non-serializable `ReportHooks`, and plugin enable flags in
//! `PluginToggles`.

pub mod builder;
pub mod getters;
pub mod hooks;
pub mod toggles;
pub mod types;

pub use builder::{MonitorConfigBuilder, WithAppId};
pub use hooks::{
    BeforeDataReport, BeforePushBreadcrumb, ConfigureRequest, NetworkInfoProvider,
    PageUrlProvider, ReportHooks,
};
pub use toggles::{PluginGate, PluginToggles};
pub use types::{FlushPolicy, MonitorConfig};
