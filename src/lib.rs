//! Plugin-driven telemetry collection
//!
//! Instrumentation plugins publish raw data on a per-activation event bus;
//! each plugin's transform and consume turn it into [`EventRecord`]s that the
//! [`Reporter`] deduplicates, filters, batches and hands to a delivery
//! transport.

pub mod breadcrumb;
pub mod client;
pub mod config;
pub mod delivery;
pub mod event_bus;
pub mod plugin;
pub mod plugins;
pub mod record;
pub mod report;
pub mod storage;
pub mod utils;

pub use breadcrumb::{Breadcrumb, BreadcrumbEntry, BreadcrumbKind, SeverityLevel};
pub use client::{AfterFlush, Client, ClientBuilder, LogEntry};
pub use config::{FlushPolicy, MonitorConfig, PluginGate, PluginToggles, ReportHooks};
pub use delivery::{DeliveryEngine, Transport, TransportError};
pub use event_bus::{EventBus, Notifier, PluginError};
pub use plugin::{ActivationSummary, FnPlugin, InstrumentationGuard, Plugin, PluginKind};
pub use plugins::{
    HttpPlugin, HttpTimingPlugin, LogPlugin, PanicPlugin, ResourcePlugin, RoutePlugin,
};
pub use record::{Envelope, ErrorData, EventKind, EventRecord, MainData, ReportData};
pub use report::{ReportError, Reporter, SendOutcome};
pub use storage::{DeviceStore, FileStore, MemoryStore};
