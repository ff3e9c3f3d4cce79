//! Per-client publish/subscribe dispatch
//!
//! Maps an event name to an ordered list of subscribers and delivers
//! notifications synchronously. Each subscriber runs inside its own failure
//! boundary: an `Err` or a panic is logged and counted, and the remaining
//! subscribers still run.

pub mod core;
pub mod errors;
pub mod metrics;
pub mod publishing;
pub mod subscription;

pub use self::core::EventBus;
pub use errors::PluginError;
pub use metrics::{BusMetrics, BusMetricsSnapshot};
pub use publishing::Notifier;
pub use subscription::{Subscriber, SubscriberFn};
