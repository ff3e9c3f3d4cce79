//! Built-in instrumentation plugins
//!
//! Each plugin pairs with a host-facing handle ([`HttpObserver`],
//! [`RouteTracker`], [`ResourceObserver`]) that stays inert until the plugin
//! is activated and goes inert again when its guard is uninstalled.
//! [`PanicPlugin`] instruments the process panic hook directly, and
//! [`LogPlugin`] wraps the host's `log` logger.

pub mod console;
pub mod http;
pub mod http_timing;
pub mod panic;
pub mod resource;
pub mod route;
pub mod source;

pub use console::{CapturingLogger, LogLine, LogPlugin};
pub use http::{HttpExchange, HttpObserver, HttpPlugin, is_error_status, message_for_status};
pub use http_timing::HttpTimingPlugin;
pub use panic::{PanicPlugin, PanicReport};
pub use resource::{ResourceObserver, ResourcePlugin, ResourceTiming};
pub use route::{RouteChange, RoutePlugin, RouteTracker};
pub use source::SourceSlot;
