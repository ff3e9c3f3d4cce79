//! Composition root
//!
//! A [`Client`] owns the breadcrumb history, the reporter (buffer, UID set,
//! delivery engine) and every bus created by `use_plugins`. Clones share
//! the same state.

pub mod builder;
pub mod core;
pub mod lifecycle;
pub mod logging;

pub use self::core::{Client, ClientMetrics, WeakClient};
pub use builder::ClientBuilder;
pub use lifecycle::AfterFlush;
pub use logging::LogEntry;
