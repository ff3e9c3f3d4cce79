//! Plugin contract and activation
//!
//! A plugin installs instrumentation in `monitor`, maps the raw data its
//! instrumentation publishes in `transform`, and acts on the resulting record
//! in `consume`. Activation wires each enabled plugin to a bus created for
//! that `use_plugins` call.

pub mod activation;
pub mod descriptor;
pub mod fn_plugin;
pub mod guard;

pub use activation::{ActivationSummary, SkipReason};
pub use descriptor::Plugin;
pub use fn_plugin::FnPlugin;
pub use guard::InstrumentationGuard;

pub use crate::event_bus::{Notifier, PluginError};
pub use crate::record::EventKind as PluginKind;
