use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use super::descriptor::Plugin;
use super::guard::InstrumentationGuard;
use crate::client::Client;
use crate::event_bus::errors::panic_message;
use crate::event_bus::{EventBus, Notifier, PluginError, Subscriber};
use crate::record::EventKind;

/// Why a plugin was not activated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Its whole kind is disabled
    KindDisabled,
    /// The plugin's own flag is disabled
    PluginDisabled,
    /// Performance plugin on a client that was not sampled in
    NotSampled,
    /// `monitor` failed or panicked; the subscriber stays registered
    MonitorFailed(String),
}

/// Result of one `use_plugins` call
#[derive(Debug)]
pub struct ActivationSummary {
    /// Bus shared by the plugins of this call
    pub bus: Arc<EventBus>,
    pub activated: Vec<String>,
    pub skipped: Vec<(String, SkipReason)>,
}

impl ActivationSummary {
    #[must_use]
    pub fn is_active(&self, name: &str) -> bool {
        self.activated.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn skip_reason(&self, name: &str) -> Option<&SkipReason> {
        self.skipped
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, reason)| reason)
    }
}

/// Plugins activated together, kept alive by the client
pub(crate) struct Activation {
    pub(crate) bus: Arc<EventBus>,
    pub(crate) guards: Vec<InstrumentationGuard>,
}

/// Wire `plugins` to a fresh bus on `client`.
///
/// Each plugin is checked against the kind flag, its own flag and, for
/// performance plugins, the client's sampling decision. Enabled plugins get a
/// transform-then-consume subscriber registered under their name before
/// their `monitor` runs, so data published during `monitor` is observed.
pub(crate) fn activate(client: &Client, plugins: Vec<Arc<dyn Plugin>>) -> ActivationSummary {
    let bus = Arc::new(EventBus::new());
    let notifier = Notifier::new(Arc::clone(&bus));
    let mut activated = Vec::new();
    let mut skipped = Vec::new();
    let mut guards = Vec::new();

    for plugin in plugins {
        let name = plugin.name().to_string();
        if let Some(reason) = gate(client, plugin.as_ref()) {
            log::debug!("Skipping plugin '{name}': {reason:?}");
            skipped.push((name, reason));
            continue;
        }

        bus.watch(name.clone(), wrapper(client, Arc::clone(&plugin)));

        let monitor = catch_unwind(AssertUnwindSafe(|| plugin.monitor(notifier.clone())));
        let failure = match monitor {
            Ok(Ok(guard)) => {
                guards.extend(guard);
                activated.push(name);
                continue;
            }
            Ok(Err(e)) => e.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };
        let fault = PluginError::MonitorFailed {
            plugin: name.clone(),
            message: failure.clone(),
        };
        log::error!("{fault}");
        skipped.push((name, SkipReason::MonitorFailed(failure)));
    }

    client.store_activation(Activation {
        bus: Arc::clone(&bus),
        guards,
    });

    ActivationSummary {
        bus,
        activated,
        skipped,
    }
}

fn gate(client: &Client, plugin: &dyn Plugin) -> Option<SkipReason> {
    let gate = client.gate();
    if !gate.is_kind_enabled(plugin.kind()) {
        return Some(SkipReason::KindDisabled);
    }
    if !gate.is_plugin_enabled(plugin.name()) {
        return Some(SkipReason::PluginDisabled);
    }
    if plugin.kind() == EventKind::Performance && !client.is_sampled() {
        return Some(SkipReason::NotSampled);
    }
    None
}

/// Subscriber running transform, then consume when a record came back
fn wrapper(client: &Client, plugin: Arc<dyn Plugin>) -> Subscriber {
    let client = client.downgrade();
    let name = plugin.name().to_string();
    Subscriber::new(name, move |data| {
        let Some(client) = client.upgrade() else {
            return Ok(());
        };
        match plugin.transform(&client, data)? {
            Some(record) => plugin.consume(&client, record),
            None => Ok(()),
        }
    })
}
