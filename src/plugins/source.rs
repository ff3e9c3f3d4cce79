use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::event_bus::Notifier;
use crate::plugin::InstrumentationGuard;

/// Notifier shared between a plugin and the handle the host feeds
#[derive(Clone, Default)]
pub struct SourceSlot {
    notifier: Arc<RwLock<Option<Notifier>>>,
}

impl SourceSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `notifier`; the returned guard detaches it again
    pub fn install(&self, name: &str, notifier: Notifier) -> InstrumentationGuard {
        *self.notifier.write() = Some(notifier);
        let slot = Arc::clone(&self.notifier);
        InstrumentationGuard::new(name, move || {
            slot.write().take();
        })
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.notifier.read().is_some()
    }

    /// Publish `data`; returns `false` when no plugin is attached
    pub fn emit<T: Serialize>(&self, event: &str, data: &T) -> bool {
        let notifier = self.notifier.read().clone();
        match notifier {
            Some(notifier) => {
                notifier.notify_serialize(event, data);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for SourceSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceSlot")
            .field("installed", &self.is_installed())
            .finish()
    }
}
