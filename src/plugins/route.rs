use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::source::SourceSlot;
use crate::breadcrumb::{BreadcrumbEntry, BreadcrumbKind, SeverityLevel};
use crate::client::Client;
use crate::event_bus::{Notifier, PluginError};
use crate::plugin::{InstrumentationGuard, Plugin};
use crate::record::{EventKind, EventRecord};
use crate::utils::now_millis;

pub const ROUTE_EVENT: &str = "route";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteChange {
    pub from: String,
    pub to: String,
}

/// Records navigations as `Route` breadcrumbs; nothing is reported on its own
#[derive(Debug, Default)]
pub struct RoutePlugin {
    slot: SourceSlot,
}

impl RoutePlugin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle the host calls on every navigation
    #[must_use]
    pub fn tracker(&self) -> RouteTracker {
        RouteTracker {
            slot: self.slot.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteTracker {
    slot: SourceSlot,
}

impl RouteTracker {
    pub fn navigate(&self, from: impl Into<String>, to: impl Into<String>) -> bool {
        let change = RouteChange {
            from: from.into(),
            to: to.into(),
        };
        self.slot.emit(ROUTE_EVENT, &change)
    }
}

impl Plugin for RoutePlugin {
    fn name(&self) -> &str {
        ROUTE_EVENT
    }

    fn kind(&self) -> EventKind {
        EventKind::Behavior
    }

    fn monitor(&self, notifier: Notifier) -> Result<Option<InstrumentationGuard>, PluginError> {
        Ok(Some(self.slot.install(ROUTE_EVENT, notifier)))
    }

    fn transform(&self, client: &Client, data: &Value) -> Result<Option<EventRecord>, PluginError> {
        let change: RouteChange = serde_json::from_value(data.clone())?;
        let mut main = Map::new();
        main.insert("from".into(), Value::String(change.from));
        main.insert("to".into(), Value::String(change.to));
        Ok(Some(
            EventRecord::behavior(ROUTE_EVENT, main)
                .with_page_url(client.page_url())
                .with_time(now_millis()),
        ))
    }

    fn consume(&self, client: &Client, record: EventRecord) -> Result<(), PluginError> {
        if record.main_data.get("from") == record.main_data.get("to") {
            return Ok(());
        }
        client.push_breadcrumb(
            BreadcrumbEntry::new(BreadcrumbKind::Route, record.main_data.to_value(), SeverityLevel::Info)
                .at(record.time),
        );
        Ok(())
    }
}
