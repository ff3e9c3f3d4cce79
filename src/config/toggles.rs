//! Plugin enable flags
//!
//! Every plugin and every plugin kind has one flag named
//! `disabled<PascalCase(name)>` (`js-error` -> `disabledJsError`,
//! `performance` -> `disabledPerformance`). Typed calls and raw flag maps
//! both write the same key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::EventKind;
use crate::utils::flag_name;

/// Decides whether a plugin may activate
///
/// Consulted once per plugin when it is activated.
pub trait PluginGate: Send + Sync {
    fn is_kind_enabled(&self, kind: EventKind) -> bool;
    fn is_plugin_enabled(&self, name: &str) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginToggles {
    flags: BTreeMap<String, bool>,
}

impl PluginToggles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw flags such as `{"disabledJsError": true}`
    pub fn from_flags<I, K>(flags: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        Self {
            flags: flags.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    #[must_use]
    pub fn disable_plugin(mut self, name: &str) -> Self {
        self.flags.insert(flag_name(name), true);
        self
    }

    #[must_use]
    pub fn enable_plugin(mut self, name: &str) -> Self {
        self.flags.insert(flag_name(name), false);
        self
    }

    #[must_use]
    pub fn disable_kind(mut self, kind: EventKind) -> Self {
        self.flags.insert(flag_name(kind.as_str()), true);
        self
    }

    #[must_use]
    pub fn enable_kind(mut self, kind: EventKind) -> Self {
        self.flags.insert(flag_name(kind.as_str()), false);
        self
    }

    /// Set a raw flag by its canonical name
    pub fn set_flag(&mut self, flag: impl Into<String>, disabled: bool) {
        self.flags.insert(flag.into(), disabled);
    }

    #[must_use]
    pub fn is_disabled(&self, flag: &str) -> bool {
        self.flags.get(flag).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn flags(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }
}

impl PluginGate for PluginToggles {
    fn is_kind_enabled(&self, kind: EventKind) -> bool {
        !self.is_disabled(&flag_name(kind.as_str()))
    }

    fn is_plugin_enabled(&self, name: &str) -> bool {
        !self.is_disabled(&flag_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_and_raw_flags_converge() {
        let typed = PluginToggles::new().disable_plugin("js-error");
        let raw = PluginToggles::from_flags([("disabledJsError", true)]);
        assert_eq!(typed, raw);
        assert!(!raw.is_plugin_enabled("js-error"));
        assert!(raw.is_plugin_enabled("route"));
    }

    #[test]
    fn kind_flags_use_the_kind_name() {
        let toggles = PluginToggles::new().disable_kind(EventKind::Performance);
        assert!(toggles.is_disabled("disabledPerformance"));
        assert!(!toggles.is_kind_enabled(EventKind::Performance));
        assert!(toggles.is_kind_enabled(EventKind::Error));
    }
}
