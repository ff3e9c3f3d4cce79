use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::backend::DeviceStore;
use super::errors::StorageError;
use crate::utils::now_millis;

/// Stored envelope around every value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredValue {
    pub value: Value,
    /// Write time, epoch milliseconds
    pub time: i64,
    /// Expiry, epoch milliseconds; `None` never expires
    pub expire: Option<i64>,
}

/// Typed view over a [`DeviceStore`] with `<PREFIX>_<KEY>` keys
#[derive(Clone)]
pub struct PrefixedStore {
    backend: Arc<dyn DeviceStore>,
    prefix: String,
    default_ttl: Option<Duration>,
}

impl PrefixedStore {
    pub fn new(backend: Arc<dyn DeviceStore>, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
            default_ttl: None,
        }
    }

    #[must_use]
    pub fn with_default_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Fully-qualified, upper-cased storage key
    #[must_use]
    pub fn key(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key).to_uppercase()
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        self.set_with_ttl(key, value, self.default_ttl)
    }

    pub fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<(), StorageError> {
        let now = now_millis();
        let stored = StoredValue {
            value: serde_json::to_value(value)?,
            time: now,
            expire: ttl.map(|ttl| now.saturating_add(i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX))),
        };
        self.backend
            .write(&self.key(key), &serde_json::to_string(&stored)?)
    }

    /// Read a value; expired or unreadable entries are removed and read as absent
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let full_key = self.key(key);
        let Some(raw) = self.backend.read(&full_key)? else {
            return Ok(None);
        };

        let stored: StoredValue = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("Discarding malformed stored value for '{full_key}': {e}");
                self.backend.remove(&full_key)?;
                return Ok(None);
            }
        };

        if stored.expire.is_some_and(|expire| expire < now_millis()) {
            self.backend.remove(&full_key)?;
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(stored.value)?))
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.backend.remove(&self.key(key))
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.backend.clear()
    }
}

impl std::fmt::Debug for PrefixedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefixedStore")
            .field("prefix", &self.prefix)
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}
