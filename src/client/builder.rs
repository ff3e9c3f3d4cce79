use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tokio::runtime::Handle;

use super::core::{Client, ClientInner};
use crate::breadcrumb::Breadcrumb;
use crate::config::{MonitorConfig, PluginGate, ReportHooks};
use crate::delivery::{DeliveryEngine, Transport};
use crate::report::Reporter;
use crate::storage::{DeviceStore, FileStore, MemoryStore, PrefixedStore, resolve_user_id};
use crate::utils::{SDK_NAME, STORE_PREFIX, sampling};

/// Assembles a [`Client`] with optional overrides for its collaborators
pub struct ClientBuilder {
    config: MonitorConfig,
    hooks: ReportHooks,
    transport: Option<Arc<dyn Transport>>,
    gate: Option<Arc<dyn PluginGate>>,
    store: Option<Arc<dyn DeviceStore>>,
    sampled: Option<bool>,
    handle: Option<Handle>,
}

impl ClientBuilder {
    #[must_use]
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            hooks: ReportHooks::default(),
            transport: None,
            gate: None,
            store: None,
            sampled: None,
            handle: None,
        }
    }

    #[must_use]
    pub fn hooks(mut self, hooks: ReportHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Deliver every envelope through `transport` instead of the built-ins
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the config-driven plugin flags
    #[must_use]
    pub fn gate(mut self, gate: Arc<dyn PluginGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    #[must_use]
    pub fn store(mut self, store: Arc<dyn DeviceStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Fix the sampling decision instead of drawing it from `sample`
    #[must_use]
    pub fn sampled(mut self, sampled: bool) -> Self {
        self.sampled = Some(sampled);
        self
    }

    #[must_use]
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.handle = Some(handle);
        self
    }

    pub fn build(self) -> Result<Client> {
        self.config
            .validate()
            .context("Invalid monitor configuration")?;
        let handle = match self.handle {
            Some(handle) => handle,
            None => Handle::try_current()
                .context("Client must be built inside a tokio runtime or given one")?,
        };

        let config = Arc::new(self.config);
        let store = PrefixedStore::new(self.store.unwrap_or_else(default_store), STORE_PREFIX);
        let user_id = resolve_user_id(config.user_id.as_deref(), &store);

        let delivery = match self.transport {
            Some(transport) => DeliveryEngine::with_transport(transport, handle.clone()),
            None => DeliveryEngine::from_config(&config, &self.hooks, handle.clone())
                .context("Failed to initialize delivery transports")?,
        };

        let breadcrumb = Arc::new(Breadcrumb::new(
            config.max_breadcrumbs,
            self.hooks.before_push_breadcrumb.clone(),
        ));
        let reporter = Arc::new(Reporter::new(
            Arc::clone(&config),
            self.hooks.clone(),
            user_id,
            Arc::clone(&breadcrumb),
            delivery,
            handle.clone(),
        ));

        let gate: Arc<dyn PluginGate> = match self.gate {
            Some(gate) => gate,
            None => Arc::new(config.toggles.clone()),
        };
        let sampled = self.sampled.unwrap_or_else(|| sampling(config.sample));
        log::debug!(
            "Telemetry client for '{}' ready (sampled: {sampled})",
            config.app_id
        );

        Ok(Client {
            inner: Arc::new(ClientInner {
                config,
                hooks: self.hooks,
                breadcrumb,
                reporter,
                gate,
                sampled,
                activations: Mutex::new(Vec::new()),
                handle,
            }),
        })
    }
}

fn default_store() -> Arc<dyn DeviceStore> {
    match FileStore::in_data_dir(SDK_NAME) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::warn!("Falling back to in-memory device store: {e}");
            Arc::new(MemoryStore::new())
        }
    }
}
