use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::runtime::Handle;

use crate::breadcrumb::{Breadcrumb, BreadcrumbEntry};
use crate::config::{MonitorConfig, PluginGate, ReportHooks};
use crate::delivery::DeliveryMetricsSnapshot;
use crate::plugin::activation::{Activation, activate};
use crate::plugin::{ActivationSummary, Plugin};
use crate::report::{ReportMetricsSnapshot, Reporter};

pub(crate) struct ClientInner {
    pub(crate) config: Arc<MonitorConfig>,
    pub(crate) hooks: ReportHooks,
    pub(crate) breadcrumb: Arc<Breadcrumb>,
    pub(crate) reporter: Arc<Reporter>,
    pub(crate) gate: Arc<dyn PluginGate>,
    pub(crate) sampled: bool,
    pub(crate) activations: Mutex<Vec<Activation>>,
    pub(crate) handle: Handle,
}

/// Telemetry client handle
#[derive(Clone)]
pub struct Client {
    pub(crate) inner: Arc<ClientInner>,
}

/// Non-owning client handle held by bus subscribers
#[derive(Clone)]
pub struct WeakClient {
    inner: Weak<ClientInner>,
}

impl WeakClient {
    #[must_use]
    pub fn upgrade(&self) -> Option<Client> {
        self.inner.upgrade().map(|inner| Client { inner })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientMetrics {
    pub report: ReportMetricsSnapshot,
    pub delivery: DeliveryMetricsSnapshot,
}

impl Client {
    /// Build a client with default hooks, transports and device store.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: MonitorConfig) -> anyhow::Result<Self> {
        Self::builder(config).build()
    }

    #[must_use]
    pub fn builder(config: MonitorConfig) -> super::builder::ClientBuilder {
        super::builder::ClientBuilder::new(config)
    }

    /// Activate `plugins` on a bus created for this call
    pub fn use_plugins(&self, plugins: Vec<Arc<dyn Plugin>>) -> ActivationSummary {
        activate(self, plugins)
    }

    pub fn use_plugin<P: Plugin + 'static>(&self, plugin: P) -> ActivationSummary {
        let plugin: Arc<dyn Plugin> = Arc::new(plugin);
        activate(self, vec![plugin])
    }

    #[must_use]
    pub fn report(&self) -> &Arc<Reporter> {
        &self.inner.reporter
    }

    #[must_use]
    pub fn breadcrumb(&self) -> &Arc<Breadcrumb> {
        &self.inner.breadcrumb
    }

    /// Shorthand for `breadcrumb().push(entry)`
    pub fn push_breadcrumb(&self, entry: BreadcrumbEntry) -> Vec<BreadcrumbEntry> {
        self.inner.breadcrumb.push(entry)
    }

    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn hooks(&self) -> &ReportHooks {
        &self.inner.hooks
    }

    #[must_use]
    pub fn gate(&self) -> &Arc<dyn PluginGate> {
        &self.inner.gate
    }

    /// Whether this client was sampled in for performance plugins
    #[must_use]
    pub fn is_sampled(&self) -> bool {
        self.inner.sampled
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        self.inner.reporter.user_id()
    }

    /// Current page as reported by the `page_url` hook
    #[must_use]
    pub fn page_url(&self) -> String {
        self.inner.hooks.current_page_url()
    }

    #[must_use]
    pub fn runtime(&self) -> &Handle {
        &self.inner.handle
    }

    #[must_use]
    pub fn metrics(&self) -> ClientMetrics {
        ClientMetrics {
            report: self.inner.reporter.metrics().snapshot(),
            delivery: self.inner.reporter.delivery().metrics().snapshot(),
        }
    }

    /// Number of `use_plugins` calls still holding a bus
    #[must_use]
    pub fn activation_count(&self) -> usize {
        self.inner.activations.lock().len()
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakClient {
        WeakClient {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub(crate) fn store_activation(&self, activation: Activation) {
        self.inner.activations.lock().push(activation);
    }

    pub(crate) fn take_activations(&self) -> Vec<Activation> {
        std::mem::take(&mut *self.inner.activations.lock())
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("app_id", &self.inner.config.app_id)
            .field("sampled", &self.inner.sampled)
            .field("activations", &self.activation_count())
            .field("reporter", &self.inner.reporter)
            .finish()
    }
}
