//! Host-supplied behavior hooks

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::breadcrumb::BreadcrumbEntry;
use crate::record::{EventRecord, NetworkInfo};

/// Last look at a record before it is buffered or sent; `None` cancels it
pub type BeforeDataReport =
    Arc<dyn Fn(EventRecord) -> BoxFuture<'static, Option<EventRecord>> + Send + Sync>;

/// Runs before a breadcrumb is stored; `None` drops it
pub type BeforePushBreadcrumb = Arc<dyn Fn(BreadcrumbEntry) -> Option<BreadcrumbEntry> + Send + Sync>;

/// Customizes the request transport's outgoing request (headers, credentials)
pub type ConfigureRequest =
    Arc<dyn Fn(reqwest::RequestBuilder) -> reqwest::RequestBuilder + Send + Sync>;

pub type NetworkInfoProvider = Arc<dyn Fn() -> Option<NetworkInfo> + Send + Sync>;

/// Current page or location attached to records that lack one
pub type PageUrlProvider = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Clone, Default)]
pub struct ReportHooks {
    pub before_data_report: Option<BeforeDataReport>,
    pub before_push_breadcrumb: Option<BeforePushBreadcrumb>,
    pub configure_request: Option<ConfigureRequest>,
    pub network_info: Option<NetworkInfoProvider>,
    pub page_url: Option<PageUrlProvider>,
}

impl ReportHooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn before_data_report<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(EventRecord) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<EventRecord>> + Send + 'static,
    {
        self.before_data_report = Some(Arc::new(move |record| Box::pin(hook(record))));
        self
    }

    #[must_use]
    pub fn before_push_breadcrumb<F>(mut self, hook: F) -> Self
    where
        F: Fn(BreadcrumbEntry) -> Option<BreadcrumbEntry> + Send + Sync + 'static,
    {
        self.before_push_breadcrumb = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn configure_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(reqwest::RequestBuilder) -> reqwest::RequestBuilder + Send + Sync + 'static,
    {
        self.configure_request = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn network_info<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Option<NetworkInfo> + Send + Sync + 'static,
    {
        self.network_info = Some(Arc::new(provider));
        self
    }

    #[must_use]
    pub fn page_url<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.page_url = Some(Arc::new(provider));
        self
    }

    pub(crate) fn current_page_url(&self) -> String {
        self.page_url.as_ref().map(|provider| provider()).unwrap_or_default()
    }

    pub(crate) fn current_network_info(&self) -> Option<NetworkInfo> {
        self.network_info.as_ref().and_then(|provider| provider())
    }
}

impl std::fmt::Debug for ReportHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportHooks")
            .field("before_data_report", &self.before_data_report.is_some())
            .field("before_push_breadcrumb", &self.before_push_breadcrumb.is_some())
            .field("configure_request", &self.configure_request.is_some())
            .field("network_info", &self.network_info.is_some())
            .field("page_url", &self.page_url.is_some())
            .finish()
    }
}
