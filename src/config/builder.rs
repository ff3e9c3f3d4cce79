//! Typestate builder for `MonitorConfig`
//!
//! An application id must be supplied before `build` becomes available.
//! The collector URL is optional here; sends without one are aborted at
//! send time.

use std::marker::PhantomData;

use anyhow::{Context, Result, bail};

use super::toggles::PluginToggles;
use super::types::{FlushPolicy, MonitorConfig};
use crate::record::EventKind;

pub struct WithAppId;

pub struct MonitorConfigBuilder<State = ()> {
    pub(crate) config: MonitorConfig,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for MonitorConfigBuilder<()> {
    fn default() -> Self {
        Self {
            config: MonitorConfig::with_app_id(String::new()),
            _phantom: PhantomData,
        }
    }
}

impl MonitorConfig {
    /// Create a builder for configuring a `MonitorConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> MonitorConfigBuilder<()> {
        MonitorConfigBuilder::default()
    }

    /// Parse a JSON configuration document and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: MonitorConfig =
            serde_json::from_str(json).context("Failed to parse monitor configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.app_id.trim().is_empty() {
            bail!("appID must not be empty");
        }
        if !(0.0..=100.0).contains(&self.sample) {
            bail!("sample must be within 0..=100, got {}", self.sample);
        }
        if self.cache_num == 0 {
            bail!("cacheNum must be at least 1");
        }
        if self.max_breadcrumbs == 0 {
            bail!("maxBreadcrumbs must be at least 1");
        }
        if self.flush_interval == 0 {
            bail!("flushInterval must be greater than 0");
        }
        if !self.url.is_empty() {
            let parsed = url::Url::parse(&self.url)
                .with_context(|| format!("Invalid report url '{}'", self.url))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!("Report url must use http or https, got '{}'", parsed.scheme());
            }
        }
        Ok(())
    }
}

impl MonitorConfigBuilder<()> {
    pub fn app_id(self, app_id: impl Into<String>) -> MonitorConfigBuilder<WithAppId> {
        MonitorConfigBuilder {
            config: MonitorConfig {
                app_id: app_id.into(),
                ..self.config
            },
            _phantom: PhantomData,
        }
    }
}

impl<State> MonitorConfigBuilder<State> {
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.config.url = url.into();
        self
    }

    #[must_use]
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.config.app_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.config.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.config.environment = Some(environment.into());
        self
    }

    #[must_use]
    pub fn sdk(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.config.sdk_name = name.into();
        self.config.sdk_version = version.into();
        self
    }

    #[must_use]
    pub fn cache_num(mut self, cache_num: usize) -> Self {
        self.config.cache_num = cache_num;
        self
    }

    /// Trailing-debounce quiet window in milliseconds
    #[must_use]
    pub fn flush_interval(mut self, millis: u64) -> Self {
        self.config.flush_interval = millis;
        self
    }

    #[must_use]
    pub fn flush_policy(mut self, policy: FlushPolicy) -> Self {
        self.config.flush_policy = policy;
        self
    }

    #[must_use]
    pub fn sample(mut self, sample: f64) -> Self {
        self.config.sample = sample;
        self
    }

    #[must_use]
    pub fn max_breadcrumbs(mut self, max: usize) -> Self {
        self.config.max_breadcrumbs = max;
        self
    }

    #[must_use]
    pub fn ignore_error(mut self, pattern: impl Into<String>) -> Self {
        self.config.ignore_errors.push(pattern.into());
        self
    }

    #[must_use]
    pub fn ignore_errors(mut self, patterns: Vec<String>) -> Self {
        self.config.ignore_errors = patterns;
        self
    }

    #[must_use]
    pub fn resource_limit_size(mut self, bytes: Option<u64>) -> Self {
        self.config.resource_limit_size = bytes;
        self
    }

    #[must_use]
    pub fn use_pixel_upload(mut self, enabled: bool) -> Self {
        self.config.use_pixel_upload = enabled;
        self
    }

    #[must_use]
    pub fn beacon(mut self, enabled: bool) -> Self {
        self.config.beacon = enabled;
        self
    }

    #[must_use]
    pub fn toggles(mut self, toggles: PluginToggles) -> Self {
        self.config.toggles = toggles;
        self
    }

    #[must_use]
    pub fn disable_plugin(mut self, name: &str) -> Self {
        self.config.toggles = self.config.toggles.disable_plugin(name);
        self
    }

    #[must_use]
    pub fn disable_kind(mut self, kind: EventKind) -> Self {
        self.config.toggles = self.config.toggles.disable_kind(kind);
        self
    }
}

impl MonitorConfigBuilder<WithAppId> {
    pub fn build(self) -> Result<MonitorConfig> {
        self.config
            .validate()
            .context("Invalid monitor configuration")?;
        Ok(self.config)
    }
}
