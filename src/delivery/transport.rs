use std::time::Duration;

use futures::future::BoxFuture;

use super::errors::TransportError;
use crate::config::MonitorConfig;
use crate::record::Envelope;
use crate::utils::{DELIVERY_TIMEOUT_SECS, SDK_NAME, SDK_VERSION};

/// Sends one envelope to a collector URL
pub trait Transport: Send + Sync {
    fn name(&self) -> &'static str;

    fn deliver<'a>(
        &'a self,
        envelope: &'a Envelope,
        url: &'a str,
    ) -> BoxFuture<'a, Result<(), TransportError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Beacon,
    Request,
    Pixel,
}

impl TransportKind {
    /// Pixel when opted in, else beacon when allowed, else request
    #[must_use]
    pub fn select(config: &MonitorConfig) -> Self {
        if config.use_pixel_upload {
            TransportKind::Pixel
        } else if config.beacon {
            TransportKind::Beacon
        } else {
            TransportKind::Request
        }
    }
}

/// HTTP client shared by the built-in transports
pub fn build_http_client() -> Result<reqwest::Client, TransportError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(DELIVERY_TIMEOUT_SECS))
        .user_agent(format!("{SDK_NAME}/{SDK_VERSION}"))
        .build()?)
}
