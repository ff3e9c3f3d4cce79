use futures::future::BoxFuture;

use super::errors::TransportError;
use super::transport::Transport;
use crate::record::Envelope;
use crate::utils::{PIXEL_QUERY_PARAM, append_query_param};

/// GET against a pixel endpoint with the envelope percent-encoded into `data=`
#[derive(Debug, Clone)]
pub struct PixelTransport {
    client: reqwest::Client,
}

impl PixelTransport {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// The URL a given envelope is sent to
    pub fn pixel_url(envelope: &Envelope, url: &str) -> Result<String, TransportError> {
        Ok(append_query_param(url, PIXEL_QUERY_PARAM, &envelope.to_json()?))
    }
}

impl Transport for PixelTransport {
    fn name(&self) -> &'static str {
        "pixel"
    }

    fn deliver<'a>(
        &'a self,
        envelope: &'a Envelope,
        url: &'a str,
    ) -> BoxFuture<'a, Result<(), TransportError>> {
        Box::pin(async move {
            let target = Self::pixel_url(envelope, url)?;
            self.client.get(target).send().await?;
            Ok(())
        })
    }
}
