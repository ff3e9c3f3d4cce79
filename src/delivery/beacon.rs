use futures::future::BoxFuture;
use reqwest::header::CONTENT_TYPE;

use super::errors::TransportError;
use super::transport::Transport;
use crate::record::Envelope;
use crate::utils::BEACON_CONTENT_TYPE;

/// Fire-and-forget POST of the envelope as a plain-text body
///
/// The collector's response status is not inspected; only failing to hand
/// the request to the network is an error.
#[derive(Debug, Clone)]
pub struct BeaconTransport {
    client: reqwest::Client,
}

impl BeaconTransport {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for BeaconTransport {
    fn name(&self) -> &'static str {
        "beacon"
    }

    fn deliver<'a>(
        &'a self,
        envelope: &'a Envelope,
        url: &'a str,
    ) -> BoxFuture<'a, Result<(), TransportError>> {
        Box::pin(async move {
            let body = envelope.to_json()?;
            self.client
                .post(url)
                .header(CONTENT_TYPE, BEACON_CONTENT_TYPE)
                .body(body)
                .send()
                .await?;
            Ok(())
        })
    }
}
