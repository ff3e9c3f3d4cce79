use futures::future::BoxFuture;
use reqwest::header::CONTENT_TYPE;

use super::errors::TransportError;
use super::transport::Transport;
use crate::config::ConfigureRequest;
use crate::record::Envelope;
use crate::utils::JSON_CONTENT_TYPE;

/// JSON POST whose request can be customized by the host
#[derive(Clone)]
pub struct RequestTransport {
    client: reqwest::Client,
    configure: Option<ConfigureRequest>,
}

impl RequestTransport {
    #[must_use]
    pub fn new(client: reqwest::Client, configure: Option<ConfigureRequest>) -> Self {
        Self { client, configure }
    }
}

impl Transport for RequestTransport {
    fn name(&self) -> &'static str {
        "request"
    }

    fn deliver<'a>(
        &'a self,
        envelope: &'a Envelope,
        url: &'a str,
    ) -> BoxFuture<'a, Result<(), TransportError>> {
        Box::pin(async move {
            let body = envelope.to_json()?;
            let mut request = self
                .client
                .post(url)
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .body(body);
            if let Some(configure) = &self.configure {
                request = configure(request);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
            Ok(())
        })
    }
}

impl std::fmt::Debug for RequestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestTransport")
            .field("configure", &self.configure.is_some())
            .finish()
    }
}
