use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::beacon::BeaconTransport;
use super::errors::TransportError;
use super::in_flight::InFlight;
use super::metrics::DeliveryMetrics;
use super::pixel::PixelTransport;
use super::request::RequestTransport;
use super::transport::{Transport, TransportKind, build_http_client};
use crate::config::{MonitorConfig, ReportHooks};
use crate::record::Envelope;

/// Chooses a transport and performs best-effort delivery
#[derive(Clone)]
pub struct DeliveryEngine {
    transport: Arc<dyn Transport>,
    /// Used by the teardown flush, which must be awaited
    flush_transport: Arc<dyn Transport>,
    metrics: DeliveryMetrics,
    in_flight: InFlight,
    handle: Handle,
}

impl DeliveryEngine {
    /// Build the configured transport plus the request transport used on teardown
    pub fn from_config(
        config: &MonitorConfig,
        hooks: &ReportHooks,
        handle: Handle,
    ) -> Result<Self, TransportError> {
        let client = build_http_client()?;
        let request: Arc<dyn Transport> = Arc::new(RequestTransport::new(
            client.clone(),
            hooks.configure_request.clone(),
        ));
        let transport: Arc<dyn Transport> = match TransportKind::select(config) {
            TransportKind::Pixel => Arc::new(PixelTransport::new(client)),
            TransportKind::Beacon => Arc::new(BeaconTransport::new(client)),
            TransportKind::Request => Arc::clone(&request),
        };
        tracing::debug!(transport = transport.name(), "Delivery engine ready");
        Ok(Self {
            transport,
            flush_transport: request,
            metrics: DeliveryMetrics::new(),
            in_flight: InFlight::new(),
            handle,
        })
    }

    /// Route every delivery, teardown included, through `transport`
    pub fn with_transport(transport: Arc<dyn Transport>, handle: Handle) -> Self {
        Self {
            flush_transport: Arc::clone(&transport),
            transport,
            metrics: DeliveryMetrics::new(),
            in_flight: InFlight::new(),
            handle,
        }
    }

    #[must_use]
    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    #[must_use]
    pub fn metrics(&self) -> &DeliveryMetrics {
        &self.metrics
    }

    /// Deliveries and dispatched sends that have not finished yet
    #[must_use]
    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// Schedule delivery without blocking the caller.
    ///
    /// The send runs on a tracked task after yielding once to the scheduler,
    /// so teardown can wait for it. Failures are logged and counted, never
    /// retried.
    pub fn report(&self, envelope: Envelope, url: String) -> JoinHandle<Result<(), TransportError>> {
        let transport = Arc::clone(&self.transport);
        let metrics = self.metrics.clone();
        self.in_flight.spawn(&self.handle, async move {
            tokio::task::yield_now().await;
            let records = envelope.len();
            match transport.deliver(&envelope, &url).await {
                Ok(()) => {
                    metrics.record_success(records);
                    tracing::debug!(
                        transport = transport.name(),
                        id = %envelope.id,
                        records,
                        "Envelope delivered"
                    );
                    Ok(())
                }
                Err(e) => {
                    metrics.record_failure();
                    tracing::warn!(
                        transport = transport.name(),
                        id = %envelope.id,
                        error = %e,
                        "Envelope delivery failed"
                    );
                    Err(e)
                }
            }
        })
    }

    /// Deliver on the caller's task through the request transport.
    ///
    /// Used when the host is shutting down; errors go back to the caller.
    pub async fn deliver_now(&self, envelope: &Envelope, url: &str) -> Result<(), TransportError> {
        match self.flush_transport.deliver(envelope, url).await {
            Ok(()) => {
                self.metrics.record_success(envelope.len());
                Ok(())
            }
            Err(e) => {
                self.metrics.record_failure();
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for DeliveryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryEngine")
            .field("transport", &self.transport.name())
            .field("flush_transport", &self.flush_transport.name())
            .field("metrics", &self.metrics.snapshot())
            .field("in_flight", &self.in_flight.pending())
            .finish()
    }
}
