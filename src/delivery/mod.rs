//! Envelope transports and the engine that schedules them
//!
//! Three transports share one [`Transport`] trait: a fire-and-forget beacon
//! POST, a request POST that honors the `configure_request` hook, and an
//! opt-in pixel GET carrying the envelope in its query string. The
//! [`DeliveryEngine`] picks one from the configuration and dispatches on a
//! spawned task so callers never wait on the network. Spawned work is
//! counted in an [`InFlight`] tracker that teardown drains.

pub mod beacon;
pub mod engine;
pub mod errors;
pub mod in_flight;
pub mod metrics;
pub mod pixel;
pub mod request;
pub mod transport;

pub use beacon::BeaconTransport;
pub use engine::DeliveryEngine;
pub use errors::TransportError;
pub use in_flight::InFlight;
pub use metrics::{DeliveryMetrics, DeliveryMetricsSnapshot};
pub use pixel::PixelTransport;
pub use request::RequestTransport;
pub use transport::{Transport, TransportKind, build_http_client};
