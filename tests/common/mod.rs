//! Test utilities shared by the telemetry integration tests

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use kodegen_telemetry::config::MonitorConfigBuilder;
use kodegen_telemetry::config::WithAppId;
use kodegen_telemetry::record::{Envelope, ErrorData, EventRecord};
use kodegen_telemetry::{Client, MemoryStore, MonitorConfig, ReportHooks, Transport, TransportError};
use parking_lot::Mutex;
use tokio::sync::mpsc;

#[allow(dead_code)]
pub const TEST_URL: &str = "http://test/upload";

/// Transport that records every delivered envelope
#[allow(dead_code)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(Envelope, String)>>,
    tx: mpsc::UnboundedSender<Envelope>,
}

impl RecordingTransport {
    #[allow(dead_code)]
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Envelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                tx,
            }),
            rx,
        )
    }

    #[allow(dead_code)]
    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }

    #[allow(dead_code)]
    pub fn envelopes(&self) -> Vec<Envelope> {
        self.sent.lock().iter().map(|(e, _)| e.clone()).collect()
    }

    #[allow(dead_code)]
    pub fn urls(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(_, u)| u.clone()).collect()
    }
}

impl Transport for RecordingTransport {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn deliver<'a>(
        &'a self,
        envelope: &'a Envelope,
        url: &'a str,
    ) -> BoxFuture<'a, Result<(), TransportError>> {
        Box::pin(async move {
            self.sent.lock().push((envelope.clone(), url.to_string()));
            let _ = self.tx.send(envelope.clone());
            Ok(())
        })
    }
}

/// Config builder with the test app id and collector url
#[allow(dead_code)]
pub fn config() -> MonitorConfigBuilder<WithAppId> {
    MonitorConfig::builder()
        .app_id("test-app")
        .app_name("telemetry-tests")
        .url(TEST_URL)
        .user_id("user-1")
}

/// Client delivering into a fresh recording transport
#[allow(dead_code)]
pub fn client_with(
    config: MonitorConfig,
    hooks: ReportHooks,
) -> (Client, Arc<RecordingTransport>, mpsc::UnboundedReceiver<Envelope>) {
    let (transport, rx) = RecordingTransport::new();
    let client = Client::builder(config)
        .hooks(hooks)
        .transport(transport.clone())
        .store(Arc::new(MemoryStore::new()))
        .sampled(true)
        .build()
        .expect("client should build");
    (client, transport, rx)
}

#[allow(dead_code)]
pub fn client(
    config: MonitorConfig,
) -> (Client, Arc<RecordingTransport>, mpsc::UnboundedReceiver<Envelope>) {
    client_with(config, ReportHooks::default())
}

/// Wait for the next delivered envelope
#[allow(dead_code)]
pub async fn next_envelope(rx: &mut mpsc::UnboundedReceiver<Envelope>) -> Envelope {
    tokio::time::timeout(Duration::from_secs(30), rx.recv())
        .await
        .expect("timed out waiting for an envelope")
        .expect("transport channel closed")
}

/// Let spawned tasks run to completion
#[allow(dead_code)]
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[allow(dead_code)]
pub fn error_record(uid: &str, msg: &str) -> EventRecord {
    EventRecord::error("js-error", ErrorData::new("TypeError", uid, msg))
}

#[allow(dead_code)]
pub fn custom_record(sub_type: &str, n: u64) -> EventRecord {
    EventRecord::custom(sub_type, serde_json::json!({ "n": n }))
}

#[allow(dead_code)]
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
