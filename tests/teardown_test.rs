//! Teardown must not lose work that was already handed to delivery

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use common::*;
use futures::future::BoxFuture;
use kodegen_telemetry::record::Envelope;
use kodegen_telemetry::{AfterFlush, Client, MemoryStore, MonitorConfig, Transport, TransportError};
use tokio::sync::oneshot;

/// Transport that takes a while before counting a delivery
struct SlowTransport {
    delay: Duration,
    delivered: AtomicUsize,
    records: AtomicUsize,
}

impl SlowTransport {
    fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            delivered: AtomicUsize::new(0),
            records: AtomicUsize::new(0),
        })
    }
}

impl Transport for SlowTransport {
    fn name(&self) -> &'static str {
        "slow"
    }

    fn deliver<'a>(
        &'a self,
        envelope: &'a Envelope,
        _url: &'a str,
    ) -> BoxFuture<'a, Result<(), TransportError>> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            self.records.fetch_add(envelope.len(), Ordering::SeqCst);
            self.delivered.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }
}

fn slow_client(config: MonitorConfig, transport: Arc<SlowTransport>) -> Client {
    Client::builder(config)
        .transport(transport)
        .store(Arc::new(MemoryStore::new()))
        .sampled(true)
        .build()
        .expect("client should build")
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("runtime")
}

#[test]
fn immediate_send_survives_runtime_shutdown_after_teardown() {
    init_logging();
    let transport = SlowTransport::new(Duration::from_millis(50));

    let rt = runtime();
    rt.block_on(async {
        let client = slow_client(config().build().expect("config"), transport.clone());
        client
            .report()
            .send(error_record("slow-1", "boom"), true)
            .await
            .expect("send");
        assert_eq!(transport.delivered.load(Ordering::SeqCst), 0);

        client.teardown().await.expect("teardown");
    });
    drop(rt);

    assert_eq!(transport.delivered.load(Ordering::SeqCst), 1);
}

#[test]
fn dispatched_send_survives_runtime_shutdown_after_teardown() {
    init_logging();
    let transport = SlowTransport::new(Duration::from_millis(50));

    let rt = runtime();
    rt.block_on(async {
        let client = slow_client(config().build().expect("config"), transport.clone());
        let _ = client.report().dispatch(error_record("slow-2", "bg"), true);
        let _ = client.report().dispatch(custom_record("perf", 1), false);

        let flushed = client.teardown().await.expect("teardown");
        assert_eq!(flushed, 1);
    });
    drop(rt);

    assert_eq!(transport.delivered.load(Ordering::SeqCst), 2);
    assert_eq!(transport.records.load(Ordering::SeqCst), 2);
}

#[test]
fn timer_flush_in_progress_is_awaited_by_teardown() {
    init_logging();
    let transport = SlowTransport::new(Duration::from_millis(300));

    let rt = runtime();
    rt.block_on(async {
        let client = slow_client(
            config().cache_num(1).flush_interval(10).build().expect("config"),
            transport.clone(),
        );
        client.report().send(custom_record("perf", 7), false).await.expect("send");
        // Past the quiet window; the batch is now on its way through the slow transport
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(client.report().buffer().is_empty());
        assert_eq!(transport.records.load(Ordering::SeqCst), 0);

        assert_eq!(client.teardown().await.expect("teardown"), 0);
    });
    drop(rt);

    assert_eq!(transport.records.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn interrupt_flushes_then_runs_chained_handler() {
    let (client, transport, _rx) = client(config().cache_num(50).build().expect("config"));
    client.report().send(custom_record("perf", 1), false).await.expect("send");

    let (fire, signal) = oneshot::channel::<()>();
    let chained = Arc::new(AtomicBool::new(false));
    let flag = chained.clone();
    let listener = client.flush_on_interrupt(
        async move { signal.await.map_err(std::io::Error::other) },
        AfterFlush::chain(move || flag.store(true, Ordering::SeqCst)),
    );

    assert!(!chained.load(Ordering::SeqCst));
    fire.send(()).expect("listener alive");
    listener.await.expect("listener task");

    assert!(chained.load(Ordering::SeqCst));
    assert_eq!(transport.count(), 1);
    assert!(client.report().buffer().is_empty());
}

#[tokio::test]
async fn failed_interrupt_listener_skips_handler() {
    init_logging();
    let (client, transport, _rx) = client(config().cache_num(50).build().expect("config"));
    client.report().send(custom_record("perf", 1), false).await.expect("send");

    let chained = Arc::new(AtomicBool::new(false));
    let flag = chained.clone();
    let listener = client.flush_on_interrupt(
        async { Err(std::io::Error::other("no signal support")) },
        AfterFlush::chain(move || flag.store(true, Ordering::SeqCst)),
    );
    listener.await.expect("listener task");

    assert!(!chained.load(Ordering::SeqCst));
    assert_eq!(transport.count(), 0);
    assert_eq!(client.report().buffer().len(), 1);
}
