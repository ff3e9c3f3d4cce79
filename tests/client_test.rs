//! Plugin activation, gating and the client surface

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use common::*;
use kodegen_telemetry::plugin::{PluginKind, SkipReason};
use kodegen_telemetry::{
    Client, EventKind, FnPlugin, InstrumentationGuard, LogEntry, MemoryStore, MonitorConfig,
    Plugin, PluginError, PluginGate, ReportHooks, SendOutcome,
};
use serde_json::json;

/// Plugin counting its monitor calls
fn spy(name: &str, kind: PluginKind, calls: Arc<AtomicUsize>) -> Arc<dyn Plugin> {
    Arc::new(FnPlugin::new(name, kind).on_monitor(move |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }))
}

#[tokio::test]
async fn disabled_plugin_flag_skips_monitor() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (client, _transport, _rx) = client(
        config().disable_plugin("js-error").build().expect("config"),
    );

    let summary = client.use_plugins(vec![spy("js-error", PluginKind::Error, calls.clone())]);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(summary.skip_reason("js-error"), Some(&SkipReason::PluginDisabled));
    assert_eq!(summary.bus.subscriber_count("js-error"), 0);
}

#[tokio::test]
async fn disabled_kind_flag_skips_monitor() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (client, _transport, _rx) = client(
        config()
            .disable_kind(EventKind::Performance)
            .build()
            .expect("config"),
    );

    let summary = client.use_plugins(vec![
        spy("resource", PluginKind::Performance, calls.clone()),
        spy("route", PluginKind::Behavior, calls.clone()),
    ]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(summary.skip_reason("resource"), Some(&SkipReason::KindDisabled));
    assert!(summary.is_active("route"));
}

#[tokio::test]
async fn unsampled_client_skips_performance_plugins_only() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (transport, _rx) = RecordingTransport::new();
    let client = Client::builder(config().sample(0.0).build().expect("config"))
        .transport(transport)
        .store(Arc::new(MemoryStore::new()))
        .build()
        .expect("client");
    assert!(!client.is_sampled());

    let summary = client.use_plugins(vec![
        spy("resource", PluginKind::Performance, calls.clone()),
        spy("js-error", PluginKind::Error, calls.clone()),
    ]);
    assert_eq!(summary.skip_reason("resource"), Some(&SkipReason::NotSampled));
    assert!(summary.is_active("js-error"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn injected_gate_overrides_config_toggles() {
    struct ErrorsOnly;
    impl PluginGate for ErrorsOnly {
        fn is_kind_enabled(&self, kind: EventKind) -> bool {
            kind == EventKind::Error
        }
        fn is_plugin_enabled(&self, _name: &str) -> bool {
            true
        }
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let (transport, _rx) = RecordingTransport::new();
    let client = Client::builder(config().build().expect("config"))
        .transport(transport)
        .store(Arc::new(MemoryStore::new()))
        .gate(Arc::new(ErrorsOnly))
        .build()
        .expect("client");

    let summary = client.use_plugins(vec![
        spy("route", PluginKind::Behavior, calls.clone()),
        spy("js-error", PluginKind::Error, calls.clone()),
    ]);
    assert_eq!(summary.activated, vec!["js-error".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn data_published_during_monitor_is_reported() {
    let (client, _transport, mut rx) = client(config().cache_num(1).build().expect("config"));

    let plugin = FnPlugin::new("custom-event", PluginKind::Custom)
        .on_monitor(|notifier| {
            notifier.notify("custom-event", json!({ "msg": "boom" }));
            Ok(None)
        })
        .on_consume(|client, record| {
            let _ = client.report().dispatch(record, false);
            Ok(())
        });
    let summary = client.use_plugin(plugin);
    assert!(summary.is_active("custom-event"));

    let envelope = next_envelope(&mut rx).await;
    let records = envelope.data.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, EventKind::Custom);
    assert_eq!(records[0].sub_type, "custom-event");
    assert_eq!(records[0].main_data.to_value()["msg"], "boom");
}

#[tokio::test]
async fn transform_returning_none_skips_consume() {
    let consumed = Arc::new(AtomicBool::new(false));
    let (client, _transport, _rx) = client(config().build().expect("config"));

    let flag = consumed.clone();
    let plugin = FnPlugin::new("quiet", PluginKind::Behavior)
        .on_transform(|_, _| Ok(None))
        .on_consume(move |_, _| {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });
    let summary = client.use_plugin(plugin);
    summary.bus.notify("quiet", &json!({}));
    assert!(!consumed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn each_use_plugins_call_gets_its_own_bus() {
    let (client, _transport, _rx) = client(config().build().expect("config"));
    let hits = Arc::new(AtomicUsize::new(0));

    let counting = |hits: Arc<AtomicUsize>| -> Arc<dyn Plugin> {
        Arc::new(FnPlugin::new("shared", PluginKind::Custom).on_consume(move |_, _| {
            hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }))
    };

    let first = client.use_plugins(vec![counting(hits.clone())]);
    let second = client.use_plugins(vec![counting(hits.clone())]);
    assert!(!Arc::ptr_eq(&first.bus, &second.bus));
    assert_eq!(client.activation_count(), 2);

    first.bus.notify("shared", &json!({}));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failing_monitor_is_isolated() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (client, _transport, _rx) = client(config().build().expect("config"));

    let broken: Arc<dyn Plugin> = Arc::new(
        FnPlugin::new("broken", PluginKind::Error)
            .on_monitor(|_| Err(PluginError::other("no hook available"))),
    );
    let panicky: Arc<dyn Plugin> =
        Arc::new(FnPlugin::new("panicky", PluginKind::Error).on_monitor(|_| panic!("bad install")));
    let summary = client.use_plugins(vec![
        broken,
        panicky,
        spy("healthy", PluginKind::Error, calls.clone()),
    ]);

    assert!(matches!(
        summary.skip_reason("broken"),
        Some(SkipReason::MonitorFailed(msg)) if msg.contains("no hook available")
    ));
    assert!(matches!(
        summary.skip_reason("panicky"),
        Some(SkipReason::MonitorFailed(msg)) if msg.contains("bad install")
    ));
    assert!(summary.is_active("healthy"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn teardown_uninstalls_instrumentation() {
    let restored = Arc::new(AtomicUsize::new(0));
    let (client, _transport, _rx) = client(config().build().expect("config"));

    let counter = restored.clone();
    let plugin = FnPlugin::new("hooked", PluginKind::Behavior).on_monitor(move |_| {
        let counter = counter.clone();
        Ok(Some(InstrumentationGuard::new("hooked", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })))
    });
    client.use_plugin(plugin);
    assert_eq!(restored.load(Ordering::SeqCst), 0);

    client.teardown().await.expect("teardown");
    assert_eq!(restored.load(Ordering::SeqCst), 1);
    assert_eq!(client.activation_count(), 0);

    client.teardown().await.expect("second teardown");
    assert_eq!(restored.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn log_fills_defaults() {
    let hooks = ReportHooks::new().page_url(|| "app://home".to_string());
    let (client, _transport, mut rx) = client_with(config().build().expect("config"), hooks);

    let outcome = client
        .log(LogEntry::new(json!({ "clicked": "buy" })), true)
        .await
        .expect("log");
    assert_eq!(outcome, SendOutcome::Dispatched);

    let envelope = next_envelope(&mut rx).await;
    let record = envelope.data.records()[0].clone();
    assert_eq!(record.kind, EventKind::Custom);
    assert_eq!(record.sub_type, "custom");
    assert_eq!(record.page_url, "app://home");
    assert!(record.time > 0);
    assert_eq!(record.main_data.to_value(), json!({ "clicked": "buy" }));
}

#[tokio::test]
async fn log_keeps_explicit_fields() {
    let (client, _transport, mut rx) = client(config().build().expect("config"));

    client
        .log(
            LogEntry::new(json!({ "msg": "late" }))
                .kind(EventKind::Behavior)
                .sub_type("checkout")
                .page_url("app://cart")
                .time(42),
            true,
        )
        .await
        .expect("log");

    let envelope = next_envelope(&mut rx).await;
    let record = envelope.data.records()[0].clone();
    assert_eq!(record.kind, EventKind::Behavior);
    assert_eq!(record.sub_type, "checkout");
    assert_eq!(record.page_url, "app://cart");
    assert_eq!(record.time, 42);
}

#[tokio::test]
async fn user_id_is_generated_and_persisted_when_not_configured() {
    let store = Arc::new(MemoryStore::new());
    let build = |store: Arc<MemoryStore>| {
        let (transport, _rx) = RecordingTransport::new();
        Client::builder(
            MonitorConfig::builder()
                .app_id("test-app")
                .url(TEST_URL)
                .build()
                .expect("config"),
        )
        .transport(transport)
        .store(store)
        .build()
        .expect("client")
    };

    let first = build(store.clone());
    let second = build(store);
    assert_eq!(first.user_id().len(), 16);
    assert_eq!(first.user_id(), second.user_id());
}

#[test]
fn building_outside_a_runtime_fails() {
    let result = Client::new(config().build().expect("config"));
    assert!(result.is_err());
}
