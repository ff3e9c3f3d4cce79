//! Tests for the send pipeline: dedup, filters, hooks and batching

mod common;

use std::time::Duration;

use common::*;
use kodegen_telemetry::breadcrumb::{BreadcrumbEntry, BreadcrumbKind, SeverityLevel};
use kodegen_telemetry::record::{EventRecord, ReportData};
use kodegen_telemetry::{FlushPolicy, MonitorConfig, ReportError, ReportHooks, SendOutcome};
use serde_json::{Map, json};

#[tokio::test(start_paused = true)]
async fn duplicate_error_uid_reaches_transport_once() {
    let (client, transport, mut rx) = client(config().build().expect("config"));

    let first = client.report().send(error_record("42", "boom"), true).await;
    let second = client.report().send(error_record("42", "boom again"), true).await;

    assert_eq!(first.expect("first send"), SendOutcome::Dispatched);
    assert_eq!(second.expect("second send"), SendOutcome::Duplicate);

    let envelope = next_envelope(&mut rx).await;
    assert_eq!(envelope.len(), 1);
    tokio::time::sleep(Duration::from_secs(10)).await;
    settle().await;
    assert_eq!(transport.count(), 1);
    assert_eq!(client.metrics().report.duplicates, 1);
}

#[tokio::test(start_paused = true)]
async fn immediate_send_bypasses_the_buffer() {
    let (client, _transport, mut rx) = client(config().cache_num(50).build().expect("config"));

    let outcome = client
        .report()
        .send(custom_record("manual", 1), true)
        .await
        .expect("send");
    assert_eq!(outcome, SendOutcome::Dispatched);
    assert!(client.report().buffer().is_empty());

    let envelope = next_envelope(&mut rx).await;
    assert!(matches!(envelope.data, ReportData::Single(_)));
    assert_eq!(envelope.app_id, "test-app");
    assert_eq!(envelope.user_id, "user-1");
    assert_eq!(envelope.id.len(), 16);
}

#[tokio::test(start_paused = true)]
async fn batch_waits_for_threshold_then_flushes_all_records() {
    let (client, transport, mut rx) = client(config().cache_num(3).build().expect("config"));
    let report = client.report();

    for n in 0..2 {
        let outcome = report.send(custom_record("perf", n), false).await.expect("send");
        assert_eq!(outcome, SendOutcome::Buffered);
    }

    // quiet window elapses below the threshold: nothing is sent, nothing rescheduled
    tokio::time::sleep(Duration::from_millis(3_500)).await;
    settle().await;
    assert_eq!(transport.count(), 0);
    assert_eq!(report.buffer().len(), 2);
    assert!(!report.buffer().has_pending_timer());

    report.send(custom_record("perf", 2), false).await.expect("send");
    tokio::time::sleep(Duration::from_millis(1_000)).await;
    settle().await;
    assert_eq!(transport.count(), 0);

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    let envelope = next_envelope(&mut rx).await;
    match &envelope.data {
        ReportData::Batch(records) => {
            let ns: Vec<_> = records
                .iter()
                .map(|r| r.main_data.to_value()["n"].as_u64())
                .collect();
            assert_eq!(ns, vec![Some(0), Some(1), Some(2)]);
        }
        ReportData::Single(_) => panic!("expected a batch envelope"),
    }
    assert!(report.buffer().is_empty());
    settle().await;
    assert_eq!(transport.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn each_buffered_send_restarts_the_quiet_window() {
    let (client, transport, mut rx) = client(config().cache_num(1).build().expect("config"));
    let report = client.report();

    for n in 0..4 {
        report.send(custom_record("perf", n), false).await.expect("send");
        tokio::time::sleep(Duration::from_millis(2_000)).await;
        settle().await;
        assert_eq!(transport.count(), 0, "flushed before the window went quiet");
    }

    let envelope = next_envelope(&mut rx).await;
    assert_eq!(envelope.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn flush_partial_policy_delivers_below_threshold() {
    let config = config()
        .cache_num(50)
        .flush_policy(FlushPolicy::FlushPartial)
        .build()
        .expect("config");
    let (client, _transport, mut rx) = client(config);

    client.report().send(custom_record("perf", 1), false).await.expect("send");
    let envelope = next_envelope(&mut rx).await;
    assert_eq!(envelope.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn ignored_messages_are_dropped() {
    let config = config().ignore_error("ResizeObserver").build().expect("config");
    let (client, transport, _rx) = client(config);

    let outcome = client
        .report()
        .send(error_record("7", "ResizeObserver loop limit exceeded"), true)
        .await
        .expect("send");
    assert_eq!(outcome, SendOutcome::Ignored);
    settle().await;
    assert_eq!(transport.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn missing_url_aborts_the_send() {
    init_logging();
    let config = MonitorConfig::builder()
        .app_id("test-app")
        .user_id("user-1")
        .build()
        .expect("config without url is valid");
    let (client, transport, _rx) = client(config);

    let result = client.report().send(error_record("1", "boom"), true).await;
    assert!(matches!(result, Err(ReportError::MissingUrl)));
    settle().await;
    assert_eq!(transport.count(), 0);
    assert_eq!(client.metrics().report.missing_url, 1);
}

#[tokio::test(start_paused = true)]
async fn hook_can_cancel_or_rewrite_records() {
    let hooks = ReportHooks::new().before_data_report(|mut record: EventRecord| async move {
        if record.sub_type == "secret" {
            return None;
        }
        record.sub_type = format!("{}-checked", record.sub_type);
        Some(record)
    });
    let (client, _transport, mut rx) = client_with(config().build().expect("config"), hooks);

    let cancelled = client
        .report()
        .send(custom_record("secret", 1), true)
        .await
        .expect("send");
    assert_eq!(cancelled, SendOutcome::Cancelled);

    client
        .report()
        .send(custom_record("public", 2), true)
        .await
        .expect("send");
    let envelope = next_envelope(&mut rx).await;
    assert_eq!(envelope.data.records()[0].sub_type, "public-checked");
}

#[tokio::test(start_paused = true)]
async fn small_resources_are_dropped() {
    let config = config()
        .resource_limit_size(Some(1_000))
        .build()
        .expect("config");
    let (client, _transport, _rx) = client(config);

    let resource = |size: u64| {
        let mut data = Map::new();
        data.insert("transferSize".into(), json!(size));
        EventRecord::performance("resource", data)
    };

    let small = client.report().send(resource(500), false).await.expect("send");
    let large = client.report().send(resource(5_000), false).await.expect("send");
    assert_eq!(small, SendOutcome::BelowResourceLimit);
    assert_eq!(large, SendOutcome::Buffered);
}

#[tokio::test(start_paused = true)]
async fn error_records_carry_breadcrumbs_and_defaults() {
    let hooks = ReportHooks::new().page_url(|| "https://app.test/cart".to_string());
    let (client, _transport, mut rx) = client_with(config().build().expect("config"), hooks);

    client.push_breadcrumb(
        BreadcrumbEntry::new(BreadcrumbKind::Click, json!({ "id": "buy" }), SeverityLevel::Info)
            .at(10),
    );
    client
        .report()
        .send(error_record("9", "checkout failed"), true)
        .await
        .expect("send");

    let envelope = next_envelope(&mut rx).await;
    let record = envelope.data.records()[0].clone();
    assert_eq!(record.page_url, "https://app.test/cart");
    assert!(record.time > 0);
    let crumbs = record.breadcrumb_data.expect("breadcrumbs attached");
    assert_eq!(crumbs.len(), 1);
    assert_eq!(crumbs[0].data, json!({ "id": "buy" }));

    let wire = serde_json::to_value(&envelope).expect("serializes");
    assert_eq!(wire["appID"], "test-app");
    assert_eq!(wire["data"]["breadcrumbData"][0]["type"], "Click");
}

#[tokio::test(start_paused = true)]
async fn teardown_flushes_everything_buffered() {
    let (client, transport, mut rx) = client(config().cache_num(50).build().expect("config"));

    for n in 0..2 {
        client.report().send(custom_record("perf", n), false).await.expect("send");
    }
    assert!(client.report().buffer().has_pending_timer());

    let flushed = client.teardown().await.expect("teardown");
    assert_eq!(flushed, 2);
    assert!(client.report().buffer().is_empty());
    assert!(!client.report().buffer().has_pending_timer());

    let envelope = next_envelope(&mut rx).await;
    assert_eq!(envelope.len(), 2);
    assert_eq!(transport.urls(), vec![TEST_URL.to_string()]);

    assert_eq!(client.teardown().await.expect("second teardown"), 0);
}

#[tokio::test(start_paused = true)]
async fn dispatch_runs_send_in_the_background() {
    let (client, _transport, mut rx) = client(config().build().expect("config"));
    let handle = client.report().dispatch(error_record("5", "bg"), true);
    assert_eq!(handle.await.expect("join").expect("send"), SendOutcome::Dispatched);
    let envelope = next_envelope(&mut rx).await;
    assert_eq!(envelope.len(), 1);
}
