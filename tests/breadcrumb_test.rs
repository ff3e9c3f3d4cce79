//! Tests for the breadcrumb ring

use kodegen_telemetry::breadcrumb::{Breadcrumb, BreadcrumbEntry, BreadcrumbKind, SeverityLevel};
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn entry(n: i64) -> BreadcrumbEntry {
    BreadcrumbEntry::new(BreadcrumbKind::Click, json!({ "n": n }), SeverityLevel::Info).at(n)
}

#[test]
fn ring_keeps_the_most_recent_entries() {
    let history = Breadcrumb::new(10, None);
    for n in 1..=15 {
        history.push(entry(n));
    }

    let stack = history.get_stack();
    assert_eq!(stack.len(), 10);
    let times: Vec<i64> = stack.iter().filter_map(|e| e.time).collect();
    assert_eq!(times, (6..=15).collect::<Vec<_>>());
}

#[test]
fn late_completions_are_sorted_into_place() {
    let history = Breadcrumb::new(10, None);
    history.push(entry(100));
    let stack = history.push(entry(50));

    let times: Vec<i64> = stack.iter().filter_map(|e| e.time).collect();
    assert_eq!(times, vec![50, 100]);
}

#[test]
fn equal_times_keep_insertion_order() {
    let history = Breadcrumb::new(10, None);
    for label in ["first", "second", "third"] {
        history.push(
            BreadcrumbEntry::new(BreadcrumbKind::Route, json!(label), SeverityLevel::Info).at(7),
        );
    }
    let labels: Vec<_> = history.get_stack().into_iter().map(|e| e.data).collect();
    assert_eq!(labels, vec![json!("first"), json!("second"), json!("third")]);
}

#[test]
fn missing_time_is_assigned_on_push() {
    let history = Breadcrumb::default();
    let stack = history.push(BreadcrumbEntry::new(
        BreadcrumbKind::Customer,
        json!({}),
        SeverityLevel::Info,
    ));
    assert!(stack[0].time.is_some_and(|t| t > 0));
}

#[test]
fn hook_can_drop_entries() {
    let history = Breadcrumb::new(
        10,
        Some(Arc::new(|entry: BreadcrumbEntry| {
            (entry.kind != BreadcrumbKind::Click).then_some(entry)
        })),
    );
    history.push(entry(1));
    let stack = history.push(
        BreadcrumbEntry::new(BreadcrumbKind::Route, json!({}), SeverityLevel::Info).at(2),
    );
    assert_eq!(stack.len(), 1);
    assert_eq!(stack[0].kind, BreadcrumbKind::Route);
}

#[test]
fn hook_can_replace_entries() {
    let history = Breadcrumb::new(
        10,
        Some(Arc::new(|mut entry: BreadcrumbEntry| {
            entry.data = json!({ "redacted": true });
            Some(entry)
        })),
    );
    let stack = history.push(entry(1));
    assert_eq!(stack[0].data, json!({ "redacted": true }));
}

#[test]
fn clear_empties_the_history() {
    let history = Breadcrumb::new(3, None);
    history.push(entry(1));
    history.push(entry(2));
    history.clear();
    assert!(history.is_empty());
}

#[test]
fn kinds_serialize_with_display_names() {
    let value = serde_json::to_value(
        BreadcrumbEntry::new(BreadcrumbKind::CodeError, json!({}), SeverityLevel::Error).at(1),
    )
    .expect("serializes");
    assert_eq!(value["type"], "Code Error");
    assert_eq!(value["level"], "error");

    let other = serde_json::to_value(BreadcrumbKind::Other("UI.Tap".into())).expect("serializes");
    assert_eq!(other, json!("UI.Tap"));
}

proptest! {
    #[test]
    fn history_is_bounded_and_sorted(times in prop::collection::vec(0i64..1_000, 0..40), max in 1usize..15) {
        let history = Breadcrumb::new(max, None);
        for t in &times {
            history.push(entry(*t));
        }
        let stack = history.get_stack();
        prop_assert_eq!(stack.len(), times.len().min(max));
        prop_assert!(stack.windows(2).all(|w| w[0].time <= w[1].time));
    }
}
