#![allow(dead_code)]

use autosync::{DocOptions, SyncDoc, Value};
use proptest::prelude::*;

/// Route `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn replica(client_id: u64) -> SyncDoc {
    SyncDoc::with_options(DocOptions {
        client_id: Some(client_id),
    })
}

pub fn value(json: serde_json::Value) -> Value {
    Value::try_from(json).expect("fixture must convert")
}

pub fn doc_with(client_id: u64, state: serde_json::Value) -> SyncDoc {
    let doc = replica(client_id);
    doc.update_to_state(&value(state)).expect("fixture must apply");
    doc
}

// ── Strategies ──────────────────────────────────────────────────────────────

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(Value::Int),
        (-1000i32..1000).prop_map(|n| Value::Float(f64::from(n) / 4.0)),
        "[a-c]{0,3}".prop_map(Value::Text),
    ]
}

/// Values of bounded depth and width. Small alphabets make list elements
/// and map keys collide often, which exercises moves and nested diffs.
pub fn arb_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::List),
            prop::collection::btree_map("[a-d]", inner, 0..4).prop_map(Value::Map),
        ]
    })
}

/// Root documents are always maps.
pub fn arb_state() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-e]", arb_value(), 0..5).prop_map(Value::Map)
}
