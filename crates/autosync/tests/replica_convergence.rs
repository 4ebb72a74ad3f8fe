mod common;

use autosync::Value;
use common::{arb_state, doc_with, init_tracing, replica, value};
use proptest::prelude::*;
use serde_json::json;

#[test]
fn concurrent_edits_converge_in_either_merge_order() {
    init_tracing();
    let base = doc_with(9, json!({"shared": {"n": 0}, "list": [1, 2]}));
    let a = replica(1);
    let b = replica(2);
    let c = replica(3);
    let snapshot = base.snapshot().unwrap();
    a.merge(&snapshot).unwrap();
    b.merge(&snapshot).unwrap();
    c.merge(&snapshot).unwrap();

    a.update_to_state(&value(json!({"shared": {"n": 1}, "list": [1, 2, 3], "a": true})))
        .unwrap();
    b.update_to_state(&value(json!({"shared": {"n": 0, "m": "b"}, "list": [0, 1, 2]})))
        .unwrap();

    let from_a = a.snapshot().unwrap();
    let from_b = b.snapshot().unwrap();

    a.merge(&from_b).unwrap();
    b.merge(&from_a).unwrap();
    c.merge(&from_b).unwrap();
    c.merge(&from_a).unwrap();

    let state = a.state().unwrap();
    assert_eq!(b.state().unwrap(), state);
    assert_eq!(c.state().unwrap(), state);
    assert_eq!(state.get("a"), Some(&Value::Bool(true)));
    assert_eq!(state.get("shared").and_then(|s| s.get("m")), Some(&Value::from("b")));
    let list = state.get("list").and_then(Value::as_list).unwrap();
    assert_eq!(list.len(), 4);
}

#[test]
fn merging_twice_is_idempotent() {
    let a = doc_with(1, json!({"k": [1, {"x": "y"}]}));
    let b = replica(2);
    let blob = a.snapshot().unwrap();
    b.merge(&blob).unwrap();
    let once = b.state().unwrap();
    b.merge(&blob).unwrap();
    assert_eq!(b.state().unwrap(), once);
    assert_eq!(once, a.state().unwrap());
}

#[test]
fn delta_snapshot_matches_full_snapshot() {
    let a = doc_with(1, json!({"x": 1}));
    let full = replica(2);
    let delta = replica(3);
    let seed = a.snapshot().unwrap();
    full.merge(&seed).unwrap();
    delta.merge(&seed).unwrap();

    a.update_to_state(&value(json!({"x": 2, "y": [true]}))).unwrap();
    full.merge(&a.snapshot().unwrap()).unwrap();
    delta
        .merge(&a.snapshot_since(&delta.state_vector().unwrap()).unwrap())
        .unwrap();

    assert_eq!(full.state().unwrap(), delta.state().unwrap());
    assert_eq!(delta.state().unwrap(), a.state().unwrap());
}

#[test]
fn numbers_survive_replication() {
    let a = doc_with(1, json!({"i": 7, "f": 7.5, "big": i64::MAX}));
    let b = replica(2);
    b.merge(&a.snapshot().unwrap()).unwrap();
    let expected = value(json!({"i": 7, "f": 7.5, "big": i64::MAX}));
    assert!(b.state().unwrap().numeric_eq(&expected));
}

#[test]
fn edits_after_merge_flow_back() {
    let a = doc_with(1, json!({"items": [{"id": 1}]}));
    let b = replica(2);
    b.merge(&a.snapshot().unwrap()).unwrap();
    b.update_to_state(&value(json!({"items": [{"id": 1, "done": true}, {"id": 2}]})))
        .unwrap();
    a.merge(&b.snapshot_since(&a.state_vector().unwrap()).unwrap()).unwrap();
    assert_eq!(a.state().unwrap(), b.state().unwrap());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_independent_replicas_converge(left in arb_state(), right in arb_state()) {
        let a = replica(1);
        let b = replica(2);
        a.update_to_state(&left).unwrap();
        b.update_to_state(&right).unwrap();
        let from_a = a.snapshot().unwrap();
        let from_b = b.snapshot().unwrap();
        a.merge(&from_b).unwrap();
        b.merge(&from_a).unwrap();
        b.merge(&from_a).unwrap();
        prop_assert_eq!(a.state().unwrap(), b.state().unwrap());
    }
}

fn generated_state(iteration: i64) -> Value {
    let nested: serde_json::Map<String, serde_json::Value> = (0..=iteration % 5)
        .map(|j| (format!("nested_key_{iteration}_{j}"), json!((iteration * 31 + j) as f64 / 8.0)))
        .collect();
    let slice: Vec<serde_json::Value> = (0..=iteration % 10)
        .map(|j| match (iteration + j) % 4 {
            0 => json!(iteration.wrapping_mul(0x9E37_79B9_7F4A_7C15u64 as i64)),
            1 => json!(format!("str_{iteration}_{j}")),
            2 => json!(j % 2 == 0),
            _ => json!(null),
        })
        .collect();
    value(json!({
        format!("message_{iteration}"): format!("hello {iteration}"),
        format!("count_{iteration}"): iteration * 7,
        format!("valid_{iteration}"): iteration % 2 == 0,
        format!("float_{iteration}"): iteration as f64 * 1.25,
        format!("nested_map_{iteration}"): nested,
        format!("nested_slice_{iteration}"): slice,
        format!("null_val_{iteration}"): null,
    }))
}

#[test]
fn repeated_create_update_merge_cycles() {
    for iteration in 0..200 {
        let target = generated_state(iteration);
        let a = autosync::SyncDoc::new();
        a.update_to_state(&target).unwrap();
        assert_eq!(a.state().unwrap(), target, "iteration {iteration}");

        let blob = a.snapshot().unwrap();
        assert!(!blob.is_empty());
        let b = autosync::SyncDoc::new();
        b.merge(&blob).unwrap();
        assert!(b.state().unwrap().numeric_eq(&target), "iteration {iteration}");
    }
}
