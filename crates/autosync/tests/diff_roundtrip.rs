mod common;

use autosync::{diff, update_to_state, SyncDoc};
use common::{arb_state, arb_value, init_tracing};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_update_reaches_target(start in arb_state(), target in arb_state()) {
        let doc = SyncDoc::new();
        update_to_state(&doc, &start).unwrap();
        prop_assert_eq!(doc.state().unwrap(), start);

        update_to_state(&doc, &target).unwrap();
        prop_assert_eq!(doc.state().unwrap(), target.clone());
        prop_assert!(update_to_state(&doc, &target).unwrap().is_empty());
    }

    #[test]
    fn prop_self_diff_is_empty(v in arb_value()) {
        prop_assert!(diff(&v, &v.clone()).is_empty());
    }

    #[test]
    fn prop_diff_is_deterministic(a in arb_value(), b in arb_value()) {
        prop_assert_eq!(diff(&a, &b), diff(&a, &b));
    }
}

#[test]
fn list_reorder_with_edits_reaches_target() {
    init_tracing();
    let doc = common::doc_with(
        1,
        serde_json::json!({"todos": [
            {"id": 1, "title": "a"},
            {"id": 2, "title": "b"},
            {"id": 3, "title": "c"}
        ]}),
    );
    let target = common::value(serde_json::json!({"todos": [
        {"id": 3, "title": "c"},
        {"id": 4, "title": "d"},
        {"id": 1, "title": "A"}
    ]}));
    let ops = doc.update_to_state(&target).unwrap();
    let names: Vec<_> = ops.iter().map(|op| op.op_name()).collect();
    assert_eq!(names, ["remove", "move", "add", "replace"]);
    assert_eq!(doc.state().unwrap(), target);
}
