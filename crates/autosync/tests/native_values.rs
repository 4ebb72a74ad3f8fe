mod common;

use std::collections::BTreeMap;

use autosync::{to_value, ErrorKind, SyncDoc, Value};
use serde::Serialize;

#[derive(Serialize)]
struct Settings {
    theme: Theme,
    font_size: u16,
    ratio: f64,
    recent: Vec<String>,
    owner: Option<String>,
    limits: BTreeMap<String, i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Theme {
    Dark,
}

#[test]
fn native_struct_drives_the_document() {
    common::init_tracing();
    let settings = Settings {
        theme: Theme::Dark,
        font_size: 14,
        ratio: 1.5,
        recent: vec!["a.txt".into()],
        owner: None,
        limits: [("cpu".to_string(), 4)].into_iter().collect(),
    };
    let target = to_value(&settings).unwrap();
    let doc = SyncDoc::new();
    doc.update_to_state(&target).unwrap();

    assert_eq!(
        doc.to_json().unwrap(),
        serde_json::json!({
            "theme": "dark",
            "font_size": 14,
            "ratio": 1.5,
            "recent": ["a.txt"],
            "owner": null,
            "limits": {"cpu": 4}
        })
    );
    assert_eq!(doc.state().unwrap().get("font_size"), Some(&Value::Int(14)));
}

#[test]
fn oversized_unsigned_is_rejected_before_reaching_the_document() {
    #[derive(Serialize)]
    struct Counter {
        hits: u64,
    }
    let err = to_value(&Counter { hits: u64::MAX }).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
    assert!(to_value(&Counter { hits: 1 << 40 }).is_ok());
}

#[test]
fn json_text_round_trips_through_the_document() {
    let text = r#"{"a":[1,2.5,"x",null,true],"b":{"c":{}}}"#;
    let doc = SyncDoc::new();
    doc.update_to_state(&Value::from_json_str(text).unwrap()).unwrap();
    assert_eq!(doc.state().unwrap().to_json_string().unwrap(), text);
}
