//! Structural diff: generate a patch that turns one [`Value`] into another.
//!
//! Maps are compared key by key. Lists are compared by element identity
//! (see [`DiffOptions`]): unmatched old elements are removed, matched ones
//! are moved into place, unmatched new ones are added, and matched pairs
//! whose content changed are diffed recursively at their final position.
//! Everything else that differs is replaced wholesale.
//!
//! The output applies strictly left to right; every index in it is valid
//! against the list as left by the operations before it.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use crate::json_patch::Op;
use crate::value::{stable, Map, Value};

type IdentityFn = dyn Fn(&Value) -> String + Send + Sync;

/// Options for [`diff_with`].
#[derive(Clone)]
pub struct DiffOptions {
    identity: Arc<IdentityFn>,
}

impl DiffOptions {
    /// Use `identity` to decide which old and new list elements are the
    /// same element. Elements with equal identity strings are paired up in
    /// order of appearance.
    pub fn with_identity<F>(identity: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        DiffOptions {
            identity: Arc::new(identity),
        }
    }

    pub fn identity(&self, value: &Value) -> String {
        (self.identity)(value)
    }
}

impl Default for DiffOptions {
    fn default() -> Self {
        DiffOptions::with_identity(default_identity)
    }
}

impl fmt::Debug for DiffOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffOptions").finish_non_exhaustive()
    }
}

/// Default list-element identity.
///
/// A map with an `id` field is identified by it, else a map with a `key`
/// field by that, else any value by its whole canonical encoding.
///
/// ```
/// use autosync::diff::default_identity;
/// use autosync::Value;
///
/// let item = Value::from_json_str(r#"{"id": 7, "name": "x"}"#).unwrap();
/// assert_eq!(default_identity(&item), "id:7");
/// assert_eq!(default_identity(&Value::from("x")), "val:\"x\"");
/// ```
pub fn default_identity(value: &Value) -> String {
    if let Some(map) = value.as_map() {
        if let Some(id) = map.get("id") {
            return format!("id:{}", stable::stringify(id));
        }
        if let Some(key) = map.get("key") {
            return format!("key:{}", stable::stringify(key));
        }
    }
    format!("val:{}", stable::stringify(value))
}

// ── Public API ────────────────────────────────────────────────────────────

/// Generate a patch that transforms `src` into `dst` using default options.
pub fn diff(src: &Value, dst: &Value) -> Vec<Op> {
    diff_with(src, dst, &DiffOptions::default())
}

/// Generate a patch that transforms `src` into `dst`.
pub fn diff_with(src: &Value, dst: &Value, options: &DiffOptions) -> Vec<Op> {
    let mut ops = Vec::new();
    diff_at_path(&mut ops, &[], src, dst, options);
    ops
}

// ── Core recursive differ ─────────────────────────────────────────────────

fn child(path: &[String], step: impl ToString) -> Vec<String> {
    let mut p = path.to_vec();
    p.push(step.to_string());
    p
}

fn diff_at_path(ops: &mut Vec<Op>, path: &[String], src: &Value, dst: &Value, options: &DiffOptions) {
    if src == dst {
        return;
    }
    match (src, dst) {
        (Value::Map(s), Value::Map(d)) => diff_map(ops, path, s, d, options),
        (Value::List(s), Value::List(d)) => diff_list(ops, path, s, d, options),
        _ => ops.push(Op::Replace {
            path: path.to_vec(),
            value: dst.clone(),
        }),
    }
}

fn diff_map(
    ops: &mut Vec<Op>,
    path: &[String],
    src: &Map,
    dst: &Map,
    options: &DiffOptions,
) {
    for key in src.keys() {
        if !dst.contains_key(key) {
            ops.push(Op::Remove {
                path: child(path, key),
            });
        }
    }
    for (key, dst_val) in dst {
        let p = child(path, key);
        match src.get(key) {
            None => ops.push(Op::Add {
                path: p,
                value: dst_val.clone(),
            }),
            Some(src_val) => diff_at_path(ops, &p, src_val, dst_val, options),
        }
    }
}

/// Pair each new element with the first unmatched old element of equal
/// identity. Returns, per new index, the matched old index.
fn match_elements(src: &[Value], dst: &[Value], options: &DiffOptions) -> Vec<Option<usize>> {
    let mut free: HashMap<String, VecDeque<usize>> = HashMap::new();
    for (i, v) in src.iter().enumerate() {
        free.entry(options.identity(v)).or_default().push_back(i);
    }
    dst.iter()
        .map(|v| free.get_mut(&options.identity(v)).and_then(VecDeque::pop_front))
        .collect()
}

fn diff_list(ops: &mut Vec<Op>, path: &[String], src: &[Value], dst: &[Value], options: &DiffOptions) {
    let matches = match_elements(src, dst, options);

    let mut kept = vec![false; src.len()];
    for i in matches.iter().flatten() {
        kept[*i] = true;
    }

    // Highest index first so earlier removals do not shift later ones.
    for i in (0..src.len()).rev() {
        if !kept[i] {
            ops.push(Op::Remove {
                path: child(path, i),
            });
        }
    }

    // Simulated list: old index of each element, `None` for added ones.
    let mut current: Vec<Option<usize>> = (0..src.len()).filter(|&i| kept[i]).map(Some).collect();

    for (j, matched) in matches.iter().enumerate() {
        match matched {
            Some(i) => {
                // Positions before j are final, so the element sits at k >= j.
                let k = current[j..]
                    .iter()
                    .position(|slot| *slot == Some(*i))
                    .map_or(j, |offset| j + offset);
                if k != j {
                    ops.push(Op::Move {
                        path: child(path, j),
                        from: child(path, k),
                    });
                    let slot = current.remove(k);
                    current.insert(j, slot);
                }
            }
            None => {
                ops.push(Op::Add {
                    path: child(path, j),
                    value: dst[j].clone(),
                });
                current.insert(j, None);
            }
        }
    }

    for (j, matched) in matches.iter().enumerate() {
        if let Some(i) = matched {
            diff_at_path(ops, &child(path, j), &src[*i], &dst[j], options);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::try_from(json).unwrap()
    }

    fn p(steps: &[&str]) -> Vec<String> {
        steps.iter().map(|s| s.to_string()).collect()
    }

    /// Minimal in-memory applier, enough to check that diff output is
    /// well-formed without a document.
    fn apply(mut doc: Value, ops: &[Op]) -> Value {
        fn slot<'a>(doc: &'a mut Value, path: &[String]) -> &'a mut Value {
            path.iter().fold(doc, |node, step| match node {
                Value::Map(m) => m.get_mut(step).unwrap(),
                Value::List(l) => &mut l[step.parse::<usize>().unwrap()],
                _ => panic!("leaf in path"),
            })
        }
        fn take(doc: &mut Value, path: &[String]) -> Value {
            let (last, parent) = path.split_last().unwrap();
            match slot(doc, parent) {
                Value::Map(m) => m.remove(last).unwrap(),
                Value::List(l) => l.remove(last.parse().unwrap()),
                _ => panic!("leaf parent"),
            }
        }
        fn put(doc: &mut Value, path: &[String], value: Value) {
            let (last, parent) = path.split_last().unwrap();
            match slot(doc, parent) {
                Value::Map(m) => {
                    m.insert(last.clone(), value);
                }
                Value::List(l) => l.insert(last.parse().unwrap(), value),
                _ => panic!("leaf parent"),
            }
        }
        for op in ops {
            match op {
                Op::Replace { path, value } if path.is_empty() => doc = value.clone(),
                Op::Replace { path, value } => *slot(&mut doc, path) = value.clone(),
                Op::Add { path, value } => put(&mut doc, path, value.clone()),
                Op::Remove { path } => {
                    take(&mut doc, path);
                }
                Op::Move { path, from } => {
                    let moved = take(&mut doc, from);
                    put(&mut doc, path, moved);
                }
                other => panic!("differ emitted {other:?}"),
            }
        }
        doc
    }

    #[test]
    fn adds_missing_key() {
        let ops = diff(&v(json!({"a": 1})), &v(json!({"a": 1, "b": 2})));
        assert_eq!(
            ops,
            vec![Op::Add {
                path: p(&["b"]),
                value: Value::Int(2)
            }]
        );
    }

    #[test]
    fn equal_values_produce_nothing() {
        let doc = v(json!({"a": [1, {"b": null}], "c": "x"}));
        assert!(diff(&doc, &doc.clone()).is_empty());
    }

    #[test]
    fn removes_precede_adds_in_key_order() {
        let ops = diff(&v(json!({"b": 1, "a": 1})), &v(json!({"d": 1, "c": 1})));
        let summary: Vec<_> = ops.iter().map(|o| (o.op_name(), o.path()[0].as_str())).collect();
        assert_eq!(summary, [("remove", "a"), ("remove", "b"), ("add", "c"), ("add", "d")]);
    }

    #[test]
    fn kind_change_replaces_subtree() {
        let ops = diff(&v(json!({"a": [1]})), &v(json!({"a": {"x": 1}})));
        assert_eq!(
            ops,
            vec![Op::Replace {
                path: p(&["a"]),
                value: v(json!({"x": 1}))
            }]
        );
        assert_eq!(diff(&Value::Int(1), &Value::Float(1.0)).len(), 1);
    }

    #[test]
    fn root_mismatch_replaces_with_empty_path() {
        let ops = diff(&v(json!({"a": 1})), &v(json!([1])));
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].op_name(), "replace");
        assert!(ops[0].path().is_empty());
    }

    #[test]
    fn swapped_ids_become_a_move() {
        let src = v(json!([{"id": 1}, {"id": 2}]));
        let dst = v(json!([{"id": 2}, {"id": 1}]));
        let ops = diff(&src, &dst);
        assert_eq!(
            ops,
            vec![Op::Move {
                path: p(&["0"]),
                from: p(&["1"])
            }]
        );
        assert_eq!(apply(src, &ops), dst);
    }

    #[test]
    fn matched_element_is_diffed_in_place() {
        let src = v(json!([{"id": 1, "n": "a"}, {"id": 2, "n": "b"}]));
        let dst = v(json!([{"id": 2, "n": "B"}, {"id": 1, "n": "a"}]));
        let ops = diff(&src, &dst);
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].op_name(), "move");
        assert_eq!(
            ops[1],
            Op::Replace {
                path: p(&["0", "n"]),
                value: Value::from("B")
            }
        );
        assert_eq!(apply(src, &ops), dst);
    }

    #[test]
    fn removals_run_from_the_end() {
        let src = v(json!([1, 2, 3, 4]));
        let dst = v(json!([2, 4]));
        let ops = diff(&src, &dst);
        assert_eq!(
            ops,
            vec![Op::Remove { path: p(&["2"]) }, Op::Remove { path: p(&["0"]) }]
        );
        assert_eq!(apply(src, &ops), dst);
    }

    #[test]
    fn duplicates_pair_up_in_order() {
        let src = v(json!(["a", "a", "b"]));
        let dst = v(json!(["b", "a", "c", "a"]));
        let ops = diff(&src, &dst);
        assert_eq!(apply(src, &ops), dst);
        assert!(!ops.iter().any(|o| o.op_name() == "remove"));
    }

    #[test]
    fn key_field_is_an_identity() {
        assert_eq!(default_identity(&v(json!({"key": "k", "x": 1}))), "key:\"k\"");
        assert_eq!(default_identity(&v(json!({"id": 1, "key": "k"}))), "id:1");
        assert_eq!(default_identity(&v(json!([1]))), "val:[1]");
    }

    #[test]
    fn custom_identity_controls_matching() {
        let by_len = DiffOptions::with_identity(|v| v.as_str().map_or(0, str::len).to_string());
        let src = v(json!(["aa", "b"]));
        let dst = v(json!(["c", "dd"]));
        let ops = diff_with(&src, &dst, &by_len);
        assert_eq!(ops[0].op_name(), "move");
        assert_eq!(ops.iter().filter(|o| o.op_name() == "replace").count(), 2);
        assert_eq!(apply(src, &ops), dst);
    }

    #[test]
    fn rediff_after_apply_is_empty() {
        let src = v(json!({"l": [{"id": 3}, 1, [2], "x"], "m": {"k": true}}));
        let dst = v(json!({"l": ["y", [2], {"id": 3, "z": 0}], "m": {}, "n": null}));
        let ops = diff(&src, &dst);
        let out = apply(src, &ops);
        assert_eq!(out, dst);
        assert!(diff(&out, &dst).is_empty());
    }

    #[test]
    fn long_lists_match_in_linear_time() {
        let src: Vec<Value> = (0..50_000i64).map(|i| v(json!({"id": i, "n": i}))).collect();
        let mut dst = src.clone();
        dst.insert(0, v(json!({"id": -1})));
        dst[25_000] = v(json!({"id": 24_999, "n": 0}));
        let ops = diff(&Value::List(src), &Value::List(dst));
        assert_eq!(
            ops,
            vec![
                Op::Add {
                    path: p(&["0"]),
                    value: v(json!({"id": -1}))
                },
                Op::Replace {
                    path: p(&["25000", "n"]),
                    value: Value::Int(0)
                },
            ]
        );
    }
}
