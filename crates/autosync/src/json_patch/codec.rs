//! JSON codec for patch operations.
//!
//! Converts operations to/from `serde_json::Value` in RFC 6902 format:
//! an array of `{"op", "path", "value"?, "from"?}` objects.

use autosync_json_pointer::{
    format_json_pointer, parse_json_pointer, validate_json_pointer, validate_path, ValidationError,
};
use serde_json::{json, Value as Json};

use crate::error::{Error, Result};
use crate::json_patch::types::{Op, Path};
use crate::value::Value;

// ── Path helpers ──────────────────────────────────────────────────────────

fn encode_path(path: &[String]) -> Json {
    Json::String(format_json_pointer(path))
}

fn decode_path(field: &str, v: &Json) -> Result<Path> {
    let s = v
        .as_str()
        .ok_or_else(|| Error::InvalidOperation(format!("'{field}' must be a string")))?;
    let invalid = |e: ValidationError| Error::InvalidPath {
        path: s.to_owned(),
        reason: e.to_string(),
    };
    validate_json_pointer(s).map_err(invalid)?;
    let path = parse_json_pointer(s);
    validate_path(&path).map_err(invalid)?;
    Ok(path)
}

fn decode_value(op: &str, v: Option<&Json>) -> Result<Value> {
    let v = v.ok_or_else(|| Error::InvalidOperation(format!("{op} requires 'value'")))?;
    Value::try_from(v)
}

fn decode_from(op: &str, v: Option<&Json>) -> Result<Path> {
    let v = v.ok_or_else(|| Error::InvalidOperation(format!("{op} requires 'from'")))?;
    decode_path("from", v)
}

// ── Serialization ─────────────────────────────────────────────────────────

/// Serialize an `Op` to a `serde_json::Value` in the JSON Patch format.
pub fn to_json(op: &Op) -> Json {
    match op {
        Op::Add { path, value } => json!({
            "op": "add",
            "path": encode_path(path),
            "value": Json::from(value)
        }),
        Op::Remove { path } => json!({
            "op": "remove",
            "path": encode_path(path)
        }),
        Op::Replace { path, value } => json!({
            "op": "replace",
            "path": encode_path(path),
            "value": Json::from(value)
        }),
        Op::Move { path, from } => json!({
            "op": "move",
            "path": encode_path(path),
            "from": encode_path(from)
        }),
        Op::Copy { path, from } => json!({
            "op": "copy",
            "path": encode_path(path),
            "from": encode_path(from)
        }),
        Op::Test { path, value } => json!({
            "op": "test",
            "path": encode_path(path),
            "value": Json::from(value)
        }),
    }
}

/// Serialize a list of operations to a JSON Patch array.
pub fn to_json_patch(ops: &[Op]) -> Json {
    Json::Array(ops.iter().map(to_json).collect())
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Deserialize a single operation object.
pub fn from_json(v: &Json) -> Result<Op> {
    let obj = v
        .as_object()
        .ok_or_else(|| Error::InvalidOperation("operation must be an object".into()))?;
    let op = obj
        .get("op")
        .ok_or_else(|| Error::InvalidOperation("missing 'op' field".into()))?
        .as_str()
        .ok_or_else(|| Error::InvalidOperation("'op' must be a string".into()))?;
    let path = decode_path(
        "path",
        obj.get("path")
            .ok_or_else(|| Error::InvalidOperation(format!("{op} requires 'path'")))?,
    )?;

    match op {
        "add" => Ok(Op::Add {
            path,
            value: decode_value(op, obj.get("value"))?,
        }),
        "remove" => Ok(Op::Remove { path }),
        "replace" => Ok(Op::Replace {
            path,
            value: decode_value(op, obj.get("value"))?,
        }),
        "move" => Ok(Op::Move {
            path,
            from: decode_from(op, obj.get("from"))?,
        }),
        "copy" => Ok(Op::Copy {
            path,
            from: decode_from(op, obj.get("from"))?,
        }),
        "test" => Ok(Op::Test {
            path,
            value: decode_value(op, obj.get("value"))?,
        }),
        other => Err(Error::InvalidOperation(format!("unknown op {other:?}"))),
    }
}

/// Deserialize a JSON Patch array.
pub fn from_json_patch(v: &Json) -> Result<Vec<Op>> {
    v.as_array()
        .ok_or_else(|| Error::InvalidOperation("patch must be an array".into()))?
        .iter()
        .map(from_json)
        .collect()
}

/// Parse JSON Patch text.
pub fn from_json_str(text: &str) -> Result<Vec<Op>> {
    let v: Json = serde_json::from_str(text)?;
    from_json_patch(&v)
}
