//! Conversion between [`Value`] and the engine's `In` / `Out` values.
//!
//! Lists and maps written into the document become real nested containers,
//! so their elements can later be addressed and edited individually. Reading
//! goes the other way and accepts both nested containers and opaque `Any`
//! payloads produced by other writers.

use yrs::{Any, Array as _, ArrayRef, GetString, In, Map as _, MapRef, Out, ReadTxn};

use crate::error::{Error, Result};
use crate::value::{Map, Value};

/// Build a fresh insertable tree for `value`.
pub fn to_input(value: &Value) -> In {
    match value {
        Value::Null => In::Any(Any::Null),
        Value::Bool(b) => In::Any(Any::Bool(*b)),
        Value::Int(i) => In::Any(Any::BigInt(*i)),
        Value::Float(f) => In::Any(Any::Number(*f)),
        Value::Text(s) => In::Any(Any::String(s.as_str().into())),
        Value::List(items) => In::Array(items.iter().map(to_input).collect()),
        Value::Map(map) => In::Map(map.iter().map(|(k, v)| (k.clone(), to_input(v))).collect()),
    }
}

/// Read any document value into a [`Value`].
pub fn read_out<T: ReadTxn>(txn: &T, out: Out) -> Result<Value> {
    match out {
        Out::Any(any) => from_any(&any),
        Out::YMap(map) => read_map(txn, &map),
        Out::YArray(array) => read_array(txn, &array),
        Out::YText(text) => Ok(Value::Text(text.get_string(txn))),
        other => Err(Error::UnsupportedType(format!(
            "document node of kind {} has no value representation",
            describe(&other)
        ))),
    }
}

pub fn read_map<T: ReadTxn>(txn: &T, map: &MapRef) -> Result<Value> {
    let mut out = Map::new();
    for (key, child) in map.iter(txn) {
        out.insert(key.to_owned(), read_out(txn, child)?);
    }
    Ok(Value::Map(out))
}

pub fn read_array<T: ReadTxn>(txn: &T, array: &ArrayRef) -> Result<Value> {
    array
        .iter(txn)
        .map(|child| read_out(txn, child))
        .collect::<Result<Vec<_>>>()
        .map(Value::List)
}

pub fn from_any(any: &Any) -> Result<Value> {
    Ok(match any {
        Any::Null | Any::Undefined => Value::Null,
        Any::Bool(b) => Value::Bool(*b),
        Any::Number(f) => Value::Float(*f),
        Any::BigInt(i) => Value::Int(*i),
        Any::String(s) => Value::Text(s.to_string()),
        Any::Array(items) => Value::List(items.iter().map(from_any).collect::<Result<_>>()?),
        Any::Map(map) => Value::Map(
            map.iter()
                .map(|(k, v)| Ok((k.to_string(), from_any(v)?)))
                .collect::<Result<_>>()?,
        ),
        _ => return Err(Error::UnsupportedType("binary buffers have no value representation".into())),
    })
}

/// Short kind name of a document value, for error messages.
pub fn describe(out: &Out) -> &'static str {
    match out {
        Out::Any(Any::Null | Any::Undefined) => "null",
        Out::Any(Any::Bool(_)) => "bool",
        Out::Any(Any::BigInt(_)) => "int",
        Out::Any(Any::Number(_)) => "float",
        Out::Any(Any::String(_)) | Out::YText(_) => "text",
        Out::Any(Any::Array(_)) | Out::YArray(_) => "list",
        Out::Any(Any::Map(_)) | Out::YMap(_) => "map",
        Out::Any(_) => "buffer",
        _ => "unsupported",
    }
}
