//! Drive the document to a target state.

use thiserror::Error;
use tracing::debug;

use crate::diff::{diff_with, DiffOptions};
use crate::doc::SyncDoc;
use crate::error::Error;
use crate::json_patch::Op;
use crate::value::{Map, Value};

/// Failure of [`update_to_state`], carrying the operations that were
/// attempted. Those before the failing one are applied.
#[derive(Debug, Error)]
#[error("update failed after attempting {} operations: {source}", .attempted.len())]
pub struct UpdateError {
    pub attempted: Vec<Op>,
    #[source]
    pub source: Error,
}

/// Make `doc` equal to `target` with the default diff options and return
/// the operations that did it.
///
/// ```
/// use autosync::{update_to_state, SyncDoc, Value};
///
/// let doc = SyncDoc::new();
/// let target = Value::from_json_str(r#"{"a": 1}"#).unwrap();
/// let ops = update_to_state(&doc, &target).unwrap();
/// assert_eq!(ops.len(), 1);
/// assert_eq!(doc.state().unwrap(), target);
/// ```
pub fn update_to_state(doc: &SyncDoc, target: &Value) -> Result<Vec<Op>, UpdateError> {
    update_to_state_with(doc, target, &DiffOptions::default())
}

pub fn update_to_state_with(
    doc: &SyncDoc,
    target: &Value,
    options: &DiffOptions,
) -> Result<Vec<Op>, UpdateError> {
    let current = doc.state().map_err(|source| UpdateError {
        attempted: Vec::new(),
        source,
    })?;
    // The root accepts `null` as the empty map.
    let empty;
    let target = if target.is_null() {
        empty = Value::Map(Map::new());
        &empty
    } else {
        target
    };
    let ops = diff_with(&current, target, options);
    if ops.is_empty() {
        debug!("document already at target state");
        return Ok(ops);
    }
    debug!(ops = ops.len(), "updating document to target state");
    match doc.apply_patch(&ops) {
        Ok(()) => Ok(ops),
        Err(source) => Err(UpdateError {
            attempted: ops,
            source,
        }),
    }
}

impl SyncDoc {
    /// See [`update_to_state`].
    pub fn update_to_state(&self, target: &Value) -> Result<Vec<Op>, UpdateError> {
        update_to_state(self, target)
    }
}
