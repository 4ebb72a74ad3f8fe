//! Patch operations applied to the live document.
//!
//! A batch runs inside one write transaction. Operations apply strictly left
//! to right and the batch stops at the first failure. There is no rollback:
//! the transaction commits when it is dropped, so operations before the
//! failing one stay applied.

use autosync_json_pointer::{format_json_pointer, is_child, is_path_equal, parent as parent_path};
use tracing::{debug, warn};
use yrs::{Map as _, MapRef, ReadTxn, TransactionMut};

use super::container::{Container, ContainerKind, Terminal};
use super::convert::{read_map, read_out, to_input};
use super::navigate::navigate;
use super::SyncDoc;
use crate::error::{Error, Result};
use crate::json_patch::Op;
use crate::value::Value;

impl SyncDoc {
    /// Apply `ops` in one write transaction.
    ///
    /// On error, the operations before the failing one remain applied.
    ///
    /// A `move` checks its destination before deleting the source, except
    /// when the source is a list element and the destination path goes
    /// through that list: there the destination is only meaningful after the
    /// source is gone, so a bad destination fails after the delete and the
    /// moved value is lost.
    pub fn apply_patch(&self, ops: &[Op]) -> Result<()> {
        let mut txn = self.write_txn()?;
        apply_ops(&mut txn, &self.root, ops)
    }
}

/// Apply `ops` in order inside an existing transaction, stopping at the
/// first error.
pub fn apply_ops(txn: &mut TransactionMut, root: &MapRef, ops: &[Op]) -> Result<()> {
    debug!(ops = ops.len(), "applying patch");
    for (index, op) in ops.iter().enumerate() {
        debug!(
            index,
            op = op.op_name(),
            path = %format_json_pointer(op.path()),
            "apply op"
        );
        if let Err(err) = apply_op(txn, root, op) {
            warn!(
                index,
                op = op.op_name(),
                path = %format_json_pointer(op.path()),
                error = %err,
                "patch stopped; earlier operations stay applied"
            );
            return Err(err);
        }
    }
    debug!(ops = ops.len(), "patch applied");
    Ok(())
}

/// Apply a single operation.
pub fn apply_op(txn: &mut TransactionMut, root: &MapRef, op: &Op) -> Result<()> {
    match op {
        Op::Add { path, value } if path.is_empty() => apply_root(txn, root, value, false),
        Op::Replace { path, value } if path.is_empty() => apply_root(txn, root, value, true),
        Op::Add { path, value } => add(txn, root, path, value),
        Op::Remove { path } => remove(txn, root, path),
        Op::Replace { path, value } => replace(txn, root, path, value),
        Op::Move { path, from } => move_value(txn, root, path, from),
        Op::Copy { path, from } => copy_value(txn, root, path, from),
        Op::Test { path, .. } => Err(Error::unsupported_op("test", path)),
    }
}

// ── Root ────────────────────────────────────────────────────────────────────

/// Root-level `add` merges the entries of a map into the root; `replace`
/// clears the root first. `null` stands for the empty map.
fn apply_root(txn: &mut TransactionMut, root: &MapRef, value: &Value, clear: bool) -> Result<()> {
    let entries = match value {
        Value::Map(map) => Some(map),
        Value::Null => None,
        other => return Err(Error::type_mismatch(&[], "map", other.kind().as_str())),
    };
    if clear {
        root.clear(txn);
    }
    for (key, item) in entries.into_iter().flatten() {
        root.insert(txn, key.as_str(), to_input(item));
    }
    Ok(())
}

// ── Single-location operations ─────────────────────────────────────────────

/// Error for a terminal that names nothing in `parent`.
fn missing<T: ReadTxn>(txn: &T, parent: &Container, at: &Terminal, path: &[String]) -> Error {
    let len = parent.len(txn);
    match at {
        Terminal::Key(_) => Error::not_found(path),
        Terminal::Index(index) => Error::out_of_range(path, u64::from(*index), len),
        Terminal::Append => Error::out_of_range(path, u64::from(len), len),
    }
}

fn add(txn: &mut TransactionMut, root: &MapRef, path: &[String], value: &Value) -> Result<()> {
    let (parent, at) = navigate(&*txn, root, path)?;
    if parent.insert(txn, &at, to_input(value)) {
        Ok(())
    } else {
        Err(missing(&*txn, &parent, &at, path))
    }
}

fn remove(txn: &mut TransactionMut, root: &MapRef, path: &[String]) -> Result<()> {
    if path.is_empty() {
        return Err(Error::unsupported_op("remove", path));
    }
    let (parent, at) = navigate(&*txn, root, path)?;
    if parent.remove(txn, &at) {
        Ok(())
    } else {
        Err(missing(&*txn, &parent, &at, path))
    }
}

fn replace(txn: &mut TransactionMut, root: &MapRef, path: &[String], value: &Value) -> Result<()> {
    let (parent, at) = navigate(&*txn, root, path)?;
    if parent.set(txn, &at, to_input(value)) {
        Ok(())
    } else {
        Err(missing(&*txn, &parent, &at, path))
    }
}

// ── Two-location operations ─────────────────────────────────────────────────

/// Detached copy of the value at `from`. The empty path reads the whole root.
fn snapshot_at<T: ReadTxn>(
    txn: &T,
    root: &MapRef,
    from: &[String],
) -> Result<(Value, Option<(Container, Terminal)>)> {
    if from.is_empty() {
        return Ok((read_map(txn, root)?, None));
    }
    let (parent, at) = navigate(txn, root, from)?;
    let out = parent
        .get(txn, &at)
        .ok_or_else(|| missing(txn, &parent, &at, from))?;
    Ok((read_out(txn, out)?, Some((parent, at))))
}

fn move_value(txn: &mut TransactionMut, root: &MapRef, path: &[String], from: &[String]) -> Result<()> {
    if path.is_empty() {
        return Err(Error::unsupported_op("move", path));
    }
    if is_path_equal(path, from) || is_child(from, path) {
        return Err(Error::InvalidOperation(format!(
            "cannot move {:?} into itself at {:?}",
            format_json_pointer(from),
            format_json_pointer(path)
        )));
    }
    let (value, source) = snapshot_at(&*txn, root, from)?;
    // A root source is always an ancestor of `path`, so it was rejected above.
    if let Some((parent, at)) = source {
        // Deleting a list element shifts later siblings; resolve the
        // destination up front unless it goes through that list.
        let shifts_destination = parent.kind() == ContainerKind::List
            && parent_path(from).is_ok_and(|list| path.starts_with(list));
        if !shifts_destination {
            let (dest, dest_at) = navigate(&*txn, root, path)?;
            if !dest.accepts(&*txn, &dest_at) {
                return Err(missing(&*txn, &dest, &dest_at, path));
            }
        }
        if !parent.remove(txn, &at) {
            return Err(missing(&*txn, &parent, &at, from));
        }
    }
    add(txn, root, path, &value)
}

fn copy_value(txn: &mut TransactionMut, root: &MapRef, path: &[String], from: &[String]) -> Result<()> {
    if path.is_empty() {
        return Err(Error::unsupported_op("copy", path));
    }
    let (value, _) = snapshot_at(&*txn, root, from)?;
    add(txn, root, path, &value)
}
