//! Patch operation type.

use crate::value::Value;

pub use autosync_json_pointer::Path;

/// A single patch operation. Paths are parsed JSON Pointers; an empty path
/// addresses the document root.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Add { path: Path, value: Value },
    Remove { path: Path },
    Replace { path: Path, value: Value },
    Move { path: Path, from: Path },
    Copy { path: Path, from: Path },
    Test { path: Path, value: Value },
}

impl Op {
    /// The RFC 6902 `op` name.
    pub fn op_name(&self) -> &'static str {
        match self {
            Op::Add { .. } => "add",
            Op::Remove { .. } => "remove",
            Op::Replace { .. } => "replace",
            Op::Move { .. } => "move",
            Op::Copy { .. } => "copy",
            Op::Test { .. } => "test",
        }
    }

    /// Target path of the operation.
    pub fn path(&self) -> &Path {
        match self {
            Op::Add { path, .. }
            | Op::Remove { path }
            | Op::Replace { path, .. }
            | Op::Move { path, .. }
            | Op::Copy { path, .. }
            | Op::Test { path, .. } => path,
        }
    }

    /// Source path of `move` and `copy`.
    pub fn from(&self) -> Option<&Path> {
        match self {
            Op::Move { from, .. } | Op::Copy { from, .. } => Some(from),
            _ => None,
        }
    }

    /// Payload of `add`, `replace` and `test`.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Op::Add { value, .. } | Op::Replace { value, .. } | Op::Test { value, .. } => Some(value),
            _ => None,
        }
    }
}
