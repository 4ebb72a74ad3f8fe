//! Keep a JSON value in sync with a replicated yrs document.
//!
//! Two things are offered on top of the CRDT engine:
//!
//! - **State updates.** [`update_to_state`] diffs the document against a
//!   target [`Value`] and applies the resulting RFC 6902 patch in one
//!   transaction, returning the operations it used.
//! - **Replica exchange.** [`SyncDoc::snapshot`] and [`SyncDoc::merge`] move
//!   opaque history blobs between replicas; merging is order-independent and
//!   idempotent, so replicas converge without coordination.
//!
//! # Example
//!
//! ```
//! use autosync::{DocOptions, SyncDoc, Value};
//!
//! let a = SyncDoc::with_options(DocOptions { client_id: Some(1) });
//! let b = SyncDoc::with_options(DocOptions { client_id: Some(2) });
//!
//! a.update_to_state(&Value::from_json_str(r#"{"todo": [{"id": 1, "done": false}]}"#).unwrap())
//!     .unwrap();
//! b.merge(&a.snapshot().unwrap()).unwrap();
//! assert_eq!(b.state().unwrap(), a.state().unwrap());
//! ```

pub mod diff;
pub mod doc;
pub mod error;
pub mod json_patch;
pub mod update;
pub mod value;

pub use diff::{diff, diff_with, DiffOptions};
pub use doc::{DocOptions, SyncDoc, ROOT_NAME};
pub use error::{Error, ErrorKind, Result};
pub use json_patch::Op;
pub use update::{update_to_state, update_to_state_with, UpdateError};
pub use value::{to_value, Value, ValueKind};
