//! RFC 6902 patch operations.
//!
//! The differ produces `Op` lists, the document applies them, and the
//! [`codec`] moves them across the wire as standard JSON Patch arrays.
//!
//! # Operations
//!
//! `add`, `remove`, `replace`, `move`, `copy` and `test`. The document
//! rejects `test` with `UnsupportedOperation`; it is carried so that
//! patches produced elsewhere decode without loss.

pub mod codec;
pub mod types;

pub use codec::{from_json, from_json_patch, from_json_str, to_json, to_json_patch};
pub use types::{Op, Path};
