//! JSON Pointer (RFC 6901) utilities.
//!
//! Helpers for turning [JSON Pointer](https://tools.ietf.org/html/rfc6901)
//! strings into path components and back, and for reasoning about the
//! relationship between two paths (equality, ancestry) without touching
//! any document.
//!
//! # Example
//!
//! ```
//! use autosync_json_pointer::{parse_json_pointer, format_json_pointer, is_child};
//!
//! let path = parse_json_pointer("/items/0/name");
//! assert_eq!(path, vec!["items", "0", "name"]);
//! assert_eq!(format_json_pointer(&path), "/items/0/name");
//!
//! let items = parse_json_pointer("/items");
//! assert!(is_child(&items, &path));
//! ```

use thiserror::Error;

pub mod validate;
pub use validate::{validate_json_pointer, validate_path, ValidationError};

/// A step in a JSON Pointer path. Array indices are kept in their textual form.
pub type PathStep = String;

/// A parsed JSON Pointer path.
pub type Path = Vec<PathStep>;

/// The `-` step: one past the last element of an array.
pub const APPEND_STEP: &str = "-";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonPointerError {
    #[error("INVALID_INDEX")]
    InvalidIndex,
    #[error("NO_PARENT")]
    NoParent,
}

/// Unescapes a JSON Pointer path component.
///
/// Per RFC 6901, `~1` is replaced with `/` and `~0` is replaced with `~`.
///
/// ```
/// use autosync_json_pointer::unescape_component;
///
/// assert_eq!(unescape_component("a~0b"), "a~b");
/// assert_eq!(unescape_component("c~1d"), "c/d");
/// assert_eq!(unescape_component("~01"), "~1");
/// ```
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // ~1 first, otherwise "~01" would decode to "/"
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes a JSON Pointer path component.
///
/// ```
/// use autosync_json_pointer::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Parse a JSON Pointer string into path components.
///
/// The empty string is the root (no components). A non-empty pointer has its
/// leading `/` stripped; callers that need to reject pointers without one
/// should run [`validate_json_pointer`] first.
///
/// ```
/// use autosync_json_pointer::parse_json_pointer;
///
/// assert_eq!(parse_json_pointer(""), Vec::<String>::new());
/// assert_eq!(parse_json_pointer("/"), vec![""]);
/// assert_eq!(parse_json_pointer("/a~0b/c~1d"), vec!["a~b", "c/d"]);
/// ```
pub fn parse_json_pointer(pointer: &str) -> Path {
    if pointer.is_empty() {
        return Vec::new();
    }
    let body = pointer.strip_prefix('/').unwrap_or(pointer);
    body.split('/').map(unescape_component).collect()
}

/// Format path components into a JSON Pointer string.
///
/// ```
/// use autosync_json_pointer::format_json_pointer;
///
/// assert_eq!(format_json_pointer(&[]), "");
/// assert_eq!(format_json_pointer(&["a/b".to_string(), "0".to_string()]), "/a~1b/0");
/// ```
pub fn format_json_pointer(path: &[String]) -> String {
    let mut out = String::with_capacity(path.iter().map(|s| s.len() + 1).sum());
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

/// Check if a path points to the root value.
pub fn is_root(path: &[String]) -> bool {
    path.is_empty()
}

/// Check if `child` lies strictly below `parent`.
///
/// ```
/// use autosync_json_pointer::is_child;
///
/// let parent = vec!["a".to_string()];
/// let child = vec!["a".to_string(), "b".to_string()];
/// assert!(is_child(&parent, &child));
/// assert!(!is_child(&child, &parent));
/// assert!(!is_child(&parent, &parent));
/// ```
pub fn is_child(parent: &[String], child: &[String]) -> bool {
    parent.len() < child.len() && child[..parent.len()] == *parent
}

/// Check if two paths are equal.
pub fn is_path_equal(p1: &[String], p2: &[String]) -> bool {
    p1 == p2
}

/// Get the parent path of a given path.
pub fn parent(path: &[String]) -> Result<&[String], JsonPointerError> {
    match path.split_last() {
        Some((_, rest)) => Ok(rest),
        None => Err(JsonPointerError::NoParent),
    }
}

/// Check if a string consists only of ASCII digits.
pub fn is_integer(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// A path step interpreted against an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayStep {
    /// A numeric position. Not bounds-checked; may exceed any real length.
    Index(u64),
    /// The `-` marker.
    Append,
}

/// Interpret a path step as an array position.
///
/// Only plain ASCII digits and `-` are accepted; signs, whitespace and
/// fractions are `InvalidIndex`. Digit strings too large for `u64` saturate
/// so that callers report them as out of range rather than malformed.
///
/// ```
/// use autosync_json_pointer::{parse_array_step, ArrayStep};
///
/// assert_eq!(parse_array_step("3"), Ok(ArrayStep::Index(3)));
/// assert_eq!(parse_array_step("-"), Ok(ArrayStep::Append));
/// assert!(parse_array_step("+1").is_err());
/// ```
pub fn parse_array_step(step: &str) -> Result<ArrayStep, JsonPointerError> {
    if step == APPEND_STEP {
        return Ok(ArrayStep::Append);
    }
    if !is_integer(step) {
        return Err(JsonPointerError::InvalidIndex);
    }
    Ok(ArrayStep::Index(step.parse::<u64>().unwrap_or(u64::MAX)))
}
