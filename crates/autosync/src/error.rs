//! Error types shared by every layer of the crate.

use std::fmt::Display;

use autosync_json_pointer::format_json_pointer;
use thiserror::Error;

/// Result type alias for autosync operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while converting values, navigating the document, applying
/// patches or exchanging updates.
///
/// Paths are carried as formatted JSON Pointers so that messages can be
/// logged and compared without the original operation at hand.
#[derive(Debug, Error)]
pub enum Error {
    /// A map key along the path (or the key an operation targets) is absent.
    #[error("path not found: {path:?}")]
    NotFound { path: String },

    /// A value of the wrong kind was found where a container or map was needed.
    #[error("type mismatch at {path:?}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A list index lies outside the bounds the operation allows.
    #[error("index {index} out of range (len: {len}) at {path:?}")]
    IndexOutOfRange { path: String, index: u64, len: u32 },

    /// A pointer or path step is malformed.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// The operation is well-formed but illegal, e.g. moving a node into itself.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A number does not fit the 64-bit signed integer representation.
    #[error("numeric overflow: {0}")]
    Overflow(String),

    /// The input has a shape the value model cannot represent.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// The operation kind is not supported at this location.
    #[error("unsupported operation {op:?} at {path:?}")]
    UnsupportedOperation { op: &'static str, path: String },

    /// The underlying document failed to open a transaction, decode or merge.
    #[error("engine failure: {0}")]
    Engine(String),

    /// JSON text could not be parsed or produced.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Fieldless discriminant of [`Error`], convenient for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    TypeMismatch,
    IndexOutOfRange,
    InvalidPath,
    InvalidOperation,
    Overflow,
    UnsupportedType,
    UnsupportedOperation,
    Engine,
    Serialization,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Error::InvalidPath { .. } => ErrorKind::InvalidPath,
            Error::InvalidOperation(_) => ErrorKind::InvalidOperation,
            Error::Overflow(_) => ErrorKind::Overflow,
            Error::UnsupportedType(_) => ErrorKind::UnsupportedType,
            Error::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
            Error::Engine(_) => ErrorKind::Engine,
            Error::Serialization(_) => ErrorKind::Serialization,
        }
    }

    #[inline]
    pub(crate) fn not_found(path: &[String]) -> Self {
        Error::NotFound {
            path: format_json_pointer(path),
        }
    }

    #[inline]
    pub(crate) fn type_mismatch(path: &[String], expected: &'static str, found: &'static str) -> Self {
        Error::TypeMismatch {
            path: format_json_pointer(path),
            expected,
            found,
        }
    }

    #[inline]
    pub(crate) fn out_of_range(path: &[String], index: u64, len: u32) -> Self {
        Error::IndexOutOfRange {
            path: format_json_pointer(path),
            index,
            len,
        }
    }

    #[inline]
    pub(crate) fn invalid_path(path: &[String], reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            path: format_json_pointer(path),
            reason: reason.into(),
        }
    }

    #[inline]
    pub(crate) fn unsupported_op(op: &'static str, path: &[String]) -> Self {
        Error::UnsupportedOperation {
            op,
            path: format_json_pointer(path),
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::UnsupportedType(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_formatted_pointers() {
        let path = vec!["a/b".to_string(), "0".to_string()];
        let err = Error::out_of_range(&path, 4, 2);
        assert_eq!(err.to_string(), "index 4 out of range (len: 2) at \"/a~1b/0\"");
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
    }

    #[test]
    fn root_path_formats_as_empty_pointer() {
        let err = Error::unsupported_op("remove", &[]);
        assert_eq!(err.to_string(), "unsupported operation \"remove\" at \"\"");
    }
}
