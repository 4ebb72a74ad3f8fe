//! Validation functions for JSON Pointer.

use thiserror::Error;

/// Maximum allowed pointer string length.
const MAX_POINTER_LENGTH: usize = 1024;

/// Maximum allowed path depth.
const MAX_PATH_LENGTH: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("POINTER_INVALID")]
    PointerInvalid,
    #[error("POINTER_TOO_LONG")]
    PointerTooLong,
    #[error("Path too long")]
    PathTooLong,
}

/// Validate a JSON Pointer string.
///
/// The root pointer (`""`) is valid. Any other pointer must start with `/`
/// and stay under 1024 bytes.
///
/// ```
/// use autosync_json_pointer::validate_json_pointer;
///
/// validate_json_pointer("").unwrap();
/// validate_json_pointer("/foo/bar").unwrap();
/// validate_json_pointer("foo").unwrap_err();
/// ```
pub fn validate_json_pointer(pointer: &str) -> Result<(), ValidationError> {
    if pointer.is_empty() {
        return Ok(());
    }
    if !pointer.starts_with('/') {
        return Err(ValidationError::PointerInvalid);
    }
    if pointer.len() > MAX_POINTER_LENGTH {
        return Err(ValidationError::PointerTooLong);
    }
    Ok(())
}

/// Validate a parsed path (at most 256 steps).
pub fn validate_path(path: &[String]) -> Result<(), ValidationError> {
    if path.len() > MAX_PATH_LENGTH {
        return Err(ValidationError::PathTooLong);
    }
    Ok(())
}
