//! Security utilities for file name validation and sandboxing.

use crate::error::{Result, SandboxedFileError};
use std::path::{Component, Path};

/// Longest file name accepted by the store.
pub const MAX_FILE_NAME_LEN: usize = 255;

/// Validates that `name` is a single, plain path component.
///
/// The store is flat: every file lives directly in the base directory, so
/// separators, `.`/`..`, absolute paths and NUL bytes are all rejected.
pub fn validate_file_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| SandboxedFileError::InvalidFileName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("file name cannot be empty"));
    }
    if name.len() > MAX_FILE_NAME_LEN {
        return Err(invalid("file name is too long"));
    }
    if name.contains('\0') {
        return Err(invalid("file name contains null bytes"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid("file name contains a path separator"));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(invalid("file name must be a single plain component")),
    }
}
