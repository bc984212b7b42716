//! Error types for the sandboxed file manager.

use std::path::PathBuf;

/// Result type for sandboxed file operations.
pub type Result<T> = std::result::Result<T, SandboxedFileError>;

/// Errors that can occur during sandboxed file operations.
#[derive(Debug, thiserror::Error)]
pub enum SandboxedFileError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File name validation failed - potential security issue
    #[error("Invalid file name {name:?}: {reason}")]
    InvalidFileName { name: String, reason: String },

    /// A file with the requested name is already stored
    #[error("File already exists: {name}")]
    AlreadyExists { name: String },

    /// File not found (never written, or removed by a sweep)
    #[error("File not found: {name}")]
    FileNotFound { name: String },

    /// The storage directory could not be listed during a sweep
    #[error("Sweep failed: {reason}")]
    SweepFailed { reason: String },

    /// Directory creation failed
    #[error("Failed to create directory: {path:?} - {source}")]
    DirectoryCreation {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}
