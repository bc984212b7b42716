//! Error type definitions for the greeting overlay service.

use sandboxed_file_manager::SandboxedFileError;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// The request is malformed or incomplete
    #[error("{message}")]
    InvalidRequest { message: String },

    /// The request names a resource the service has never seen
    #[error("Invalid {resource} ID or no {resource} uploaded yet: {id}")]
    NotFound { resource: String, id: String },

    /// Image storage or composition failed
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    /// Storage directory could not be prepared
    #[error("Storage error: {0}")]
    Storage(#[from] SandboxedFileError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The request body exceeds the configured upload limit
    #[error("{message}")]
    PayloadTooLarge { message: String },
}

/// Failures while persisting, decoding, drawing on or encoding an image.
///
/// Display strings never include filesystem paths; they are sent to clients.
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Failed to read image: {0}")]
    Read(#[source] SandboxedFileError),

    #[error("Failed to load image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Failed to store image: {0}")]
    Store(#[source] SandboxedFileError),

    #[error("Image processing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create an invalid request error with a custom message
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a not-found error for an image identifier
    pub fn image_not_found<S: Into<String>>(id: S) -> Self {
        Self::NotFound {
            resource: "image".to_string(),
            id: id.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a payload-too-large error
    pub fn payload_too_large<S: Into<String>>(message: S) -> Self {
        Self::PayloadTooLarge {
            message: message.into(),
        }
    }

    /// Whether the client is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest { .. } | Self::NotFound { .. } | Self::PayloadTooLarge { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_the_id() {
        let error = AppError::image_not_found("abc-123");
        assert_eq!(
            error.to_string(),
            "Invalid image ID or no image uploaded yet: abc-123"
        );
        assert!(error.is_client_error());
    }

    #[test]
    fn test_processing_errors_are_server_side() {
        let missing = SandboxedFileError::FileNotFound {
            name: "4b1c.png".to_string(),
        };
        let error: AppError = ProcessingError::Read(missing).into();
        assert!(!error.is_client_error());
        assert_eq!(error.to_string(), "Failed to read image: File not found: 4b1c.png");
    }
}
