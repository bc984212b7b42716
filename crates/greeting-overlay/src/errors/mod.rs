//! Centralized error handling for the greeting overlay service
//!
//! Every failure a request can hit falls into one of two kinds:
//!
//! - **Invalid requests**: unknown image identifiers, missing upload fields,
//!   malformed multipart bodies. Reported to the client as `400`.
//! - **Processing errors**: decoding, encoding or filesystem failures while
//!   storing or composing an image. Reported as `500`.
//!
//! The HTTP mapping lives in [`crate::web::responses`].
//!
//! # Usage
//!
//! ```rust
//! use greeting_overlay::errors::{AppError, AppResult};
//!
//! fn lookup(id: &str) -> AppResult<()> {
//!     Err(AppError::image_not_found(id))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;
