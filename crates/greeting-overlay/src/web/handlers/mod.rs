//! HTTP request handlers
//!
//! Handlers extract and validate the request, then delegate to the
//! service layer in [`crate::services`].

pub mod health;
pub mod images;
