//! HTTP error responses
//!
//! Errors are reported as plain text. Client mistakes become `400 Bad
//! Request` (or `413` for an oversized body). Everything else is a `500`
//! carrying the error's display message, with the full chain logged
//! server-side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::errors::AppError;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        if matches!(self, Self::PayloadTooLarge { .. }) {
            StatusCode::PAYLOAD_TOO_LARGE
        } else if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = ?self, "Request failed: {}", self);
        } else {
            warn!("Rejected request: {}", self);
        }

        (status, self.to_string()).into_response()
    }
}
