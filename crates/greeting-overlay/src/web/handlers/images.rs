//! Upload and composition HTTP handlers

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::{HeaderMap, StatusCode},
};
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::models::{AddTextRequest, AddTextResponse, UploadResponse};
use crate::web::{
    AppState,
    utils::{request_base_url, upload_url},
};

/// Multipart field carrying the image
const IMAGE_FIELD: &str = "image";

/// `POST /upload`
///
/// Stores the first `image` field of the multipart body and returns its
/// identifier. Other fields are ignored.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.map_err(upload_error)?;

        let record = state
            .upload_service
            .store(file_name.as_deref(), &data)
            .await?;

        return Ok(Json(UploadResponse { image_id: record.id }));
    }

    Err(AppError::invalid_request("No file uploaded"))
}

fn upload_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large(e.body_text())
    } else {
        AppError::invalid_request(format!("Malformed upload: {}", e.body_text()))
    }
}

/// `POST /add-text`
///
/// Composes the greeting onto a previously uploaded image and returns the
/// absolute URL of the new JPEG.
pub async fn add_text(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AddTextRequest>,
) -> AppResult<Json<AddTextResponse>> {
    let composed = state
        .composition_service
        .compose(&request.image_id, &request.name, &request.date_time)
        .await?;

    let base_url = request_base_url(state.config.web.base_url.as_deref(), &headers);
    Ok(Json(AddTextResponse {
        url: upload_url(&base_url, &composed.file_name),
    }))
}
