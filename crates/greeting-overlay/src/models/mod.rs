use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An uploaded original, as held by the image registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: String,
    pub path: PathBuf,
}

/// Response body of `POST /upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_id: String,
}

/// Request body of `POST /add-text`
///
/// Absent fields deserialize as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTextRequest {
    #[serde(default)]
    pub image_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date_time: String,
}

/// Response body of `POST /add-text`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTextResponse {
    pub url: String,
}

/// A composed JPEG written to the uploads directory
#[derive(Debug, Clone)]
pub struct ComposedImage {
    pub file_name: String,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Response body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub registered_images: usize,
    pub uptime_seconds: i64,
}
