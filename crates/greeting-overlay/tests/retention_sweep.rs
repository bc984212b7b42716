//! Retention sweep against a live uploads directory

use axum::http::StatusCode;
use axum_test::{
    TestServer,
    multipart::{MultipartForm, Part},
};
use chrono::{Duration as ChronoDuration, Timelike, Utc};
use filetime::{FileTime, set_file_mtime};
use image::{ImageFormat, Rgb, RgbImage};
use serde_json::json;
use std::io::Cursor;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use greeting_overlay::{
    config::Config,
    models::UploadResponse,
    services::RetentionSweeper,
    web::{AppState, create_router},
};

const DAY: u64 = 24 * 60 * 60;

fn png_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbImage::from_pixel(16, 16, Rgb([255, 255, 255]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn backdate(path: &Path, age: Duration) {
    let mtime = SystemTime::now() - age;
    set_file_mtime(path, FileTime::from_system_time(mtime)).unwrap();
}

async fn setup() -> (TempDir, TestServer, AppState) {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.storage.uploads_dir = dir.path().join("uploads");
    let state = AppState::from_config(config).await.unwrap();
    let server = TestServer::new(create_router(state.clone())).unwrap();
    (dir, server, state)
}

async fn upload(server: &TestServer) -> String {
    let form = MultipartForm::new()
        .add_part("image", Part::bytes(png_bytes()).file_name("photo.png"));
    server
        .post("/upload")
        .multipart(form)
        .await
        .json::<UploadResponse>()
        .image_id
}

#[tokio::test]
async fn test_sweep_removes_files_older_than_seven_days() {
    let (_dir, server, state) = setup().await;
    let old_id = upload(&server).await;
    let fresh_id = upload(&server).await;

    let old_path = state.registry.get(&old_id).await.unwrap();
    let fresh_path = state.registry.get(&fresh_id).await.unwrap();
    backdate(&old_path, Duration::from_secs(8 * DAY));
    backdate(&fresh_path, Duration::from_secs(6 * DAY));

    let sweeper =
        RetentionSweeper::from_config(state.storage.clone(), &state.config.retention).unwrap();
    let report = sweeper.run_once().await.unwrap();

    assert_eq!(report.scanned, 2);
    assert_eq!(report.removed, 1);
    assert!(!old_path.exists());
    assert!(fresh_path.exists());
}

#[tokio::test]
async fn test_file_exactly_at_retention_limit_is_kept() {
    let (_dir, server, state) = setup().await;
    let id = upload(&server).await;
    let path = state.registry.get(&id).await.unwrap();

    // Whole seconds survive any filesystem's mtime precision
    let now = Utc::now().with_nanosecond(0).unwrap();
    let modified = now - ChronoDuration::days(7);
    set_file_mtime(&path, FileTime::from_system_time(modified.into())).unwrap();

    let report = state.storage.sweep_expired_at(now).await.unwrap();
    assert_eq!(report.removed, 0);
    assert_eq!(report.retained, 1);
    assert!(path.exists());
}

#[tokio::test]
async fn test_swept_upload_can_no_longer_be_composed() {
    let (_dir, server, state) = setup().await;
    let id = upload(&server).await;
    let path = state.registry.get(&id).await.unwrap();
    backdate(&path, Duration::from_secs(30 * DAY));

    state.storage.sweep_expired().await.unwrap();

    // The registry still knows the id, the file is gone
    assert!(state.registry.get(&id).await.is_some());
    let response = server
        .post("/add-text")
        .json(&json!({ "imageId": id, "name": "Ada", "dateTime": "now" }))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().starts_with("Failed to read image"));
}
