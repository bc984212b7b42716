/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PUBLIC_DIR: &str = "./public";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024; // 10MB

// Storage defaults
pub const DEFAULT_UPLOADS_DIR: &str = "./uploads";

// Render defaults
pub const DEFAULT_TEMPLATE: &str = "Hello, {name}! Today's date and time is {date and time}.";
pub const DEFAULT_FONT_SIZE: f32 = 24.0;
pub const MAX_FONT_SIZE: f32 = 512.0;
pub const DEFAULT_TEXT_X: i32 = 50;
pub const DEFAULT_TEXT_Y: i32 = 100;
pub const DEFAULT_TEXT_COLOR: &str = "#000000";
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

// Retention defaults
pub const DEFAULT_RETENTION_ENABLED: bool = true;
pub const DEFAULT_RETENTION_MAX_AGE: &str = "7d";
/// Every day at 00:00 UTC (sec min hour day-of-month month day-of-week)
pub const DEFAULT_RETENTION_SCHEDULE: &str = "0 0 0 * * *";
pub const DEFAULT_RUN_ON_STARTUP: bool = false;

// Loading
pub const DEFAULT_CONFIG_FILE: &str = "greeting-overlay.toml";
pub const ENV_PREFIX: &str = "GREETING_";
