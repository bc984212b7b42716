use anyhow::Result;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public origin used in composed image URLs, e.g. `https://img.example.com`.
    /// When unset the origin is taken from the request's Host header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Uploaded originals and composed images share this directory
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Left end of the text baseline
    #[serde(default = "default_text_x")]
    pub x: i32,
    #[serde(default = "default_text_y")]
    pub y: i32,
    #[serde(default = "default_text_color")]
    pub color: String,
    /// TrueType/OpenType font; the built-in bitmap font is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    #[serde(default = "default_retention_enabled")]
    pub enabled: bool,
    #[serde(default = "default_retention_max_age", with = "duration_serde::duration")]
    pub max_age: Duration,
    /// Cron expression with a leading seconds field
    #[serde(default = "default_retention_schedule")]
    pub schedule: String,
    #[serde(default = "default_run_on_startup")]
    pub run_on_startup: bool,
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_public_dir() -> PathBuf {
    PathBuf::from(DEFAULT_PUBLIC_DIR)
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

// Storage defaults
fn default_uploads_dir() -> PathBuf {
    PathBuf::from(DEFAULT_UPLOADS_DIR)
}

// Render defaults
fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}

fn default_text_x() -> i32 {
    DEFAULT_TEXT_X
}

fn default_text_y() -> i32 {
    DEFAULT_TEXT_Y
}

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

// Retention defaults
fn default_retention_enabled() -> bool {
    DEFAULT_RETENTION_ENABLED
}

fn default_retention_max_age() -> Duration {
    // DEFAULT_RETENTION_MAX_AGE is a constant known to parse
    humantime::parse_duration(DEFAULT_RETENTION_MAX_AGE)
        .unwrap_or(sandboxed_file_manager::DEFAULT_RETENTION)
}

fn default_retention_schedule() -> String {
    DEFAULT_RETENTION_SCHEDULE.to_string()
}

fn default_run_on_startup() -> bool {
    DEFAULT_RUN_ON_STARTUP
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
            public_dir: default_public_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            font_size: default_font_size(),
            x: default_text_x(),
            y: default_text_y(),
            color: default_text_color(),
            font_path: None,
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: default_retention_enabled(),
            max_age: default_retention_max_age(),
            schedule: default_retention_schedule(),
            run_on_startup: default_run_on_startup(),
        }
    }
}

impl Config {
    /// Layered configuration sources, lowest precedence first:
    /// built-in defaults, the TOML file, `GREETING_*` variables
    /// (`__` separates sections), then a bare `PORT`.
    pub fn figment(config_file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Env::raw().only(&["PORT"]).map(|_| "web.port".into()))
    }

    /// Load and validate configuration. A missing file is not an error.
    pub fn load_from_file(config_file: &Path) -> Result<Self> {
        let config: Config = Self::figment(config_file).extract()?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.web.max_upload_bytes == 0 {
            return Err("web.max_upload_bytes must be greater than zero".to_string());
        }

        if let Some(base_url) = &self.web.base_url
            && !(base_url.starts_with("http://") || base_url.starts_with("https://"))
        {
            return Err(format!(
                "web.base_url must start with http:// or https://, got '{base_url}'"
            ));
        }

        if !(self.render.font_size.is_finite() && self.render.font_size > 0.0) {
            return Err(format!(
                "render.font_size must be a positive number, got {}",
                self.render.font_size
            ));
        }
        if self.render.font_size > MAX_FONT_SIZE {
            return Err(format!(
                "render.font_size must be at most {MAX_FONT_SIZE}, got {}",
                self.render.font_size
            ));
        }

        if !(1..=100).contains(&self.render.jpeg_quality) {
            return Err(format!(
                "render.jpeg_quality must be between 1 and 100, got {}",
                self.render.jpeg_quality
            ));
        }

        if crate::services::overlay_font::parse_color(&self.render.color).is_none() {
            return Err(format!(
                "render.color must be a #rrggbb hex colour, got '{}'",
                self.render.color
            ));
        }

        if self.retention.enabled {
            crate::utils::cron_helper::parse_schedule(&self.retention.schedule)?;
        }

        Ok(())
    }

    /// Socket address string the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.web.host, self.web.port)
    }
}
