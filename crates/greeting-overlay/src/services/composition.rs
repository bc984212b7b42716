//! Stamping greeting text onto uploaded images
//!
//! A composition resolves the upload through the [`ImageRegistry`], decodes
//! it at native resolution, draws the rendered greeting and writes the
//! result as a new JPEG next to the uploads. Originals are never modified
//! and no output file is ever overwritten.

use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::Rgb;
use sandboxed_file_manager::{SandboxedFileError, SandboxedManager};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::RenderConfig;
use crate::errors::{AppError, AppResult, ProcessingError};
use crate::models::ComposedImage;
use crate::services::overlay_font::{OverlayFont, parse_color};
use crate::services::{GreetingTemplate, ImageRegistry};

/// Hex characters of randomness in composed file names
const OUTPUT_SUFFIX_LEN: usize = 12;

/// Where and how the greeting is drawn
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub font: OverlayFont,
    pub size: f32,
    pub x: i32,
    pub y: i32,
    pub color: Rgb<u8>,
    pub jpeg_quality: u8,
}

impl TextStyle {
    pub fn from_config(config: &RenderConfig) -> AppResult<Self> {
        let color = parse_color(&config.color).ok_or_else(|| {
            AppError::configuration(format!("Invalid text colour '{}'", config.color))
        })?;

        Ok(Self {
            font: OverlayFont::load(config.font_path.as_deref())?,
            size: config.font_size,
            x: config.x,
            y: config.y,
            color,
            jpeg_quality: config.jpeg_quality,
        })
    }
}

/// Encoded output of a single composition
#[derive(Debug)]
pub struct RenderedImage {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct CompositionService {
    storage: SandboxedManager,
    registry: ImageRegistry,
    template: GreetingTemplate,
    style: TextStyle,
}

impl CompositionService {
    pub fn new(
        storage: SandboxedManager,
        registry: ImageRegistry,
        template: GreetingTemplate,
        style: TextStyle,
    ) -> Self {
        Self {
            storage,
            registry,
            template,
            style,
        }
    }

    pub fn from_config(
        config: &RenderConfig,
        storage: SandboxedManager,
        registry: ImageRegistry,
    ) -> AppResult<Self> {
        Ok(Self::new(
            storage,
            registry,
            GreetingTemplate::new(config.template.clone()),
            TextStyle::from_config(config)?,
        ))
    }

    /// Draw the greeting for `name` and `date_time` onto the image
    /// registered as `image_id` and store the result.
    ///
    /// # Errors
    /// - [`AppError::NotFound`] if `image_id` was never registered
    /// - [`AppError::Processing`] if the original cannot be read or decoded,
    ///   or the result cannot be encoded or written
    pub async fn compose(
        &self,
        image_id: &str,
        name: &str,
        date_time: &str,
    ) -> AppResult<ComposedImage> {
        let source = self
            .registry
            .get(image_id)
            .await
            .ok_or_else(|| AppError::image_not_found(image_id))?;

        let stored_name = source
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ProcessingError::Read(SandboxedFileError::InvalidFileName {
                    name: image_id.to_string(),
                    reason: "registered path has no usable file name".to_string(),
                })
            })?;
        let bytes = self
            .storage
            .read(stored_name)
            .await
            .map_err(ProcessingError::Read)?;

        let text = self.template.render(name, date_time);
        let style = self.style.clone();
        debug!(image_id, text = %text, "Composing greeting");

        let rendered =
            tokio::task::spawn_blocking(move || render_overlay(&bytes, &text, &style))
                .await
                .map_err(ProcessingError::from)??;

        let file_name = output_file_name(Utc::now());
        let path = self
            .storage
            .write_new(&file_name, &rendered.jpeg)
            .await
            .map_err(ProcessingError::Store)?;

        info!(
            image_id,
            width = rendered.width,
            height = rendered.height,
            "Composed image written to {}",
            file_name
        );

        Ok(ComposedImage {
            file_name,
            path,
            width: rendered.width,
            height: rendered.height,
        })
    }
}

/// Decode `source`, draw `text` onto it and encode the result as JPEG.
///
/// The output keeps the source's dimensions; alpha is discarded.
pub fn render_overlay(
    source: &[u8],
    text: &str,
    style: &TextStyle,
) -> Result<RenderedImage, ProcessingError> {
    let mut canvas = image::load_from_memory(source)
        .map_err(ProcessingError::Decode)?
        .to_rgb8();

    style
        .font
        .draw(&mut canvas, text, style.x, style.y, style.size, style.color);

    let mut jpeg = Vec::new();
    canvas
        .write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, style.jpeg_quality))
        .map_err(ProcessingError::Encode)?;

    Ok(RenderedImage {
        jpeg,
        width: canvas.width(),
        height: canvas.height(),
    })
}

/// `edited-<unix-millis>-<random hex>.jpg`
pub fn output_file_name(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "edited-{}-{}.jpg",
        now.timestamp_millis(),
        &suffix[..OUTPUT_SUFFIX_LEN]
    )
}
