//! Fonts for drawing greeting text onto images
//!
//! A TrueType/OpenType font can be supplied through `render.font_path`.
//! Without one, text is drawn with the embedded 8x8 bitmap font, scaled up
//! to roughly match the requested pixel size, so the service has no
//! dependency on system fonts.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};
use std::path::Path;
use tracing::{debug, info};

use crate::config::defaults::MAX_FONT_SIZE;
use crate::errors::{AppError, AppResult};

/// Height in pixels of an unscaled bitmap glyph
const BITMAP_GLYPH_SIZE: u32 = 8;

/// Drawn in place of characters the bitmap font does not cover
const REPLACEMENT_CHAR: char = '?';

#[derive(Clone)]
pub enum OverlayFont {
    /// Embedded 8x8 bitmap font
    Builtin,
    /// Font loaded from disk
    TrueType(FontArc),
}

impl std::fmt::Debug for OverlayFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Builtin => f.write_str("OverlayFont::Builtin"),
            Self::TrueType(_) => f.write_str("OverlayFont::TrueType"),
        }
    }
}

impl OverlayFont {
    /// Load the configured font, falling back to the built-in bitmap font
    pub fn load(font_path: Option<&Path>) -> AppResult<Self> {
        let Some(path) = font_path else {
            debug!("No font configured, using built-in bitmap font");
            return Ok(Self::Builtin);
        };

        let bytes = std::fs::read(path).map_err(|e| {
            AppError::configuration(format!("Cannot read font {}: {e}", path.display()))
        })?;
        let font = FontArc::try_from_vec(bytes).map_err(|e| {
            AppError::configuration(format!("Invalid font {}: {e}", path.display()))
        })?;

        info!("Loaded overlay font from {}", path.display());
        Ok(Self::TrueType(font))
    }

    /// Draw `text` with its baseline starting at (`x`, `y`).
    ///
    /// Pixels falling outside the image are clipped.
    pub fn draw(
        &self,
        image: &mut RgbImage,
        text: &str,
        x: i32,
        y: i32,
        size: f32,
        color: Rgb<u8>,
    ) {
        match self {
            Self::Builtin => draw_bitmap_text(image, text, x, y, size, color),
            Self::TrueType(font) => {
                let scale = PxScale::from(size);
                // imageproc positions text by its top edge
                let ascent = font.as_scaled(scale).ascent().round() as i32;
                imageproc::drawing::draw_text_mut(image, color, x, y - ascent, scale, font, text);
            }
        }
    }
}

/// Integer scale factor applied to the 8x8 bitmap glyphs
fn bitmap_scale(size: f32) -> u32 {
    let size = size.clamp(1.0, MAX_FONT_SIZE);
    ((size / BITMAP_GLYPH_SIZE as f32).round() as u32).max(1)
}

fn bitmap_glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get(REPLACEMENT_CHAR))
        .unwrap_or([0; 8])
}

fn draw_bitmap_text(image: &mut RgbImage, text: &str, x: i32, y: i32, size: f32, color: Rgb<u8>) {
    let scale = bitmap_scale(size) as i32;
    let advance = BITMAP_GLYPH_SIZE as i32 * scale;
    // Bottom row of the glyph cell sits on the baseline
    let top = y - (BITMAP_GLYPH_SIZE as i32 - 1) * scale;
    let (width, height) = (image.width() as i64, image.height() as i64);

    let mut origin_x = x;
    for c in text.chars() {
        for (row, bits) in bitmap_glyph(c).iter().enumerate() {
            for col in 0..BITMAP_GLYPH_SIZE as i32 {
                // Least significant bit is the leftmost pixel
                if bits & (1 << col) == 0 {
                    continue;
                }
                let cell_x = origin_x + col * scale;
                let cell_y = top + row as i32 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = (cell_x + dx) as i64;
                        let py = (cell_y + dy) as i64;
                        if px >= 0 && py >= 0 && px < width && py < height {
                            image.put_pixel(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
        origin_x = origin_x.saturating_add(advance);
    }
}

/// Parse a `#rrggbb` colour
pub fn parse_color(value: &str) -> Option<Rgb<u8>> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn count_pixels(image: &RgbImage, color: Rgb<u8>) -> usize {
        image.pixels().filter(|p| **p == color).count()
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#000000"), Some(Rgb([0, 0, 0])));
        assert_eq!(parse_color("#ff8000"), Some(Rgb([255, 128, 0])));
        assert_eq!(parse_color("#FFFFFF"), Some(Rgb([255, 255, 255])));
        assert_eq!(parse_color("000000"), None);
        assert_eq!(parse_color("#fff"), None);
        assert_eq!(parse_color("#gggggg"), None);
    }

    #[test]
    fn test_bitmap_scale_tracks_font_size() {
        assert_eq!(bitmap_scale(24.0), 3);
        assert_eq!(bitmap_scale(8.0), 1);
        assert_eq!(bitmap_scale(2.0), 1);
    }

    #[test]
    fn test_bitmap_scale_is_bounded() {
        let max = (MAX_FONT_SIZE / BITMAP_GLYPH_SIZE as f32) as u32;
        assert_eq!(bitmap_scale(1e12), max);
        assert_eq!(bitmap_scale(f32::INFINITY), max);
        assert_eq!(bitmap_scale(-4.0), 1);
        assert!(i32::try_from(bitmap_scale(f32::MAX)).is_ok());
    }

    #[test]
    fn test_builtin_font_draws_text() {
        let mut image = RgbImage::from_pixel(200, 120, WHITE);
        OverlayFont::Builtin.draw(&mut image, "Hi", 50, 100, 24.0, BLACK);

        assert!(count_pixels(&image, BLACK) > 0);
        // Nothing is drawn below the baseline
        for x in 0..image.width() {
            for y in 101..image.height() {
                assert_eq!(*image.get_pixel(x, y), WHITE);
            }
        }
    }

    #[test]
    fn test_text_is_clipped_to_image() {
        let mut image = RgbImage::from_pixel(10, 10, WHITE);
        OverlayFont::Builtin.draw(&mut image, "Hello, world!", 50, 100, 24.0, BLACK);
        assert_eq!(count_pixels(&image, BLACK), 0);

        OverlayFont::Builtin.draw(&mut image, "Hello", -5, 8, 24.0, BLACK);
        assert!(count_pixels(&image, BLACK) > 0);
    }

    #[test]
    fn test_unknown_characters_use_replacement_glyph() {
        assert_eq!(bitmap_glyph('\u{1F600}'), bitmap_glyph('?'));
        assert_ne!(bitmap_glyph('A'), bitmap_glyph('?'));
    }

    #[test]
    fn test_missing_font_file_is_a_configuration_error() {
        let result = OverlayFont::load(Some(Path::new("/nonexistent/font.ttf")));
        assert!(matches!(result, Err(AppError::Configuration { .. })));
        assert!(matches!(OverlayFont::load(None), Ok(OverlayFont::Builtin)));
    }
}
