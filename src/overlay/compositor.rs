//! Overlay compositor
//!
//! The central step of the capture pipeline: takes a raw frame, an
//! optional coordinate reading and a template, and produces a flattened
//! surface with a text band along the bottom edge. Rendering is
//! deterministic for fixed inputs; encoding happens at a fixed quality
//! in the configured format.

use std::collections::HashMap;
use std::io::Cursor;

use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use image::RgbaImage;

use crate::config::ImageFormat;
use crate::error::Result;
use crate::format::{format_timestamp, TimestampFormat};
use crate::gps::CoordinateReading;
use crate::overlay::color::OverlayColor;
use crate::overlay::font;
use crate::overlay::template::{FieldKind, LogoPosition, OverlayTemplate};

/// Height of the overlay band, drawn flush against the bottom edge
pub const BAND_HEIGHT: u32 = 120;

/// Left inset of the text block, and the horizontal logo margin
const TEXT_INSET: i64 = 20;

/// Literal drawn when `show_logo` is set
const LOGO_TEXT: &str = "GPS CAM";

/// Resolve the template's visible fields into display lines, in draw
/// order. A field whose resolved value is empty contributes no line;
/// coordinate fields are skipped entirely without a reading.
pub fn resolve_lines(
    template: &OverlayTemplate,
    reading: Option<&CoordinateReading>,
    custom: Option<&HashMap<String, String>>,
) -> Vec<String> {
    let mut lines = Vec::new();

    for field in template.sorted_visible_fields() {
        let value = match field.kind {
            FieldKind::Coordinate => match reading {
                Some(reading) => match field.id.as_str() {
                    "lat" => format!("{:.6}", reading.latitude),
                    "lng" => format!("{:.6}", reading.longitude),
                    "alt" => match reading.altitude {
                        Some(altitude) => format!("{:.1}", altitude),
                        None => "N/A".to_string(),
                    },
                    _ => String::new(),
                },
                None => String::new(),
            },
            FieldKind::Datetime => {
                let timestamp = reading.map(|r| r.captured_at).unwrap_or_else(Utc::now);
                format_timestamp(timestamp, TimestampFormat::Long)
            }
            FieldKind::Custom => custom
                .and_then(|map| map.get(&field.id).cloned())
                .unwrap_or_else(|| field.value.clone()),
            FieldKind::Text => field.value.clone(),
        };

        if !value.is_empty() {
            lines.push(format!("{}: {}", field.label, value));
        }
    }

    lines
}

/// Render the overlay band onto a copy of the raw frame.
///
/// Pixels above the band are never altered. The band is filled with the
/// template's background color (alpha respected), then the resolved
/// lines are stacked top-to-bottom, vertically centered as a block,
/// left-aligned at a fixed inset. Long lines overflow without wrapping.
pub fn render(
    raw: &RgbaImage,
    reading: Option<&CoordinateReading>,
    template: &OverlayTemplate,
    custom: Option<&HashMap<String, String>>,
) -> Result<RgbaImage> {
    let background = OverlayColor::parse(&template.background_color)?;
    let text_color = OverlayColor::parse(&template.text_color)?;

    let mut surface = raw.clone();
    let (width, height) = surface.dimensions();
    let band_height = BAND_HEIGHT.min(height);
    let band_top = height - band_height;

    for y in band_top..height {
        for x in 0..width {
            background.blend_over(surface.get_pixel_mut(x, y));
        }
    }

    let lines = resolve_lines(template, reading, custom);
    let color = [text_color.r, text_color.g, text_color.b];

    let line_height = (template.font_size + 4) as i64;
    let scale = font::scale_for(template.font_size);
    let glyph_height = font::text_height(scale) as i64;

    // Center the block of lines vertically within the band
    let block_top =
        band_top as i64 + (band_height as i64 - lines.len() as i64 * line_height) / 2;

    for (index, line) in lines.iter().enumerate() {
        let line_top = block_top + index as i64 * line_height;
        let glyph_top = line_top + (line_height - glyph_height) / 2;
        font::draw_text(&mut surface, TEXT_INSET, glyph_top, line, color, scale);
    }

    if template.show_logo {
        let logo_scale = font::scale_for(template.font_size.saturating_sub(2).max(1));
        let logo_width = font::text_width(LOGO_TEXT, logo_scale) as i64;
        let logo_height = font::text_height(logo_scale) as i64;

        let x = match template.logo_position {
            Some(LogoPosition::Right) => width as i64 - logo_width - TEXT_INSET,
            Some(LogoPosition::Center) => (width as i64 - logo_width) / 2,
            _ => TEXT_INSET,
        };
        // Vertical center sits 20px above the band's bottom edge
        let y = height as i64 - 20 - logo_height / 2;

        font::draw_text(&mut surface, x, y, LOGO_TEXT, color, logo_scale);
    }

    Ok(surface)
}

/// Encode a rendered surface at the given quality (`0.0..=1.0`)
pub fn encode(surface: &RgbaImage, format: ImageFormat, quality: f32) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());

    match format {
        ImageFormat::Jpeg => {
            let quality = (quality.clamp(0.01, 1.0) * 100.0) as u8;
            let rgb = image::DynamicImage::ImageRgba8(surface.clone()).into_rgb8();
            let encoder = JpegEncoder::new_with_quality(&mut cursor, quality);
            rgb.write_with_encoder(encoder)?;
        }
        ImageFormat::Png => {
            surface.write_to(&mut cursor, image::ImageFormat::Png)?;
        }
    }

    Ok(cursor.into_inner())
}

/// Render and encode in one step
pub fn composite(
    raw: &RgbaImage,
    reading: Option<&CoordinateReading>,
    template: &OverlayTemplate,
    custom: Option<&HashMap<String, String>>,
    format: ImageFormat,
    quality: f32,
) -> Result<Vec<u8>> {
    let surface = render(raw, reading, template, custom)?;
    encode(&surface, format, quality)
}
