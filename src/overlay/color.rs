//! CSS-style color literals used by overlay templates
//!
//! Templates store their colors the way the operator entered them:
//! `#rrggbb`, `rgb(r, g, b)` or `rgba(r, g, b, a)`. The compositor
//! parses them once per render and blends the band color over the
//! photo with the literal's alpha.

use image::Rgba;

use crate::error::{GpsCamError, Result};

/// A parsed template color with a unit-interval alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

impl OverlayColor {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    /// Parse a `#rrggbb`, `#rgb`, `rgb(...)` or `rgba(...)` literal
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            return Self::parse_hex(hex)
                .ok_or_else(|| GpsCamError::InvalidColor(input.to_string()));
        }

        if let Some(body) = trimmed
            .strip_prefix("rgba(")
            .or_else(|| trimmed.strip_prefix("rgb("))
        {
            if let Some(body) = body.strip_suffix(')') {
                return Self::parse_components(body)
                    .ok_or_else(|| GpsCamError::InvalidColor(input.to_string()));
            }
        }

        Err(GpsCamError::InvalidColor(input.to_string()))
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::opaque(r, g, b))
            }
            3 => {
                // #abc is shorthand for #aabbcc
                let expand = |c: &str| u8::from_str_radix(&format!("{c}{c}"), 16).ok();
                Some(Self::opaque(
                    expand(&hex[0..1])?,
                    expand(&hex[1..2])?,
                    expand(&hex[2..3])?,
                ))
            }
            _ => None,
        }
    }

    fn parse_components(body: &str) -> Option<Self> {
        let mut parts = body.split(',').map(str::trim);

        let r: u8 = parts.next()?.parse().ok()?;
        let g: u8 = parts.next()?.parse().ok()?;
        let b: u8 = parts.next()?.parse().ok()?;
        let alpha: f32 = match parts.next() {
            Some(raw) => raw.parse().ok()?,
            None => 1.0,
        };

        if parts.next().is_some() || !(0.0..=1.0).contains(&alpha) {
            return None;
        }

        Some(Self { r, g, b, alpha })
    }

    /// Blend this color over a destination pixel in place
    pub fn blend_over(&self, dst: &mut Rgba<u8>) {
        let a = self.alpha.clamp(0.0, 1.0);
        let mix = |under: u8, over: u8| -> u8 {
            (under as f32 * (1.0 - a) + over as f32 * a).round() as u8
        };

        dst.0 = [
            mix(dst.0[0], self.r),
            mix(dst.0[1], self.g),
            mix(dst.0[2], self.b),
            255,
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex() {
        let white = OverlayColor::parse("#ffffff").unwrap();
        assert_eq!(white, OverlayColor::opaque(255, 255, 255));

        let short = OverlayColor::parse("#f00").unwrap();
        assert_eq!(short, OverlayColor::opaque(255, 0, 0));
    }

    #[test]
    fn parses_rgba() {
        let band = OverlayColor::parse("rgba(0, 0, 0, 0.7)").unwrap();
        assert_eq!((band.r, band.g, band.b), (0, 0, 0));
        assert!((band.alpha - 0.7).abs() < 1e-6);

        let opaque = OverlayColor::parse("rgb(12, 34, 56)").unwrap();
        assert_eq!(opaque, OverlayColor::opaque(12, 34, 56));
    }

    #[test]
    fn rejects_malformed_literals() {
        assert!(OverlayColor::parse("#12345").is_err());
        assert!(OverlayColor::parse("rgba(0, 0, 0, 2.0)").is_err());
        assert!(OverlayColor::parse("blue").is_err());
    }

    #[test]
    fn blends_with_alpha() {
        let color = OverlayColor {
            r: 0,
            g: 0,
            b: 0,
            alpha: 0.5,
        };
        let mut pixel = Rgba([200, 100, 50, 255]);
        color.blend_over(&mut pixel);
        assert_eq!(pixel.0, [100, 50, 25, 255]);
    }

    #[test]
    fn opaque_blend_replaces() {
        let color = OverlayColor::opaque(10, 20, 30);
        let mut pixel = Rgba([200, 200, 200, 255]);
        color.blend_over(&mut pixel);
        assert_eq!(pixel.0, [10, 20, 30, 255]);
    }
}
