//! Embedded 5x7 bitmap font for burning text into frames
//!
//! The compositor has no system font stack to lean on, so it carries a
//! classic 5x7 glyph table and rasterizes scaled pixel blocks straight
//! onto the RGBA surface. Glyphs outside printable ASCII draw as blanks.

use image::{Rgba, RgbaImage};

/// Glyph cell width in font units
const GLYPH_WIDTH: u32 = 5;
/// Glyph cell height in font units
const GLYPH_HEIGHT: u32 = 7;
/// Horizontal advance per character (one blank column of spacing)
const GLYPH_ADVANCE: u32 = GLYPH_WIDTH + 1;

/// Classic 5x7 font, ASCII 0x20..=0x7E. Column-major: five bytes per
/// glyph, bit 0 of each byte is the top row.
#[rustfmt::skip]
static GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // '!'
    [0x00, 0x07, 0x00, 0x07, 0x00], // '"'
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // '#'
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // '$'
    [0x23, 0x13, 0x08, 0x64, 0x62], // '%'
    [0x36, 0x49, 0x55, 0x22, 0x50], // '&'
    [0x00, 0x05, 0x03, 0x00, 0x00], // '\''
    [0x00, 0x1C, 0x22, 0x41, 0x00], // '('
    [0x00, 0x41, 0x22, 0x1C, 0x00], // ')'
    [0x14, 0x08, 0x3E, 0x08, 0x14], // '*'
    [0x08, 0x08, 0x3E, 0x08, 0x08], // '+'
    [0x00, 0x50, 0x30, 0x00, 0x00], // ','
    [0x08, 0x08, 0x08, 0x08, 0x08], // '-'
    [0x00, 0x60, 0x60, 0x00, 0x00], // '.'
    [0x20, 0x10, 0x08, 0x04, 0x02], // '/'
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // '0'
    [0x00, 0x42, 0x7F, 0x40, 0x00], // '1'
    [0x42, 0x61, 0x51, 0x49, 0x46], // '2'
    [0x21, 0x41, 0x45, 0x4B, 0x31], // '3'
    [0x18, 0x14, 0x12, 0x7F, 0x10], // '4'
    [0x27, 0x45, 0x45, 0x45, 0x39], // '5'
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // '6'
    [0x01, 0x71, 0x09, 0x05, 0x03], // '7'
    [0x36, 0x49, 0x49, 0x49, 0x36], // '8'
    [0x06, 0x49, 0x49, 0x29, 0x1E], // '9'
    [0x00, 0x36, 0x36, 0x00, 0x00], // ':'
    [0x00, 0x56, 0x36, 0x00, 0x00], // ';'
    [0x08, 0x14, 0x22, 0x41, 0x00], // '<'
    [0x14, 0x14, 0x14, 0x14, 0x14], // '='
    [0x00, 0x41, 0x22, 0x14, 0x08], // '>'
    [0x02, 0x01, 0x51, 0x09, 0x06], // '?'
    [0x32, 0x49, 0x79, 0x41, 0x3E], // '@'
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // 'A'
    [0x7F, 0x49, 0x49, 0x49, 0x36], // 'B'
    [0x3E, 0x41, 0x41, 0x41, 0x22], // 'C'
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // 'D'
    [0x7F, 0x49, 0x49, 0x49, 0x41], // 'E'
    [0x7F, 0x09, 0x09, 0x09, 0x01], // 'F'
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // 'G'
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // 'H'
    [0x00, 0x41, 0x7F, 0x41, 0x00], // 'I'
    [0x20, 0x40, 0x41, 0x3F, 0x01], // 'J'
    [0x7F, 0x08, 0x14, 0x22, 0x41], // 'K'
    [0x7F, 0x40, 0x40, 0x40, 0x40], // 'L'
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // 'M'
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // 'N'
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // 'O'
    [0x7F, 0x09, 0x09, 0x09, 0x06], // 'P'
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // 'Q'
    [0x7F, 0x09, 0x19, 0x29, 0x46], // 'R'
    [0x46, 0x49, 0x49, 0x49, 0x31], // 'S'
    [0x01, 0x01, 0x7F, 0x01, 0x01], // 'T'
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // 'U'
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // 'V'
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // 'W'
    [0x63, 0x14, 0x08, 0x14, 0x63], // 'X'
    [0x07, 0x08, 0x70, 0x08, 0x07], // 'Y'
    [0x61, 0x51, 0x49, 0x45, 0x43], // 'Z'
    [0x00, 0x7F, 0x41, 0x41, 0x00], // '['
    [0x02, 0x04, 0x08, 0x10, 0x20], // '\\'
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ']'
    [0x04, 0x02, 0x01, 0x02, 0x04], // '^'
    [0x40, 0x40, 0x40, 0x40, 0x40], // '_'
    [0x00, 0x01, 0x02, 0x04, 0x00], // '`'
    [0x20, 0x54, 0x54, 0x54, 0x78], // 'a'
    [0x7F, 0x48, 0x44, 0x44, 0x38], // 'b'
    [0x38, 0x44, 0x44, 0x44, 0x20], // 'c'
    [0x38, 0x44, 0x44, 0x48, 0x7F], // 'd'
    [0x38, 0x54, 0x54, 0x54, 0x18], // 'e'
    [0x08, 0x7E, 0x09, 0x01, 0x02], // 'f'
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // 'g'
    [0x7F, 0x08, 0x04, 0x04, 0x78], // 'h'
    [0x00, 0x44, 0x7D, 0x40, 0x00], // 'i'
    [0x20, 0x40, 0x44, 0x3D, 0x00], // 'j'
    [0x7F, 0x10, 0x28, 0x44, 0x00], // 'k'
    [0x00, 0x41, 0x7F, 0x40, 0x00], // 'l'
    [0x7C, 0x04, 0x18, 0x04, 0x78], // 'm'
    [0x7C, 0x08, 0x04, 0x04, 0x78], // 'n'
    [0x38, 0x44, 0x44, 0x44, 0x38], // 'o'
    [0x7C, 0x14, 0x14, 0x14, 0x08], // 'p'
    [0x08, 0x14, 0x14, 0x18, 0x7C], // 'q'
    [0x7C, 0x08, 0x04, 0x04, 0x08], // 'r'
    [0x48, 0x54, 0x54, 0x54, 0x20], // 's'
    [0x04, 0x3F, 0x44, 0x40, 0x20], // 't'
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // 'u'
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // 'v'
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // 'w'
    [0x44, 0x28, 0x10, 0x28, 0x44], // 'x'
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // 'y'
    [0x44, 0x64, 0x54, 0x4C, 0x44], // 'z'
    [0x00, 0x08, 0x36, 0x41, 0x00], // '{'
    [0x00, 0x00, 0x7F, 0x00, 0x00], // '|'
    [0x00, 0x41, 0x36, 0x08, 0x00], // '}'
    [0x08, 0x04, 0x08, 0x10, 0x08], // '~'
];

fn glyph_for(c: char) -> &'static [u8; 5] {
    let index = (c as u32).wrapping_sub(0x20);
    if index < GLYPHS.len() as u32 {
        &GLYPHS[index as usize]
    } else {
        &GLYPHS[0]
    }
}

/// Integer scale factor that best approximates the requested pixel size
pub fn scale_for(font_size: u32) -> u32 {
    (font_size / GLYPH_HEIGHT).max(1)
}

/// Rendered glyph height at a given scale
pub fn text_height(scale: u32) -> u32 {
    GLYPH_HEIGHT * scale
}

/// Rendered line width at a given scale, trailing spacing excluded
pub fn text_width(text: &str, scale: u32) -> u32 {
    let count = text.chars().count() as u32;
    if count == 0 {
        0
    } else {
        count * GLYPH_ADVANCE * scale - scale
    }
}

/// Draw one line of text with its top-left corner at `(x, y)`.
/// Pixels falling outside the surface are clipped.
pub fn draw_text(surface: &mut RgbaImage, x: i64, y: i64, text: &str, color: [u8; 3], scale: u32) {
    let (width, height) = surface.dimensions();
    let mut pen_x = x;

    for c in text.chars() {
        let glyph = glyph_for(c);
        for (col, bits) in glyph.iter().enumerate() {
            for row in 0..GLYPH_HEIGHT {
                if bits & (1 << row) == 0 {
                    continue;
                }
                // One font unit becomes a scale x scale pixel block
                let block_x = pen_x + (col as u32 * scale) as i64;
                let block_y = y + (row * scale) as i64;
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = block_x + dx as i64;
                        let py = block_y + dy as i64;
                        if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < height {
                            surface.put_pixel(
                                px as u32,
                                py as u32,
                                Rgba([color[0], color[1], color[2], 255]),
                            );
                        }
                    }
                }
            }
        }
        pen_x += (GLYPH_ADVANCE * scale) as i64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_tracks_font_size() {
        assert_eq!(scale_for(14), 2);
        assert_eq!(scale_for(12), 1);
        assert_eq!(scale_for(1), 1);
    }

    #[test]
    fn width_accounts_for_advance() {
        assert_eq!(text_width("", 1), 0);
        assert_eq!(text_width("A", 1), 5);
        assert_eq!(text_width("AB", 1), 11);
        assert_eq!(text_width("AB", 2), 22);
    }

    #[test]
    fn drawing_touches_only_text_color() {
        let mut surface = RgbaImage::from_pixel(40, 12, Rgba([0, 0, 0, 255]));
        draw_text(&mut surface, 2, 2, "Hi", [255, 255, 255], 1);

        let lit = surface
            .pixels()
            .filter(|p| p.0 == [255, 255, 255, 255])
            .count();
        assert!(lit > 0, "expected some glyph pixels");

        // Nothing outside the glyph box is touched
        assert_eq!(surface.get_pixel(39, 11).0, [0, 0, 0, 255]);
    }

    #[test]
    fn clipping_is_safe_at_edges() {
        let mut surface = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
        draw_text(&mut surface, -3, -3, "W", [255, 0, 0], 2);
        draw_text(&mut surface, 6, 6, "W", [255, 0, 0], 2);
    }
}
