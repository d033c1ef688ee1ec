//! Built-in 5x7 bitmap font.
//!
//! Used whenever a scalable font cannot be loaded, so text rendering never
//! depends on a file being present. Glyphs are stored column-major, one
//! byte per column, least significant bit at the top row.

/// Glyph width in font units (one unit = one pixel at scale 1).
pub const GLYPH_WIDTH: i32 = 5;
/// Glyph height in font units.
pub const GLYPH_HEIGHT: i32 = 7;
/// Horizontal pen advance per character.
pub const ADVANCE: i32 = 6;
/// Line height a scale factor is chosen against.
pub const CELL_HEIGHT: i32 = 8;

/// Largest integer scale; a 1024 px tall cell.
pub const MAX_SCALE: i32 = 128;

const FIRST_PRINTABLE: u32 = 0x20;

/// Printable ASCII, 0x20 through 0x7E.
const GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x56, 0x20, 0x50], // &
    [0x00, 0x00, 0x07, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x2A, 0x1C, 0x7F, 0x1C, 0x2A], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x08, 0x04, 0x08, 0x10, 0x08], // ~
];

/// Column bitmap for `c`; anything outside printable ASCII renders as `?`.
fn glyph(c: char) -> &'static [u8; 5] {
    let code = c as u32;
    if (FIRST_PRINTABLE..FIRST_PRINTABLE + GLYPHS.len() as u32).contains(&code) {
        &GLYPHS[(code - FIRST_PRINTABLE) as usize]
    } else {
        &GLYPHS[('?' as u32 - FIRST_PRINTABLE) as usize]
    }
}

/// The bitmap font at an integer scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFont {
    scale: i32,
}

impl BitmapFont {
    pub fn new(scale: i32) -> Self {
        Self {
            scale: scale.clamp(1, MAX_SCALE),
        }
    }

    /// Pick the integer scale whose line height is closest to `pixel_size`.
    pub fn for_pixel_size(pixel_size: i64) -> Self {
        let scale = (pixel_size as f64 / CELL_HEIGHT as f64).round() as i32;
        Self::new(scale)
    }

    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Visit every inked pixel of `text`, pen starting at the origin with
    /// y = 0 at the top of the cell.
    pub fn for_each_pixel(&self, text: &str, mut f: impl FnMut(i32, i32)) {
        let s = self.scale;
        for (index, c) in text.chars().enumerate() {
            let pen_x = (index as i32).saturating_mul(ADVANCE * s);
            for (col, bits) in glyph(c).iter().enumerate() {
                for row in 0..GLYPH_HEIGHT {
                    if bits & (1 << row) == 0 {
                        continue;
                    }
                    let x0 = pen_x + col as i32 * s;
                    let y0 = row * s;
                    for dy in 0..s {
                        for dx in 0..s {
                            f(x0 + dx, y0 + dy);
                        }
                    }
                }
            }
        }
    }

    /// Tight ink bounds as `(min_x, min_y, max_x, max_y)`, max exclusive.
    /// `None` when nothing is inked (empty or all-space text).
    pub fn ink_bounds(&self, text: &str) -> Option<(i32, i32, i32, i32)> {
        let s = self.scale;
        let mut bounds: Option<(i32, i32, i32, i32)> = None;
        for (index, c) in text.chars().enumerate() {
            let pen_x = (index as i32).saturating_mul(ADVANCE * s);
            for (col, bits) in glyph(c).iter().enumerate() {
                if *bits == 0 {
                    continue;
                }
                let top = bits.trailing_zeros() as i32;
                let bottom = 8 - bits.leading_zeros() as i32;
                let x0 = pen_x + col as i32 * s;
                let cell = (x0, top * s, x0 + s, bottom * s);
                bounds = Some(match bounds {
                    None => cell,
                    Some((a, b, c, d)) => (a.min(cell.0), b.min(cell.1), c.max(cell.2), d.max(cell.3)),
                });
            }
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_table_covers_printable_ascii() {
        assert_eq!(GLYPHS.len(), 0x7F - 0x20);
        assert_eq!(glyph('A'), &[0x7E, 0x11, 0x11, 0x11, 0x7E]);
        assert_eq!(glyph('~'), &GLYPHS[94]);
    }

    #[test]
    fn test_unknown_chars_render_as_question_mark() {
        assert_eq!(glyph('é'), glyph('?'));
        assert_eq!(glyph('\n'), glyph('?'));
    }

    #[test]
    fn test_scale_selection() {
        assert_eq!(BitmapFont::for_pixel_size(0).scale(), 1);
        assert_eq!(BitmapFont::for_pixel_size(8).scale(), 1);
        assert_eq!(BitmapFont::for_pixel_size(27).scale(), 3);
        assert_eq!(BitmapFont::for_pixel_size(-5).scale(), 1);
    }

    #[test]
    fn test_huge_pixel_size_is_capped() {
        let font = BitmapFont::for_pixel_size(i64::MAX);
        assert_eq!(font.scale(), MAX_SCALE);

        let (_, _, max_x, max_y) = font.ink_bounds("4000 1234").unwrap();
        assert_eq!(max_y, 7 * MAX_SCALE);
        assert!(max_x > 0);
    }

    #[test]
    fn test_ink_bounds_single_glyph() {
        let font = BitmapFont::new(1);
        // '|' is a single full-height column in the middle
        assert_eq!(font.ink_bounds("|"), Some((2, 0, 3, 7)));
        // '-' is one row, five columns
        assert_eq!(font.ink_bounds("-"), Some((0, 3, 5, 4)));
    }

    #[test]
    fn test_ink_bounds_scaled_and_spaces() {
        let font = BitmapFont::new(2);
        assert_eq!(font.ink_bounds(" |"), Some((16, 0, 18, 14)));
        assert_eq!(font.ink_bounds("   "), None);
        assert_eq!(font.ink_bounds(""), None);
    }

    #[test]
    fn test_pixels_stay_within_bounds() {
        let font = BitmapFont::new(3);
        let text = "Alice 12/30";
        let (x0, y0, x1, y1) = font.ink_bounds(text).unwrap();
        let mut count = 0;
        font.for_each_pixel(text, |x, y| {
            assert!(x >= x0 && x < x1 && y >= y0 && y < y1);
            count += 1;
        });
        assert!(count > 0);
    }
}
