// this_file: crates/pixfont-fonts/src/bmp.rs

//! Row-major 1bpp bitmap fonts
//!
//! [`FixedBmpFont`] stores fixed-size cells behind the same 3-byte header
//! as GLCD fonts. [`BmpFont`] is proportional: a width table and one
//! bitmap per printable ASCII character.

use pixfont_core::{CodePoint, FillCursor, GlyphMetrics, PixelSink, TextStyle};

use crate::glcd::GlcdInfo;
use crate::raster::{draw_char_bmp, draw_dummy, BmpGlyph, FontBox};

/// First code of proportional ASCII fonts
pub const ASCII_FIRST: CodePoint = 0x20;

/// Number of glyphs in a proportional ASCII font (0x20..=0x7F)
pub const ASCII_GLYPHS: usize = 0x60;

/// Index into a 96-entry ASCII table, or `None` outside 0x20..=0x7F
#[inline]
pub(crate) fn ascii_index(code: CodePoint) -> Option<usize> {
    let idx = code.wrapping_sub(ASCII_FIRST) as usize;
    (idx < ASCII_GLYPHS).then_some(idx)
}

#[derive(Debug, Clone, Copy)]
pub struct FixedBmpFont<'a> {
    chartbl: &'a [u8],
    info: GlcdInfo,
    cell: FontBox,
}

impl<'a> FixedBmpFont<'a> {
    pub const fn new(chartbl: &'a [u8], info: GlcdInfo, cell: FontBox) -> Self {
        Self { chartbl, info, cell }
    }

    fn bytes_per_row(&self) -> usize {
        (self.cell.width as usize + 7) >> 3
    }

    pub fn default_metrics(&self) -> GlyphMetrics {
        self.cell.default_metrics()
    }

    pub fn update_metrics(&self, metrics: &mut GlyphMetrics, code: CodePoint) -> bool {
        metrics.width = self.cell.width as i16;
        metrics.x_advance = self.cell.width as i16;
        self.info.contains(code)
    }

    pub fn draw<S: PixelSink + ?Sized>(
        &self,
        sink: &mut S,
        x: i32,
        y: i32,
        code: CodePoint,
        style: &TextStyle,
        cursor: &mut FillCursor,
    ) -> i32 {
        let width = self.cell.width as i32;
        let height = self.cell.height as i32;
        if !self.info.contains(code) {
            return draw_dummy(sink, x, y, width, height, style, cursor);
        }
        let bytes_per_row = self.bytes_per_row();
        let start = self.info.glyph_index(code, style.cp437) * bytes_per_row * height as usize;
        let glyph = BmpGlyph {
            data: self.chartbl.get(start..).unwrap_or(&[]),
            width,
            height,
            bytes_per_row,
            margin: 0,
        };
        draw_char_bmp(sink, x, y, style, glyph)
    }
}

/// Proportional bitmap font covering 0x20..=0x7F
///
/// With the default spacing of 0 every row is exactly `(width + 7) / 8`
/// bytes. The classic tables instead count one blank spacing column in
/// each width entry without storing it; [`with_spacing`](Self::with_spacing)
/// selects that layout.
#[derive(Debug, Clone, Copy)]
pub struct BmpFont<'a> {
    glyphs: &'a [&'a [u8]],
    widths: &'a [u8],
    height: u8,
    baseline: u8,
    spacing: u8,
}

impl<'a> BmpFont<'a> {
    /// `glyphs` and `widths` are indexed by `code - 0x20`
    pub const fn new(glyphs: &'a [&'a [u8]], widths: &'a [u8], height: u8, baseline: u8) -> Self {
        Self {
            glyphs,
            widths,
            height,
            baseline,
            spacing: 0,
        }
    }

    /// Number of trailing spacing columns included in each width entry
    pub const fn with_spacing(mut self, spacing: u8) -> Self {
        self.spacing = spacing;
        self
    }

    pub(crate) fn width_of(&self, idx: usize) -> u8 {
        self.widths.get(idx).copied().unwrap_or(0)
    }

    pub fn default_metrics(&self) -> GlyphMetrics {
        FontBox::new(0, self.height, self.baseline).default_metrics()
    }

    /// Codes outside the table report the width of the first (space) glyph
    pub fn update_metrics(&self, metrics: &mut GlyphMetrics, code: CodePoint) -> bool {
        let idx = ascii_index(code);
        let width = self.width_of(idx.unwrap_or(0)) as i16;
        metrics.width = width;
        metrics.x_advance = width;
        idx.is_some()
    }

    pub fn draw<S: PixelSink + ?Sized>(
        &self,
        sink: &mut S,
        x: i32,
        y: i32,
        code: CodePoint,
        style: &TextStyle,
        cursor: &mut FillCursor,
    ) -> i32 {
        let height = self.height as i32;
        let Some(idx) = ascii_index(code) else {
            return draw_dummy(sink, x, y, self.width_of(0) as i32, height, style, cursor);
        };
        let width = self.width_of(idx) as i32;
        let margin = self.spacing as i32;
        let glyph = BmpGlyph {
            data: self.glyphs.get(idx).copied().unwrap_or(&[]),
            width,
            height,
            bytes_per_row: ((width - margin).max(0) as usize + 7) >> 3,
            margin,
        };
        draw_char_bmp(sink, x, y, style, glyph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixfont_core::{Fixed16, Rgb888};
    use pixfont_record::RecordingSink;

    #[test]
    fn test_ascii_index_bounds() {
        assert_eq!(ascii_index(0x20), Some(0));
        assert_eq!(ascii_index(0x7F), Some(0x5F));
        assert_eq!(ascii_index(0x80), None);
        assert_eq!(ascii_index(0x1F), None);
    }

    #[test]
    fn test_fixed_bmp_two_byte_rows() {
        // 10 wide, 2 high: row 0 fully set, row 1 only the last column
        let table = [0xFF, 0xC0, 0x00, 0x40];
        let font = FixedBmpFont::new(&table, GlcdInfo::new(0x30, 0x30, 0), FontBox::new(10, 2, 2));
        let mut m = font.default_metrics();
        assert!(font.update_metrics(&mut m, 0x30));
        assert_eq!(m.x_advance, 10);
        let mut sink = RecordingSink::new();
        let style = TextStyle::transparent(Rgb888::WHITE);
        let adv = font.draw(&mut sink, 0, 0, 0x30, &style, &mut FillCursor::new(0));
        assert_eq!(adv, 10);
        assert_eq!(sink.fills_of(Rgb888::WHITE), vec![(0, 0, 10, 1), (9, 1, 1, 1)]);
    }

    #[test]
    fn test_bmp_miss_reports_space_width() {
        let widths = [3u8; ASCII_GLYPHS];
        let glyphs: [&[u8]; 0] = [];
        let font = BmpFont::new(&glyphs, &widths, 8, 6);
        let mut m = font.default_metrics();
        assert!(!font.update_metrics(&mut m, 0x100));
        assert_eq!(m.x_advance, 3);
    }

    #[test]
    fn test_bmp_classic_spacing_layout() {
        // width entry 4 = 3 stored columns + 1 spacing column
        let glyph: &[u8] = &[0xE0];
        let glyphs = [glyph];
        let widths = [4u8];
        let font = BmpFont::new(&glyphs, &widths, 1, 1).with_spacing(1);
        let mut sink = RecordingSink::new();
        let style = TextStyle::new(Rgb888::WHITE, Rgb888::BLACK).with_size(Fixed16::from_int(2));
        let adv = font.draw(&mut sink, 0, 0, 0x20, &style, &mut FillCursor::new(0));
        assert_eq!(adv, 8);
        assert_eq!(sink.fills_of(Rgb888::BLACK), vec![(6, 0, 2, 2)]);
        assert_eq!(sink.fills_of(Rgb888::WHITE), vec![(0, 0, 6, 2)]);
    }
}
