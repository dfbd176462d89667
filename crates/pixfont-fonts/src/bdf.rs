// this_file: crates/pixfont-fonts/src/bdf.rs

//! Fixed-height bitmap fonts with a sorted code index
//!
//! Used for large CJK sets converted from BDF: codes below 0x100 are
//! half-width cells, everything else full-width. Rows are always
//! `(width + 7) / 8` bytes, sized for the full-width cell.

use pixfont_core::{CodePoint, FillCursor, GlyphMetrics, PixelSink, TextStyle};

use crate::raster::{draw_char_bmp, draw_dummy, BmpGlyph, FontBox};

#[derive(Debug, Clone, Copy)]
pub struct BdfFont<'a> {
    chartbl: &'a [u8],
    indextbl: &'a [u16],
    cell: FontBox,
    halfwidth: u8,
    y_advance: u8,
}

impl<'a> BdfFont<'a> {
    /// `indextbl` must be sorted ascending; glyph `i` of `chartbl` draws
    /// `indextbl[i]`
    pub const fn new(
        chartbl: &'a [u8],
        indextbl: &'a [u16],
        cell: FontBox,
        halfwidth: u8,
        y_advance: u8,
    ) -> Self {
        Self {
            chartbl,
            indextbl,
            cell,
            halfwidth,
            y_advance,
        }
    }

    fn cell_width(&self, code: CodePoint) -> u8 {
        if code < 0x100 {
            self.halfwidth
        } else {
            self.cell.width
        }
    }

    pub fn default_metrics(&self) -> GlyphMetrics {
        let mut metrics = self.cell.default_metrics();
        metrics.y_advance = self.y_advance as i16;
        metrics
    }

    /// Cell widths are known for every code, so this always succeeds
    pub fn update_metrics(&self, metrics: &mut GlyphMetrics, code: CodePoint) -> bool {
        let width = self.cell_width(code) as i16;
        metrics.width = width;
        metrics.x_advance = width;
        true
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
        let width = self.cell_width(code) as i32;
        let height = self.cell.height as i32;
        let Ok(idx) = self.indextbl.binary_search(&code) else {
            return draw_dummy(sink, x, y, width, height, style, cursor);
        };
        let bytes_per_row = (self.cell.width as usize + 7) >> 3;
        let start = idx * height as usize * bytes_per_row;
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
