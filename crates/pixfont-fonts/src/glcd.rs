// this_file: crates/pixfont-fonts/src/glcd.rs

//! Fixed-cell column-major fonts (the classic 5x7 "GLCD" layout)
//!
//! Each glyph is `datawidth` bytes, one per column, least significant bit
//! at the top. Vertically adjacent pixels of the same colour are merged
//! into one rectangle per run.

use pixfont_core::{CodePoint, FillCursor, GlyphMetrics, PixelSink, TextStyle, WriteGuard};

use crate::raster::{draw_dummy, ColorTable, FontBox};

/// The 3-byte header of a fixed-cell font: code range and bytes per glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlcdInfo {
    pub start: u8,
    pub end: u8,
    pub datawidth: u8,
}

impl GlcdInfo {
    pub const fn new(start: u8, end: u8, datawidth: u8) -> Self {
        Self { start, end, datawidth }
    }

    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    #[inline]
    pub fn contains(&self, code: CodePoint) -> bool {
        self.start as CodePoint <= code && code <= self.end as CodePoint
    }

    /// Table index for `code`, applying the classic charset shim
    ///
    /// Old tables lack one glyph before 176, so unless the caller asks for
    /// the true code page 437 layout, codes from 176 up are shifted by one.
    pub(crate) fn glyph_index(&self, code: CodePoint, cp437: bool) -> usize {
        let code = if !cp437 && code >= 176 { code + 1 } else { code };
        (code - self.start as CodePoint) as usize
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GlcdFont<'a> {
    chartbl: &'a [u8],
    info: GlcdInfo,
    cell: FontBox,
}

impl<'a> GlcdFont<'a> {
    pub const fn new(chartbl: &'a [u8], info: GlcdInfo, cell: FontBox) -> Self {
        Self { chartbl, info, cell }
    }

    pub fn info(&self) -> GlcdInfo {
        self.info
    }

    pub fn default_metrics(&self) -> GlyphMetrics {
        self.cell.default_metrics()
    }

    /// Fixed cells: only reports whether `code` is covered
    pub fn update_metrics(&self, _metrics: &mut GlyphMetrics, code: CodePoint) -> bool {
        self.info.contains(code)
    }

    pub fn draw<S: PixelSink + ?Sized>(
        &self,
        sink: &mut S,
        mut x: i32,
        y: i32,
        code: CodePoint,
        style: &TextStyle,
        cursor: &mut FillCursor,
    ) -> i32 {
        let font_width = self.cell.width as i32;
        let font_height = self.cell.height as i32;
        if !self.info.contains(code) {
            return draw_dummy(sink, x, y, font_width, font_height, style, cursor);
        }
        let datawidth = self.info.datawidth as usize;
        let start = self.info.glyph_index(code, style.cp437) * datawidth;
        let glyph = self.chartbl.get(start..).unwrap_or(&[]);

        let colors = ColorTable::new(sink, style);
        let fill_bg = style.fill_background();
        let (sx, sy) = (style.size_x, style.size_y);
        let mut sink = WriteGuard::new(sink);

        let mut x1 = 0;
        for i in 0..datawidth {
            let line = glyph.get(i).copied().unwrap_or(0);
            let bit = |j: i32| (line >> j) & 1 != 0;
            let mut flg = bit(0);
            let mut j = 1;
            let mut y1 = 0;
            let x0 = x1;
            x1 = sx.scale(i as i32 + 1);
            let w = x1 - x0;
            loop {
                while j < font_height && bit(j) == flg {
                    j += 1;
                }
                let y0 = y1;
                y1 = sy.scale(j);
                if flg || fill_bg {
                    sink.set_raw_color(colors.get(flg));
                    sink.write_fill_rect(x, y + y0, w, y1 - y0);
                }
                flg = !flg;
                if j >= font_height {
                    break;
                }
            }
            x += w;
        }

        let x2 = sx.scale(font_width);
        if fill_bg && (datawidth as i32) < font_width {
            sink.set_raw_color(colors.back());
            sink.write_fill_rect(x, y, x2 - x1, sy.scale(font_height));
        }
        x2
    }
}
