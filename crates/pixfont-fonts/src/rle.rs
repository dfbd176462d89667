// this_file: crates/pixfont-fonts/src/rle.rs

//! Run-length encoded proportional fonts
//!
//! Same 96-glyph ASCII addressing as [`BmpFont`](crate::BmpFont). Each glyph
//! is a byte stream of runs: the high bit is the colour, the low seven bits
//! the run length minus one. Runs wrap from one row to the next.

use pixfont_core::{CodePoint, FillCursor, GlyphMetrics, PixelSink, TextStyle, WriteGuard};

use crate::bmp::ascii_index;
use crate::raster::{draw_dummy, ColorTable, FontBox};

#[derive(Debug, Clone, Copy)]
pub struct RleFont<'a> {
    glyphs: &'a [&'a [u8]],
    widths: &'a [u8],
    height: u8,
    baseline: u8,
}

impl<'a> RleFont<'a> {
    pub const fn new(glyphs: &'a [&'a [u8]], widths: &'a [u8], height: u8, baseline: u8) -> Self {
        Self {
            glyphs,
            widths,
            height,
            baseline,
        }
    }

    fn width_of(&self, idx: usize) -> u8 {
        self.widths.get(idx).copied().unwrap_or(0)
    }

    pub fn default_metrics(&self) -> GlyphMetrics {
        FontBox::new(0, self.height, self.baseline).default_metrics()
    }

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
        let font_height = self.height as i32;
        let Some(idx) = ascii_index(code) else {
            return draw_dummy(sink, x, y, self.width_of(0) as i32, font_height, style, cursor);
        };
        let font_width = self.width_of(idx) as i32;
        let (sx, sy) = (style.size_x, style.size_y);
        if font_width == 0 {
            return 0;
        }
        let runs = self.glyphs.get(idx).copied().unwrap_or(&[]);

        let colors = ColorTable::new(sink, style);
        let fill_bg = style.fill_background();
        let mut sink = WriteGuard::new(sink);

        let mut i = 1;
        let mut j = 0;
        let mut x0 = 0;
        let mut y0 = 0;
        let mut y1 = sy.scale(1);
        let mut runs = runs.iter();
        while i <= font_height {
            let Some(&token) = runs.next() else {
                break;
            };
            let flg = token & 0x80 != 0;
            let mut line = (token & 0x7F) as i32 + 1;
            while line > 0 {
                let len = line.min(font_width - j);
                line -= len;
                j += len;
                let x1 = sx.scale(j);
                if fill_bg || flg {
                    sink.set_raw_color(colors.get(flg));
                    sink.write_fill_rect(x + x0, y + y0, x1 - x0, y1 - y0);
                }
                x0 = x1;
                if j == font_width {
                    j = 0;
                    x0 = 0;
                    y0 = y1;
                    i += 1;
                    y1 = sy.scale(i);
                }
            }
        }
        sx.scale(font_width)
    }
}
