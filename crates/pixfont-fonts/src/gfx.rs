// this_file: crates/pixfont-fonts/src/gfx.rs

//! Glyph-table fonts with per-glyph bounding boxes (Adafruit GFX layout)
//!
//! Glyph bitmaps are packed MSB-first with no row padding: the first pixel
//! of a row follows the last pixel of the previous one in the same byte.
//! Codes map to table entries either contiguously from `first` or through
//! a list of ranges for sparse sets.

use pixfont_core::{CodePoint, FillCursor, GlyphMetrics, PixelSink, TextStyle, WriteGuard};

use crate::raster::{draw_dummy, BgSpan, ColorTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GfxGlyph {
    pub bitmap_offset: u32,
    pub width: u8,
    pub height: u8,
    pub x_advance: u8,
    pub x_offset: i8,
    /// Distance from the baseline to the top row, usually negative
    pub y_offset: i8,
}

impl GfxGlyph {
    pub const fn new(bitmap_offset: u32, width: u8, height: u8, x_advance: u8, x_offset: i8, y_offset: i8) -> Self {
        Self {
            bitmap_offset,
            width,
            height,
            x_advance,
            x_offset,
            y_offset,
        }
    }
}

/// Codes `start..=end` live at glyph table entries from `base` on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeRange {
    pub start: u16,
    pub end: u16,
    pub base: u16,
}

impl EncodeRange {
    pub const fn new(start: u16, end: u16, base: u16) -> Self {
        Self { start, end, base }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GfxFont<'a> {
    bitmap: &'a [u8],
    glyphs: &'a [GfxGlyph],
    first: u16,
    last: u16,
    y_advance: u8,
    ranges: &'a [EncodeRange],
}

impl<'a> GfxFont<'a> {
    /// Contiguous font: glyph `i` draws code `first + i`
    pub const fn new(bitmap: &'a [u8], glyphs: &'a [GfxGlyph], first: u16, last: u16, y_advance: u8) -> Self {
        Self {
            bitmap,
            glyphs,
            first,
            last,
            y_advance,
            ranges: &[],
        }
    }

    /// Sparse font addressed through `ranges`; `first`/`last` bound them all
    pub const fn with_ranges(mut self, ranges: &'a [EncodeRange]) -> Self {
        self.ranges = ranges;
        self
    }

    pub fn glyph(&self, code: CodePoint) -> Option<&GfxGlyph> {
        if code < self.first || code > self.last {
            return None;
        }
        if self.ranges.is_empty() {
            return self.glyphs.get((code - self.first) as usize);
        }
        let range = self.ranges.iter().find(|r| r.start <= code && code <= r.end)?;
        self.glyphs.get((code - range.start) as usize + range.base as usize)
    }

    fn glyph_count(&self) -> usize {
        let count = if self.ranges.is_empty() {
            self.last.saturating_sub(self.first) as usize + 1
        } else {
            self.ranges
                .iter()
                .map(|r| r.end.saturating_sub(r.start) as usize + 1)
                .sum()
        };
        count.min(self.glyphs.len())
    }

    /// Scans every glyph for the tallest ascent and deepest descent
    pub fn default_metrics(&self) -> GlyphMetrics {
        let mut above = 0i16;
        let mut below = 0i16;
        for glyph in &self.glyphs[..self.glyph_count()] {
            let ab = -(glyph.y_offset as i16);
            above = above.max(ab);
            below = below.max(glyph.height as i16 - ab);
        }
        let width = match self.glyph(0x20) {
            Some(space) => space.x_advance as i16,
            None => (self.y_advance >> 1) as i16,
        };
        GlyphMetrics {
            width,
            x_advance: width,
            x_offset: 0,
            height: above + below,
            y_advance: self.y_advance as i16,
            y_offset: -above,
            baseline: above,
        }
    }

    /// Missing codes report the space glyph, or half the line height
    pub fn update_metrics(&self, metrics: &mut GlyphMetrics, code: CodePoint) -> bool {
        let found = self.glyph(code);
        let Some(glyph) = found.or_else(|| self.glyph(0x20)) else {
            metrics.x_offset = 0;
            metrics.width = (self.y_advance >> 1) as i16;
            metrics.x_advance = metrics.width;
            return false;
        };
        metrics.x_offset = glyph.x_offset as i16;
        metrics.width = glyph.width as i16;
        metrics.x_advance = glyph.x_advance as i16;
        found.is_some()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw<S: PixelSink + ?Sized>(
        &self,
        sink: &mut S,
        x: i32,
        y: i32,
        code: CodePoint,
        style: &TextStyle,
        line: &GlyphMetrics,
        cursor: &mut FillCursor,
    ) -> i32 {
        let Some(glyph) = self.glyph(code) else {
            return match self.glyph(0x20) {
                Some(space) => {
                    draw_dummy(sink, x, y, space.x_advance as i32, line.height as i32, style, cursor)
                },
                None => 0,
            };
        };
        let w = glyph.width as i32;
        let h = glyph.height as i32;
        let (sx, sy) = (style.size_x, style.size_y);
        let x_advance = sx.scale(glyph.x_advance as i32);
        let x_offset = sx.scale(glyph.x_offset as i32);

        let colors = ColorTable::new(sink, style);
        let span = BgSpan::claim(style.fill_background(), x, x_offset, sx.scale(w), x_advance, cursor);
        let x = x + x_offset;
        let y_offset = glyph.y_offset as i32 - line.y_offset as i32;

        let mut sink = WriteGuard::new(sink);
        sink.set_raw_color(colors.back());
        span.fill_bands(&mut *sink, y, y_offset, h, line.height as i32, sy);

        if h == 0 || w == 0 {
            return x_advance;
        }

        let bits = Bits::new(self.bitmap, glyph.bitmap_offset as usize, (w * h) as usize);
        let mut runs = bits.runs();
        let mut run = (false, 0usize);

        sink.set_raw_color(colors.fore());
        let limit_width = sx.scale(w);
        let limit_height = sy.scale(h + y_offset);
        let mut y1 = sy.scale(y_offset);
        let mut y0 = y1 - 1;
        for i in 1..=h {
            let fill = y0 != y1;
            y0 = y1;
            y1 = sy.scale(i + y_offset);
            let fh = if y1 < limit_height && y1 == y0 { 1 } else { y1 - y0 };

            if !span.is_empty() && fill {
                sink.set_raw_color(colors.back());
                sink.write_fill_rect(span.left, y + y0, span.width(), fh);
                sink.set_raw_color(colors.fore());
            }

            let mut remain = w as usize;
            let mut j = 0;
            let mut x0 = 0;
            while remain > 0 {
                if run.1 == 0 {
                    run = runs.next().unwrap_or((false, remain));
                }
                let l = run.1.min(remain);
                remain -= l;
                run.1 -= l;
                j += l as i32;
                let x1 = sx.scale(j);
                if run.0 {
                    let fw = if x1 < limit_width && x1 == x0 { 1 } else { x1 - x0 };
                    sink.write_fill_rect(x + x0, y + y0, fw, fh);
                }
                x0 = x1;
            }
        }
        x_advance
    }
}

/// MSB-first bit stream of one glyph
struct Bits<'a> {
    data: &'a [u8],
    start: usize,
    len: usize,
}

impl<'a> Bits<'a> {
    fn new(data: &'a [u8], byte_offset: usize, len: usize) -> Self {
        Self {
            data,
            start: byte_offset * 8,
            len,
        }
    }

    fn get(&self, i: usize) -> bool {
        let bit = self.start + i;
        let byte = self.data.get(bit >> 3).copied().unwrap_or(0);
        byte & (0x80 >> (bit & 7)) != 0
    }

    /// Maximal runs of equal bits as `(value, length)`
    fn runs(self) -> impl Iterator<Item = (bool, usize)> + 'a {
        let mut pos = 0;
        std::iter::from_fn(move || {
            if pos >= self.len {
                return None;
            }
            let value = self.get(pos);
            let begin = pos;
            while pos < self.len && self.get(pos) == value {
                pos += 1;
            }
            Some((value, pos - begin))
        })
    }
}
