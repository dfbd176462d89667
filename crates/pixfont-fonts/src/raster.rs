// this_file: crates/pixfont-fonts/src/raster.rs

//! Building blocks shared by the glyph rasterisers

use pixfont_core::{FillCursor, Fixed16, GlyphMetrics, PixelSink, TextStyle, WriteGuard};

/// Foreground and background converted to the sink's native pixels
///
/// Indexed by "is foreground", so a decoded bit selects its colour directly.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColorTable([u32; 2]);

impl ColorTable {
    pub(crate) fn new<S: PixelSink + ?Sized>(sink: &S, style: &TextStyle) -> Self {
        let cc = sink.color_converter();
        Self([cc.convert(style.back), cc.convert(style.fore)])
    }

    #[inline]
    pub(crate) fn get(&self, fore: bool) -> u32 {
        self.0[fore as usize]
    }

    #[inline]
    pub(crate) fn back(&self) -> u32 {
        self.0[0]
    }

    #[inline]
    pub(crate) fn fore(&self) -> u32 {
        self.0[1]
    }
}

/// Width, height and baseline every fixed-layout format stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontBox {
    pub width: u8,
    pub height: u8,
    pub baseline: u8,
}

impl FontBox {
    pub const fn new(width: u8, height: u8, baseline: u8) -> Self {
        Self { width, height, baseline }
    }

    pub(crate) fn default_metrics(&self) -> GlyphMetrics {
        GlyphMetrics {
            width: self.width as i16,
            x_advance: self.width as i16,
            x_offset: 0,
            height: self.height as i16,
            y_advance: self.height as i16,
            y_offset: 0,
            baseline: self.baseline as i16,
        }
    }
}

/// Placeholder box for code points a font cannot draw
///
/// Paints the background box when background fill is on, then a one pixel
/// inset outline in the foreground colour. Returns the scaled width.
pub fn draw_dummy<S: PixelSink + ?Sized>(
    sink: &mut S,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    style: &TextStyle,
    cursor: &mut FillCursor,
) -> i32 {
    let w = style.size_x.scale(w);
    let h = style.size_y.scale(h);
    log::trace!("Dummy glyph {w}x{h} at ({x}, {y})");
    let mut sink = WriteGuard::new(sink);
    if style.fill_background() {
        sink.fill_rect(x, y, w, h, style.back);
        cursor.set_filled_x(x + w);
    }
    if 2 < w && 2 < h {
        sink.draw_rect(x + 1, y + 1, w - 2, h - 2, style.fore);
    }
    w
}

/// Layout of one row-major 1bpp glyph
#[derive(Debug, Clone, Copy)]
pub(crate) struct BmpGlyph<'a> {
    pub data: &'a [u8],
    /// Cell width including any spacing columns
    pub width: i32,
    pub height: i32,
    pub bytes_per_row: usize,
    /// Trailing spacing columns not present in the bitmap
    pub margin: i32,
}

#[inline]
fn row_bit(row: &[u8], j: i32) -> bool {
    let byte = row.get((j >> 3) as usize).copied().unwrap_or(0);
    byte & (0x80 >> (j & 7)) != 0
}

/// Draw a row-major, MSB-first 1bpp glyph by merging horizontal runs
///
/// When down-scaling maps several source rows onto one destination row
/// the collapsed rows are still drawn one pixel high, and background is
/// filled only for the first of them. Foreground runs that scale to zero
/// width are widened to one pixel.
pub(crate) fn draw_char_bmp<S: PixelSink + ?Sized>(
    sink: &mut S,
    x: i32,
    y: i32,
    style: &TextStyle,
    glyph: BmpGlyph<'_>,
) -> i32 {
    let colors = ColorTable::new(sink, style);
    let fill_bg = style.fill_background();
    let (sx, sy) = (style.size_x, style.size_y);
    let mut sink = WriteGuard::new(sink);

    if fill_bg && glyph.margin > 0 {
        let x0 = sx.scale(glyph.width - glyph.margin);
        let x1 = sx.scale(glyph.width);
        if x0 < x1 {
            sink.set_raw_color(colors.back());
            sink.write_fill_rect(x + x0, y, x1 - x0, sy.scale(glyph.height));
        }
    }

    let je = glyph.width - glyph.margin;
    let height = sy.scale(glyph.height);
    let mut y0 = -1;
    let mut y1 = 0;
    for i in 1..=glyph.height {
        let fill = y0 != y1;
        y0 = y1;
        y1 = sy.scale(i);
        let h = if y1 < height && y0 == y1 { 1 } else { y1 - y0 };
        if je <= 0 {
            continue;
        }
        let start = (i as usize - 1) * glyph.bytes_per_row;
        let row = glyph.data.get(start..).unwrap_or(&[]);

        let mut flg = row_bit(row, 0);
        let mut j = 1;
        let mut x0 = 0;
        loop {
            while j < je && row_bit(row, j) == flg {
                j += 1;
            }
            let mut x1 = sx.scale(j);
            if flg || (fill_bg && fill) {
                sink.set_raw_color(colors.get(flg));
                if flg && x1 == x0 {
                    x1 += 1;
                }
                sink.write_fill_rect(x + x0, y + y0, x1 - x0, h);
            }
            x0 = x1;
            flg = !flg;
            if j >= je {
                break;
            }
        }
    }
    sx.scale(glyph.width)
}

/// Background a glyph owns on its line, clipped by what is already painted
///
/// Empty (left == right) when background fill is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BgSpan {
    pub left: i32,
    pub right: i32,
}

impl BgSpan {
    /// `x` is the pen position, `x_offset`, `scaled_width` and `x_advance`
    /// are already scaled. Advances the cursor to the span's right edge.
    pub(crate) fn claim(
        fill_bg: bool,
        x: i32,
        x_offset: i32,
        scaled_width: i32,
        x_advance: i32,
        cursor: &mut FillCursor,
    ) -> Self {
        if !fill_bg {
            return Self { left: 0, right: 0 };
        }
        let left = cursor.filled_x().max(x + x_offset.min(0));
        let right = x + (scaled_width + x_offset).max(x_advance);
        cursor.set_filled_x(right);
        Self { left, right }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.left >= self.right
    }

    #[inline]
    pub(crate) fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Fill the band above `y_offset` and below `y_offset + h` down to the
    /// line height, in the current raw colour
    pub(crate) fn fill_bands<S: PixelSink + ?Sized>(
        &self,
        sink: &mut S,
        y: i32,
        y_offset: i32,
        h: i32,
        line_height: i32,
        sy: Fixed16,
    ) {
        if self.is_empty() {
            return;
        }
        if y_offset > 0 {
            sink.write_fill_rect(self.left, y, self.width(), sy.scale(y_offset));
        }
        let y0 = sy.scale(y_offset + h);
        let y1 = sy.scale(line_height);
        if y0 < y1 {
            sink.write_fill_rect(self.left, y + y0, self.width(), y1 - y0);
        }
    }
}
