// this_file: crates/pixfont-fonts/src/text.rs

//! Single-line text helpers on top of [`Font`]

use pixfont_core::{CodePoint, FillCursor, PixelSink, TextStyle, WriteGuard, REPLACEMENT_CODE};

use crate::Font;

/// Code points of `text` as glyph tables see them
///
/// Control characters are dropped; characters outside the Basic
/// Multilingual Plane become [`REPLACEMENT_CODE`].
pub fn code_points(text: &str) -> impl Iterator<Item = CodePoint> + '_ {
    text.chars().filter_map(|ch| {
        let c = ch as u32;
        if c < 0x20 {
            None
        } else {
            Some(CodePoint::try_from(c).unwrap_or(REPLACEMENT_CODE))
        }
    })
}

/// Width of `text` as [`draw_string`] would paint it
///
/// The last glyph counts with its full box when that reaches past its
/// advance, and a negative offset on the first glyph shifts the start.
pub fn text_width(font: &Font<'_>, text: &str, style: &TextStyle) -> i32 {
    let sx = style.size_x;
    let mut metrics = font.default_metrics();
    let mut left = 0;
    let mut right = 0;
    for code in code_points(text) {
        font.update_metrics(&mut metrics, code);
        let x_offset = sx.scale(metrics.x_offset as i32);
        if left == 0 && right == 0 && metrics.x_offset < 0 {
            left = -x_offset;
            right = left;
        }
        let advance = sx.scale(metrics.x_advance as i32);
        right = left + advance.max(sx.scale(metrics.width as i32) + x_offset);
        left += advance;
    }
    right
}

/// Draw one line of text with its line box's top-left corner at `(x, y)`
///
/// All glyphs share one write transaction and one [`FillCursor`], so
/// overlapping glyph boxes never paint background twice. Returns the total
/// advance.
pub fn draw_string<S: PixelSink + ?Sized>(
    sink: &mut S,
    font: &Font<'_>,
    x: i32,
    y: i32,
    text: &str,
    style: &TextStyle,
) -> i32 {
    let line = font.default_metrics();
    let mut codes = code_points(text).peekable();
    let mut sum_x = 0;
    if let Some(&first) = codes.peek() {
        let mut metrics = line;
        font.update_metrics(&mut metrics, first);
        if metrics.x_offset < 0 {
            sum_x = -style.size_x.scale(metrics.x_offset as i32);
        }
    }

    let mut cursor = FillCursor::new(x);
    let mut sink = WriteGuard::new(sink);
    for code in codes {
        sum_x += font.draw_glyph(&mut *sink, x + sum_x, y, code, style, &line, &mut cursor);
    }
    sum_x
}
