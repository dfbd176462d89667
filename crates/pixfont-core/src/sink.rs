// this_file: crates/pixfont-core/src/sink.rs

//! The one capability every glyph rasteriser needs: a place to put pixels
//!
//! Fonts decompose each glyph into solid rectangles. A panel driver, a
//! framebuffer or a recorder in a test only has to implement
//! [`PixelSink`] to receive them.

use std::ops::{Deref, DerefMut};

use crate::{Rect, Rgb888};

/// Native pixel layouts a sink may use internally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorDepth {
    Rgb888,
    Rgb565,
    Rgb332,
    Gray8,
}

impl ColorDepth {
    pub fn bits(self) -> u8 {
        match self {
            ColorDepth::Rgb888 => 24,
            ColorDepth::Rgb565 => 16,
            ColorDepth::Rgb332 | ColorDepth::Gray8 => 8,
        }
    }
}

/// Converts between RGB888 and a sink's native pixel value
///
/// Rasterisers convert the foreground and background colours once per
/// glyph and then only hand raw values to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConverter {
    pub depth: ColorDepth,
}

impl ColorConverter {
    pub const fn new(depth: ColorDepth) -> Self {
        Self { depth }
    }

    pub fn convert(&self, color: Rgb888) -> u32 {
        let (r, g, b) = (color.r as u32, color.g as u32, color.b as u32);
        match self.depth {
            ColorDepth::Rgb888 => color.to_u32(),
            ColorDepth::Rgb565 => ((r >> 3) << 11) | ((g >> 2) << 5) | (b >> 3),
            ColorDepth::Rgb332 => ((r >> 5) << 5) | ((g >> 5) << 2) | (b >> 6),
            // ITU-R BT.601 luma in integer form
            ColorDepth::Gray8 => (r * 77 + g * 150 + b * 29) >> 8,
        }
    }

    /// Expand a raw value back to RGB888 (lossy for reduced depths)
    pub fn revert(&self, raw: u32) -> Rgb888 {
        match self.depth {
            ColorDepth::Rgb888 => Rgb888::from_u32(raw),
            ColorDepth::Rgb565 => {
                let r = ((raw >> 11) & 0x1F) as u8;
                let g = ((raw >> 5) & 0x3F) as u8;
                let b = (raw & 0x1F) as u8;
                Rgb888::new((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
            },
            ColorDepth::Rgb332 => {
                let r = (raw >> 5) & 0x07;
                let g = (raw >> 2) & 0x07;
                let b = raw & 0x03;
                Rgb888::new((r * 255 / 7) as u8, (g * 255 / 7) as u8, (b * 85) as u8)
            },
            ColorDepth::Gray8 => {
                let l = (raw & 0xFF) as u8;
                Rgb888::new(l, l, l)
            },
        }
    }
}

impl Default for ColorConverter {
    fn default() -> Self {
        Self::new(ColorDepth::Rgb888)
    }
}

/// Destination for rasterised glyphs
///
/// Only the raw-colour primitives are required; everything else has a
/// default built on top of them. Calls must be applied in the order they
/// are issued: later glyphs on a line rely on earlier ones having painted
/// their background.
pub trait PixelSink {
    /// Open a drawing transaction (bus acquisition, DMA setup, ...)
    fn begin_write(&mut self) {}

    /// Close the transaction opened by the matching `begin_write`
    fn end_write(&mut self) {}

    /// How RGB888 values map onto this sink's raw pixels
    fn color_converter(&self) -> ColorConverter;

    /// Select the current fill colour as a pre-converted native value
    fn set_raw_color(&mut self, raw: u32);

    /// Fill a rectangle with the current raw colour
    fn write_fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32);

    /// Select the current fill colour from RGB888
    fn set_color(&mut self, color: Rgb888) {
        let raw = self.color_converter().convert(color);
        self.set_raw_color(raw);
    }

    /// Self-contained solid fill
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb888) {
        self.begin_write();
        self.set_color(color);
        self.write_fill_rect(x, y, w, h);
        self.end_write();
    }

    /// One-pixel outline
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb888) {
        if w <= 0 || h <= 0 {
            return;
        }
        self.begin_write();
        self.set_color(color);
        self.write_fill_rect(x, y, w, 1);
        if h > 1 {
            self.write_fill_rect(x, y + h - 1, w, 1);
        }
        if h > 2 {
            self.write_fill_rect(x, y + 1, 1, h - 2);
            if w > 1 {
                self.write_fill_rect(x + w - 1, y + 1, 1, h - 2);
            }
        }
        self.end_write();
    }

    /// Read back a `w * h` block of pixels, row-major, into `buf`
    ///
    /// Only called when [`is_readable`](Self::is_readable) returns true.
    fn read_rect_rgb(&mut self, _x: i32, _y: i32, _w: i32, _h: i32, _buf: &mut [Rgb888]) {}

    /// Write a `w * h` block of pixels, row-major
    fn push_rect_rgb(&mut self, x: i32, y: i32, w: i32, h: i32, buf: &[Rgb888]) {
        if w <= 0 || h <= 0 {
            return;
        }
        self.begin_write();
        for (i, color) in buf.iter().take((w * h) as usize).enumerate() {
            let i = i as i32;
            self.set_color(*color);
            self.write_fill_rect(x + i % w, y + i / w, 1, 1);
        }
        self.end_write();
    }

    /// Whether pixels can be read back for blending
    fn is_readable(&self) -> bool {
        false
    }

    /// Whether raw values are palette indices rather than colours
    fn has_palette(&self) -> bool {
        false
    }

    /// Colour assumed underneath transparent text when nothing can be read
    fn base_color(&self) -> Rgb888 {
        Rgb888::BLACK
    }

    /// Current clip rectangle
    fn clip_rect(&self) -> Rect {
        Rect::UNBOUNDED
    }
}

impl<S: PixelSink + ?Sized> PixelSink for &mut S {
    fn begin_write(&mut self) {
        (**self).begin_write()
    }
    fn end_write(&mut self) {
        (**self).end_write()
    }
    fn color_converter(&self) -> ColorConverter {
        (**self).color_converter()
    }
    fn set_raw_color(&mut self, raw: u32) {
        (**self).set_raw_color(raw)
    }
    fn write_fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        (**self).write_fill_rect(x, y, w, h)
    }
    fn set_color(&mut self, color: Rgb888) {
        (**self).set_color(color)
    }
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb888) {
        (**self).fill_rect(x, y, w, h, color)
    }
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb888) {
        (**self).draw_rect(x, y, w, h, color)
    }
    fn read_rect_rgb(&mut self, x: i32, y: i32, w: i32, h: i32, buf: &mut [Rgb888]) {
        (**self).read_rect_rgb(x, y, w, h, buf)
    }
    fn push_rect_rgb(&mut self, x: i32, y: i32, w: i32, h: i32, buf: &[Rgb888]) {
        (**self).push_rect_rgb(x, y, w, h, buf)
    }
    fn is_readable(&self) -> bool {
        (**self).is_readable()
    }
    fn has_palette(&self) -> bool {
        (**self).has_palette()
    }
    fn base_color(&self) -> Rgb888 {
        (**self).base_color()
    }
    fn clip_rect(&self) -> Rect {
        (**self).clip_rect()
    }
}

/// Scoped write transaction
///
/// `begin_write` runs on construction and `end_write` when the guard is
/// dropped, so every return path of a draw call releases the sink.
pub struct WriteGuard<'a, S: PixelSink + ?Sized> {
    sink: &'a mut S,
}

impl<'a, S: PixelSink + ?Sized> WriteGuard<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        sink.begin_write();
        Self { sink }
    }
}

impl<S: PixelSink + ?Sized> Deref for WriteGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.sink
    }
}

impl<S: PixelSink + ?Sized> DerefMut for WriteGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.sink
    }
}

impl<S: PixelSink + ?Sized> Drop for WriteGuard<'_, S> {
    fn drop(&mut self) {
        self.sink.end_write();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Probe {
        depth: i32,
        max_depth: i32,
        raw: u32,
        fills: Vec<(i32, i32, i32, i32, u32)>,
    }

    impl PixelSink for Probe {
        fn begin_write(&mut self) {
            self.depth += 1;
            self.max_depth = self.max_depth.max(self.depth);
        }
        fn end_write(&mut self) {
            self.depth -= 1;
        }
        fn color_converter(&self) -> ColorConverter {
            ColorConverter::new(ColorDepth::Rgb565)
        }
        fn set_raw_color(&mut self, raw: u32) {
            self.raw = raw;
        }
        fn write_fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
            self.fills.push((x, y, w, h, self.raw));
        }
    }

    #[test]
    fn test_rgb565_round_trip_extremes() {
        let cc = ColorConverter::new(ColorDepth::Rgb565);
        assert_eq!(cc.convert(Rgb888::WHITE), 0xFFFF);
        assert_eq!(cc.convert(Rgb888::BLACK), 0);
        assert_eq!(cc.revert(0xFFFF), Rgb888::WHITE);
        assert_eq!(cc.convert(Rgb888::new(255, 0, 0)), 0xF800);
    }

    #[test]
    fn test_gray_and_332_extremes() {
        let gray = ColorConverter::new(ColorDepth::Gray8);
        assert_eq!(gray.convert(Rgb888::WHITE), 255);
        assert_eq!(gray.revert(255), Rgb888::WHITE);
        let c332 = ColorConverter::new(ColorDepth::Rgb332);
        assert_eq!(c332.convert(Rgb888::WHITE), 0xFF);
        assert_eq!(c332.revert(0xFF), Rgb888::WHITE);
    }

    #[test]
    fn test_guard_balances_transaction() {
        let mut probe = Probe::default();
        {
            let mut guard = WriteGuard::new(&mut probe);
            guard.set_raw_color(7);
            guard.write_fill_rect(0, 0, 1, 1);
            assert_eq!(guard.depth, 1);
        }
        assert_eq!(probe.depth, 0);
        assert_eq!(probe.fills, vec![(0, 0, 1, 1, 7)]);
    }

    #[test]
    fn test_draw_rect_outline() {
        let mut probe = Probe::default();
        probe.draw_rect(10, 20, 4, 3, Rgb888::WHITE);
        assert_eq!(
            probe.fills,
            vec![
                (10, 20, 4, 1, 0xFFFF),
                (10, 22, 4, 1, 0xFFFF),
                (10, 21, 1, 1, 0xFFFF),
                (13, 21, 1, 1, 0xFFFF),
            ]
        );
        assert_eq!(probe.depth, 0);
    }

    #[test]
    fn test_push_rect_defaults_to_pixels() {
        let mut probe = Probe::default();
        let block = [Rgb888::BLACK, Rgb888::WHITE, Rgb888::WHITE, Rgb888::BLACK];
        probe.push_rect_rgb(5, 5, 2, 2, &block);
        assert_eq!(probe.fills.len(), 4);
        assert_eq!(probe.fills[1], (6, 5, 1, 1, 0xFFFF));
        assert_eq!(probe.fills[2], (5, 6, 1, 1, 0xFFFF));
    }
}
