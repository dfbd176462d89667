// this_file: backends/pixfont-canvas/src/lib.rs

//! Canvas - an in-memory framebuffer that glyphs can be drawn onto
//!
//! Stores RGB888 pixels, clips every fill to its bounds and an optional
//! clip rectangle, and supports read-back so anti-aliased glyphs can be
//! blended over existing content. `with_depth` emulates a panel with
//! fewer colour bits: every stored colour goes through the converter and
//! back.

use pixfont_core::{
    BitmapData, BitmapFormat, ColorConverter, ColorDepth, PixelSink, Rect, Rgb888,
};

#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgb888>,
    converter: ColorConverter,
    raw: u32,
    clip: Rect,
    palette: bool,
    base: Rgb888,
    depth: i32,
    max_depth: i32,
    transactions: usize,
}

impl Canvas {
    /// A canvas cleared to `background`
    pub fn new(width: u32, height: u32, background: Rgb888) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![background; len],
            converter: ColorConverter::default(),
            raw: 0,
            clip: Rect::new(0, 0, width as i32, height as i32),
            palette: false,
            base: background,
            depth: 0,
            max_depth: 0,
            transactions: 0,
        }
    }

    /// Emulate a lower colour depth
    pub fn with_depth(mut self, depth: ColorDepth) -> Self {
        self.converter = ColorConverter::new(depth);
        let cc = self.converter;
        self.pixels.iter_mut().for_each(|px| *px = cc.revert(cc.convert(*px)));
        self
    }

    /// Report raw values as palette indices
    ///
    /// Anti-aliased fonts then take their opaque path instead of blending
    /// over read-back pixels.
    pub fn with_palette(mut self, palette: bool) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_base_color(mut self, base: Rgb888) -> Self {
        self.base = base;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn depth(&self) -> ColorDepth {
        self.converter.depth
    }

    /// Restrict drawing to `clip` (intersected with the canvas bounds)
    pub fn set_clip_rect(&mut self, clip: Rect) {
        self.clip = clip.intersect(&self.bounds());
    }

    pub fn clear_clip_rect(&mut self) {
        self.clip = self.bounds();
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb888> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn pixels(&self) -> &[Rgb888] {
        &self.pixels
    }

    pub fn fill(&mut self, color: Rgb888) {
        let color = self.stored(color);
        self.pixels.iter_mut().for_each(|px| *px = color);
    }

    /// Number of completed outermost write transactions
    pub fn transactions(&self) -> usize {
        self.transactions
    }

    /// Deepest transaction nesting seen so far
    pub fn max_nesting(&self) -> i32 {
        self.max_depth
    }

    /// True when no transaction is open
    pub fn is_idle(&self) -> bool {
        self.depth == 0
    }

    pub fn to_bitmap(&self) -> BitmapData {
        let mut data = Vec::with_capacity(self.pixels.len() * 3);
        for px in &self.pixels {
            data.extend_from_slice(&[px.r, px.g, px.b]);
        }
        BitmapData {
            width: self.width,
            height: self.height,
            format: BitmapFormat::Rgb8,
            data,
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn stored(&self, color: Rgb888) -> Rgb888 {
        self.converter.revert(self.converter.convert(color))
    }

    fn paint(&mut self, area: Rect, color: Rgb888) {
        let area = area.intersect(&self.clip);
        if area.is_empty() {
            return;
        }
        let stride = self.width as usize;
        for y in area.top()..=area.bottom() {
            let row = y as usize * stride;
            let start = row + area.left() as usize;
            let end = row + area.right() as usize + 1;
            self.pixels[start..end].iter_mut().for_each(|px| *px = color);
        }
    }
}

impl PixelSink for Canvas {
    fn begin_write(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
    }

    fn end_write(&mut self) {
        if self.depth == 0 {
            log::warn!("end_write without matching begin_write");
            return;
        }
        self.depth -= 1;
        if self.depth == 0 {
            self.transactions += 1;
        }
    }

    fn color_converter(&self) -> ColorConverter {
        self.converter
    }

    fn set_raw_color(&mut self, raw: u32) {
        self.raw = raw;
    }

    fn write_fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let color = self.converter.revert(self.raw);
        self.paint(Rect::new(x, y, w, h), color);
    }

    fn read_rect_rgb(&mut self, x: i32, y: i32, w: i32, h: i32, buf: &mut [Rgb888]) {
        if w <= 0 || h <= 0 {
            return;
        }
        for (i, slot) in buf.iter_mut().take((w * h) as usize).enumerate() {
            let i = i as i32;
            *slot = self.pixel(x + i % w, y + i / w).unwrap_or(self.base);
        }
    }

    fn push_rect_rgb(&mut self, x: i32, y: i32, w: i32, h: i32, buf: &[Rgb888]) {
        if w <= 0 || h <= 0 {
            return;
        }
        for (i, color) in buf.iter().take((w * h) as usize).enumerate() {
            let i = i as i32;
            let color = self.stored(*color);
            self.paint(Rect::new(x + i % w, y + i / w, 1, 1), color);
        }
    }

    fn is_readable(&self) -> bool {
        true
    }

    fn has_palette(&self) -> bool {
        self.palette
    }

    fn base_color(&self) -> Rgb888 {
        self.base
    }

    fn clip_rect(&self) -> Rect {
        self.clip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_is_clipped_to_bounds() {
        let mut canvas = Canvas::new(4, 4, Rgb888::BLACK);
        canvas.fill_rect(-2, 2, 10, 10, Rgb888::WHITE);
        assert_eq!(canvas.pixel(0, 1), Some(Rgb888::BLACK));
        assert_eq!(canvas.pixel(0, 2), Some(Rgb888::WHITE));
        assert_eq!(canvas.pixel(3, 3), Some(Rgb888::WHITE));
        assert_eq!(canvas.pixel(4, 3), None);
    }

    #[test]
    fn test_clip_rect_limits_drawing() {
        let mut canvas = Canvas::new(8, 8, Rgb888::BLACK);
        canvas.set_clip_rect(Rect::new(2, 2, 2, 2));
        canvas.fill_rect(0, 0, 8, 8, Rgb888::WHITE);
        let lit = canvas.pixels().iter().filter(|&&c| c == Rgb888::WHITE).count();
        assert_eq!(lit, 4);
        canvas.clear_clip_rect();
        assert_eq!(canvas.clip_rect(), canvas.bounds());
    }

    #[test]
    fn test_depth_emulation_quantises() {
        let mut canvas = Canvas::new(1, 1, Rgb888::BLACK).with_depth(ColorDepth::Rgb332);
        canvas.fill_rect(0, 0, 1, 1, Rgb888::new(0x30, 0x30, 0x30));
        assert_eq!(canvas.pixel(0, 0), Some(Rgb888::new(36, 36, 0)));
    }

    #[test]
    fn test_read_push_round_trip() {
        let mut canvas = Canvas::new(3, 2, Rgb888::BLACK);
        let block = [Rgb888::WHITE, Rgb888::BLACK, Rgb888::new(9, 9, 9), Rgb888::WHITE];
        canvas.push_rect_rgb(1, 0, 2, 2, &block);
        let mut back = [Rgb888::BLACK; 4];
        canvas.read_rect_rgb(1, 0, 2, 2, &mut back);
        assert_eq!(back, block);
    }

    #[test]
    fn test_transactions_counted() {
        let mut canvas = Canvas::new(2, 2, Rgb888::BLACK);
        canvas.draw_rect(0, 0, 2, 2, Rgb888::WHITE);
        assert!(canvas.is_idle());
        assert_eq!(canvas.transactions(), 1);
        assert_eq!(canvas.max_nesting(), 1);
    }

    #[test]
    fn test_to_bitmap_rgb8() {
        let mut canvas = Canvas::new(2, 1, Rgb888::BLACK);
        canvas.fill_rect(1, 0, 1, 1, Rgb888::new(1, 2, 3));
        let bmp = canvas.to_bitmap();
        assert_eq!(bmp.format, BitmapFormat::Rgb8);
        assert_eq!(bmp.data, vec![0, 0, 0, 1, 2, 3]);
    }
}
