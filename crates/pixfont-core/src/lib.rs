// this_file: crates/pixfont-core/src/lib.rs

//! pixfont core: the vocabulary shared by every font format
//!
//! A glyph travels from a code point to a handful of solid rectangles.
//! This crate holds the pieces every step of that trip agrees on:
//!
//! - [`fixed::Fixed16`] - 16.16 scale factors, so scaled boundaries never
//!   leave seams
//! - [`sink::PixelSink`] - the one capability a rasteriser needs from a
//!   display
//! - [`cursor`] - bounds-checked bit and byte readers for packed tables
//! - [`types`] - colours, styles and per-glyph metrics
//! - [`error`] and [`config`] - the ambient bits
//!
//! ```rust
//! use pixfont_core::{Fixed16, Rgb888, TextStyle};
//!
//! let style = TextStyle::new(Rgb888::WHITE, Rgb888::BLACK).with_size(Fixed16::from_int(2));
//! assert!(style.fill_background());
//! assert_eq!(style.size_x.scale(5), 10);
//! ```

pub mod config;
pub mod cursor;
pub mod error;
pub mod fixed;
pub mod sink;

#[cfg(test)]
mod proptests;

pub use cursor::{BitCursor, ByteCursor};
pub use error::{ExportError, FontLoadError, PixfontError, Result};
pub use fixed::Fixed16;
pub use sink::{ColorConverter, ColorDepth, PixelSink, WriteGuard};
pub use types::*;

/// Values passed between callers, fonts and sinks
pub mod types {
    use crate::fixed::Fixed16;

    /// A character code as stored in glyph tables (Basic Multilingual Plane)
    pub type CodePoint = u16;

    /// Code drawn for characters a font cannot represent at all
    pub const REPLACEMENT_CODE: CodePoint = 0xFFFD;

    /// 24-bit colour
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Rgb888 {
        pub r: u8,
        pub g: u8,
        pub b: u8,
    }

    impl Rgb888 {
        pub const BLACK: Rgb888 = Rgb888::new(0, 0, 0);
        pub const WHITE: Rgb888 = Rgb888::new(255, 255, 255);

        pub const fn new(r: u8, g: u8, b: u8) -> Self {
            Self { r, g, b }
        }

        /// From `0xRRGGBB`
        pub const fn from_u32(rgb: u32) -> Self {
            Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
        }

        pub const fn to_u32(self) -> u32 {
            ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
        }

        /// Mix `self` over `under` with coverage `alpha` (0..=255)
        ///
        /// `alpha` is offset by one so the divisor is 257 and both
        /// endpoints are exact: 255 yields `self`, 0 yields `under`.
        pub fn blend_over(self, under: Rgb888, alpha: u8) -> Rgb888 {
            let p = alpha as u32 + 1;
            let q = 257 - p;
            let mix = |f: u8, b: u8| ((f as u32 * p + b as u32 * q) >> 8) as u8;
            Rgb888::new(mix(self.r, under.r), mix(self.g, under.g), mix(self.b, under.b))
        }
    }

    /// How a run of text should look
    ///
    /// Equal foreground and background colours select transparent mode:
    /// only foreground pixels are drawn.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TextStyle {
        pub fore: Rgb888,
        pub back: Rgb888,
        pub size_x: Fixed16,
        pub size_y: Fixed16,
        /// Use the code page 437 layout of fixed bitmap fonts as-is
        pub cp437: bool,
    }

    impl TextStyle {
        pub fn new(fore: Rgb888, back: Rgb888) -> Self {
            Self {
                fore,
                back,
                size_x: Fixed16::ONE,
                size_y: Fixed16::ONE,
                cp437: false,
            }
        }

        /// Foreground only, background left untouched
        pub fn transparent(fore: Rgb888) -> Self {
            Self::new(fore, fore)
        }

        pub fn with_size(mut self, size: Fixed16) -> Self {
            self.size_x = size;
            self.size_y = size;
            self
        }

        pub fn with_size_xy(mut self, size_x: Fixed16, size_y: Fixed16) -> Self {
            self.size_x = size_x;
            self.size_y = size_y;
            self
        }

        pub fn with_cp437(mut self, cp437: bool) -> Self {
            self.cp437 = cp437;
            self
        }

        /// Background is painted whenever the colours differ
        pub fn fill_background(&self) -> bool {
            self.fore != self.back
        }
    }

    impl Default for TextStyle {
        fn default() -> Self {
            Self::new(Rgb888::WHITE, Rgb888::BLACK)
        }
    }

    /// Layout values for one glyph, in unscaled font pixels
    ///
    /// The vertical fields are font-wide and come from the font's default
    /// metrics; the horizontal ones are refreshed per glyph.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct GlyphMetrics {
        pub width: i16,
        pub x_advance: i16,
        pub x_offset: i16,
        pub height: i16,
        pub y_advance: i16,
        pub y_offset: i16,
        pub baseline: i16,
    }

    /// Inclusive-exclusive rectangle in sink coordinates
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Rect {
        pub x: i32,
        pub y: i32,
        pub w: i32,
        pub h: i32,
    }

    impl Rect {
        /// Large enough that no glyph coordinate reaches its edges
        pub const UNBOUNDED: Rect = Rect {
            x: i32::MIN / 4,
            y: i32::MIN / 4,
            w: i32::MAX / 2,
            h: i32::MAX / 2,
        };

        pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
            Self { x, y, w, h }
        }

        pub const fn left(&self) -> i32 {
            self.x
        }

        pub const fn top(&self) -> i32 {
            self.y
        }

        /// Last column inside the rectangle
        pub const fn right(&self) -> i32 {
            self.x + self.w - 1
        }

        /// Last row inside the rectangle
        pub const fn bottom(&self) -> i32 {
            self.y + self.h - 1
        }

        pub fn is_empty(&self) -> bool {
            self.w <= 0 || self.h <= 0
        }

        pub fn intersect(&self, other: &Rect) -> Rect {
            let x0 = self.x.max(other.x);
            let y0 = self.y.max(other.y);
            let x1 = (self.x + self.w).min(other.x + other.w);
            let y1 = (self.y + self.h).min(other.y + other.h);
            Rect::new(x0, y0, (x1 - x0).max(0), (y1 - y0).max(0))
        }
    }

    /// Raw pixel data copied out of a canvas
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct BitmapData {
        pub width: u32,
        pub height: u32,
        pub format: BitmapFormat,
        pub data: Vec<u8>,
    }

    impl BitmapData {
        pub fn bytes_per_pixel(&self) -> usize {
            self.format.bytes_per_pixel()
        }
    }

    /// How pixels are arranged in a bitmap
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum BitmapFormat {
        Rgb8,
        Gray8,
    }

    impl BitmapFormat {
        pub const fn bytes_per_pixel(self) -> usize {
            match self {
                BitmapFormat::Rgb8 => 3,
                BitmapFormat::Gray8 => 1,
            }
        }
    }

    /// The glyph encodings pixfont can decode
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum FontKind {
        /// Column-major fixed cells (classic 5x7)
        Glcd,
        /// Row-major fixed cells
        FixedBmp,
        /// Proportional ASCII bitmaps
        Bmp,
        /// Run-length encoded proportional ASCII bitmaps
        Rle,
        /// Fixed-height bitmaps with a sorted code index
        Bdf,
        /// Glyph table with per-glyph bounding boxes
        Gfx,
        /// Bit-packed run-length glyph blob
        U8g2,
        /// File-backed anti-aliased glyphs
        Vlw,
    }

    impl FontKind {
        pub const ALL: [FontKind; 8] = [
            FontKind::Glcd,
            FontKind::FixedBmp,
            FontKind::Bmp,
            FontKind::Rle,
            FontKind::Bdf,
            FontKind::Gfx,
            FontKind::U8g2,
            FontKind::Vlw,
        ];

        pub fn name(self) -> &'static str {
            match self {
                FontKind::Glcd => "glcd",
                FontKind::FixedBmp => "fixed-bmp",
                FontKind::Bmp => "bmp",
                FontKind::Rle => "rle",
                FontKind::Bdf => "bdf",
                FontKind::Gfx => "gfx",
                FontKind::U8g2 => "u8g2",
                FontKind::Vlw => "vlw",
            }
        }
    }

    /// How far the background of the current line is already painted
    ///
    /// One cursor is shared by every glyph drawn on a line. Fonts with
    /// overlapping glyph boxes skip background that an earlier glyph
    /// already filled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FillCursor {
        filled_x: i32,
    }

    impl FillCursor {
        /// Nothing on the line is painted yet, starting from `left`
        pub const fn new(left: i32) -> Self {
            Self { filled_x: left }
        }

        pub const fn filled_x(&self) -> i32 {
            self.filled_x
        }

        pub fn set_filled_x(&mut self, x: i32) {
            self.filled_x = x;
        }
    }

    impl Default for FillCursor {
        fn default() -> Self {
            Self::new(i32::MIN)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_u32_round_trip() {
        let c = Rgb888::from_u32(0x12_34_56);
        assert_eq!(c, Rgb888::new(0x12, 0x34, 0x56));
        assert_eq!(c.to_u32(), 0x12_34_56);
    }

    #[test]
    fn test_blend_endpoints_exact() {
        let fore = Rgb888::new(200, 100, 50);
        let back = Rgb888::new(10, 20, 30);
        assert_eq!(fore.blend_over(back, 255), fore);
        assert_eq!(fore.blend_over(back, 0), back);
        assert_eq!(Rgb888::WHITE.blend_over(Rgb888::BLACK, 0), Rgb888::BLACK);
        assert_eq!(Rgb888::WHITE.blend_over(Rgb888::BLACK, 127), Rgb888::new(127, 127, 127));
    }

    #[test]
    fn test_transparent_style() {
        let style = TextStyle::transparent(Rgb888::WHITE);
        assert!(!style.fill_background());
        assert!(TextStyle::default().fill_background());
    }

    #[test]
    fn test_rect_edges_and_intersection() {
        let r = Rect::new(2, 3, 4, 5);
        assert_eq!(r.right(), 5);
        assert_eq!(r.bottom(), 7);
        let clipped = r.intersect(&Rect::new(4, 0, 10, 5));
        assert_eq!(clipped, Rect::new(4, 3, 2, 2));
        assert!(r.intersect(&Rect::new(20, 20, 1, 1)).is_empty());
    }

    #[test]
    fn test_font_kind_names_unique() {
        let mut names: Vec<_> = FontKind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FontKind::ALL.len());
    }

    #[test]
    fn test_fill_cursor() {
        let mut cursor = FillCursor::new(10);
        assert_eq!(cursor.filled_x(), 10);
        cursor.set_filled_x(24);
        assert_eq!(cursor.filled_x(), 24);
    }
}
