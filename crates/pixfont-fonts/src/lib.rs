// this_file: crates/pixfont-fonts/src/lib.rs

//! pixfont fonts: every glyph format behind one closed [`Font`] type
//!
//! Embedded formats borrow constant tables; the VLW format reads glyphs
//! from a stream at draw time. All of them turn a code point into solid
//! rectangles on a [`PixelSink`] and never fail: a code point a font does
//! not cover is drawn as an outlined placeholder box.
//!
//! ```rust
//! use pixfont_core::{FillCursor, Rgb888, TextStyle};
//! use pixfont_fonts::{registry::FontTable, text};
//! # use pixfont_core::{ColorConverter, PixelSink};
//! # struct Count(usize);
//! # impl PixelSink for Count {
//! #     fn color_converter(&self) -> ColorConverter { ColorConverter::default() }
//! #     fn set_raw_color(&mut self, _raw: u32) {}
//! #     fn write_fill_rect(&mut self, _x: i32, _y: i32, _w: i32, _h: i32) { self.0 += 1; }
//! # }
//!
//! let font = FontTable::builtin().get("glcd").unwrap();
//! let style = TextStyle::new(Rgb888::WHITE, Rgb888::BLACK);
//! let mut sink = Count(0);
//! assert_eq!(text::draw_string(&mut sink, &font, 0, 0, "Hi", &style), 12);
//! assert!(sink.0 > 0);
//! ```

pub mod bdf;
pub mod bmp;
pub mod gfx;
pub mod glcd;
pub mod glyph_cache;
pub mod raster;
pub mod registry;
pub mod rle;
pub mod text;
pub mod u8g2;
pub mod vlw;

#[cfg(test)]
mod proptests;

pub use bdf::BdfFont;
pub use bmp::{BmpFont, FixedBmpFont};
pub use gfx::{EncodeRange, GfxFont, GfxGlyph};
pub use glcd::{GlcdFont, GlcdInfo};
pub use glyph_cache::{GlyphCache, GlyphCacheStats};
pub use raster::{draw_dummy, FontBox};
pub use registry::FontTable;
pub use rle::RleFont;
pub use text::{draw_string, text_width};
pub use u8g2::U8g2Font;
pub use vlw::{FontSource, VlwFont, VlwInfo};

use pixfont_core::{CodePoint, FillCursor, FontKind, GlyphMetrics, PixelSink, TextStyle};

/// A font of any supported format
///
/// Cheap to copy: embedded variants hold borrowed tables and the VLW
/// variant borrows the loaded font.
#[derive(Debug, Clone, Copy)]
pub enum Font<'a> {
    Glcd(GlcdFont<'a>),
    FixedBmp(FixedBmpFont<'a>),
    Bmp(BmpFont<'a>),
    Rle(RleFont<'a>),
    Bdf(BdfFont<'a>),
    Gfx(GfxFont<'a>),
    U8g2(U8g2Font<'a>),
    Vlw(&'a VlwFont),
}

impl<'a> Font<'a> {
    pub fn kind(&self) -> FontKind {
        match self {
            Font::Glcd(_) => FontKind::Glcd,
            Font::FixedBmp(_) => FontKind::FixedBmp,
            Font::Bmp(_) => FontKind::Bmp,
            Font::Rle(_) => FontKind::Rle,
            Font::Bdf(_) => FontKind::Bdf,
            Font::Gfx(_) => FontKind::Gfx,
            Font::U8g2(_) => FontKind::U8g2,
            Font::Vlw(_) => FontKind::Vlw,
        }
    }

    /// Line metrics: cell or line height, baseline and a nominal width
    pub fn default_metrics(&self) -> GlyphMetrics {
        match self {
            Font::Glcd(f) => f.default_metrics(),
            Font::FixedBmp(f) => f.default_metrics(),
            Font::Bmp(f) => f.default_metrics(),
            Font::Rle(f) => f.default_metrics(),
            Font::Bdf(f) => f.default_metrics(),
            Font::Gfx(f) => f.default_metrics(),
            Font::U8g2(f) => f.default_metrics(),
            Font::Vlw(f) => f.default_metrics(),
        }
    }

    /// Update the horizontal metrics for `code`
    ///
    /// Returns whether the font has a glyph for it. The metrics are always
    /// usable afterwards, even for a miss.
    pub fn update_metrics(&self, metrics: &mut GlyphMetrics, code: CodePoint) -> bool {
        match self {
            Font::Glcd(f) => f.update_metrics(metrics, code),
            Font::FixedBmp(f) => f.update_metrics(metrics, code),
            Font::Bmp(f) => f.update_metrics(metrics, code),
            Font::Rle(f) => f.update_metrics(metrics, code),
            Font::Bdf(f) => f.update_metrics(metrics, code),
            Font::Gfx(f) => f.update_metrics(metrics, code),
            Font::U8g2(f) => f.update_metrics(metrics, code),
            Font::Vlw(f) => f.update_metrics(metrics, code),
        }
    }

    /// Metrics of `code` on top of the line metrics, `None` on a miss
    pub fn glyph_metrics(&self, code: CodePoint) -> Option<GlyphMetrics> {
        let mut metrics = self.default_metrics();
        self.update_metrics(&mut metrics, code).then_some(metrics)
    }

    /// Draw one glyph with its line box's top-left corner at `(x, y)`
    ///
    /// `line` is the font's [`default_metrics`](Self::default_metrics).
    /// Returns the scaled advance.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_glyph<S: PixelSink + ?Sized>(
        &self,
        sink: &mut S,
        x: i32,
        y: i32,
        code: CodePoint,
        style: &TextStyle,
        line: &GlyphMetrics,
        cursor: &mut FillCursor,
    ) -> i32 {
        match self {
            Font::Glcd(f) => f.draw(sink, x, y, code, style, cursor),
            Font::FixedBmp(f) => f.draw(sink, x, y, code, style, cursor),
            Font::Bmp(f) => f.draw(sink, x, y, code, style, cursor),
            Font::Rle(f) => f.draw(sink, x, y, code, style, cursor),
            Font::Bdf(f) => f.draw(sink, x, y, code, style, cursor),
            Font::Gfx(f) => f.draw(sink, x, y, code, style, line, cursor),
            Font::U8g2(f) => f.draw(sink, x, y, code, style, line, cursor),
            Font::Vlw(f) => f.draw(sink, x, y, code, style, line, cursor),
        }
    }
}

macro_rules! impl_from_font {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl<'a> From<$ty> for Font<'a> {
                fn from(font: $ty) -> Self {
                    Font::$variant(font)
                }
            }
        )*
    };
}

impl_from_font!(
    Glcd(GlcdFont<'a>),
    FixedBmp(FixedBmpFont<'a>),
    Bmp(BmpFont<'a>),
    Rle(RleFont<'a>),
    Bdf(BdfFont<'a>),
    Gfx(GfxFont<'a>),
    U8g2(U8g2Font<'a>),
    Vlw(&'a VlwFont),
);
