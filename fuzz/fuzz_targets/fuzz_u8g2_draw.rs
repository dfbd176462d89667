// this_file: fuzz/fuzz_targets/fuzz_u8g2_draw.rs

//! Fuzz u8g2 glyph decoding with arbitrary font blobs
//!
//! The blob's header sets every bit width and jump offset, so a corrupt
//! font can send the glyph search and the run decoder anywhere. Both must
//! stay inside the data and terminate.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pixfont_core::{ColorConverter, FillCursor, Fixed16, PixelSink, Rgb888, TextStyle};
use pixfont_fonts::{Font, U8g2Font};

struct NullSink;

impl PixelSink for NullSink {
    fn color_converter(&self) -> ColorConverter {
        ColorConverter::default()
    }

    fn set_raw_color(&mut self, _raw: u32) {}

    fn write_fill_rect(&mut self, _x: i32, _y: i32, _w: i32, _h: i32) {}
}

fuzz_target!(|data: &[u8]| {
    // The first two bytes pick the code point, the rest is the font
    if data.len() < 2 || data.len() > 65_536 {
        return;
    }
    let code = u16::from_le_bytes([data[0], data[1]]);
    let font = Font::U8g2(U8g2Font::new(&data[2..]));
    let line = font.default_metrics();

    let opaque = TextStyle::new(Rgb888::WHITE, Rgb888::BLACK).with_size(Fixed16::from_float(0.75));
    let transparent = TextStyle::transparent(Rgb888::WHITE).with_size(Fixed16::from_int(2));
    for code in [code, 0x41, 0x61, 0x100] {
        let _ = font.glyph_metrics(code);
        font.draw_glyph(&mut NullSink, 0, 0, code, &opaque, &line, &mut FillCursor::new(0));
        font.draw_glyph(&mut NullSink, 0, 0, code, &transparent, &line, &mut FillCursor::new(0));
    }
});
