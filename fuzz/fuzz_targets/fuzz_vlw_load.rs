// this_file: fuzz/fuzz_targets/fuzz_vlw_load.rs

//! Fuzz VLW loading and drawing with arbitrary streams
//!
//! A VLW file is untrusted input: its header sizes every allocation and
//! its records point into the rest of the stream. Loading must either
//! fail cleanly or produce a font whose glyphs can all be measured and
//! drawn without panicking.
//!
//! What gets fuzzed:
//! - Header parsing and the record table length check
//! - The ascent/descent bounds scan
//! - Lazy metric reads and bitmap paging past the end of the stream
//! - Opaque and blended drawing at fractional scales

#![no_main]

use libfuzzer_sys::fuzz_target;
use pixfont_core::{ColorConverter, FillCursor, Fixed16, PixelSink, Rgb888, TextStyle};
use pixfont_fonts::{Font, VlwFont};

/// Readable sink that discards everything
struct NullSink;

impl PixelSink for NullSink {
    fn color_converter(&self) -> ColorConverter {
        ColorConverter::default()
    }

    fn set_raw_color(&mut self, _raw: u32) {}

    fn write_fill_rect(&mut self, _x: i32, _y: i32, _w: i32, _h: i32) {}

    fn is_readable(&self) -> bool {
        true
    }
}

fuzz_target!(|data: &[u8]| {
    // Skip inputs too large to load quickly
    if data.len() > 1_000_000 {
        return;
    }

    let Ok(vlw) = VlwFont::from_bytes(data) else {
        return;
    };
    let font = Font::Vlw(&vlw);
    let line = font.default_metrics();

    let styles = [
        TextStyle::new(Rgb888::WHITE, Rgb888::BLACK),
        TextStyle::transparent(Rgb888::WHITE).with_size(Fixed16::from_float(1.5)),
    ];
    for code in [0x20, 0x21, 0x41, 0x7F, 0x3000, 0x4E00, 0xFFFD] {
        let _ = font.glyph_metrics(code);
        for style in &styles {
            font.draw_glyph(&mut NullSink, 0, 0, code, style, &line, &mut FillCursor::new(0));
        }
    }
});
