// this_file: benches/glyph_bench.rs

//! Glyph drawing performance - how fast code points become rectangles
//!
//! Every benchmark draws into a sink that only counts calls, so the numbers
//! measure decoding and run merging rather than pixel writes.
//!
//! Use these benchmarks to:
//! - Compare the fixed-cell, bitmap and anti-aliased paths
//! - Check that fractional scales cost no more than integer ones
//! - Measure what the VLW glyph cache saves over re-reading the stream

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pixfont_core::{ColorConverter, FillCursor, Fixed16, PixelSink, Rgb888, TextStyle};
use pixfont_fonts::vlw::VlwBuilder;
use pixfont_fonts::{registry::GLCD_5X7, text, Font, VlwFont};

/// Sink that counts fills and discards them
#[derive(Default)]
struct CountingSink {
    fills: usize,
}

impl PixelSink for CountingSink {
    fn color_converter(&self) -> ColorConverter {
        ColorConverter::default()
    }

    fn set_raw_color(&mut self, _raw: u32) {}

    fn write_fill_rect(&mut self, _x: i32, _y: i32, _w: i32, _h: i32) {
        self.fills += 1;
    }
}

const SENTENCE: &str = "The quick brown fox jumps over the lazy dog 0123456789";

/// A 16px anti-aliased font with a soft-edged glyph for every letter
fn vlw_font() -> VlwFont {
    let mut builder = VlwBuilder::new(16, 12, 4);
    for code in (0x21u16..0x7F).chain([0x20]) {
        let pixels = (0..10 * 12).map(|i| (i * 37 % 256) as u8).collect();
        builder = builder.glyph(code, 10, 12, 11, 12, 1, pixels);
    }
    VlwFont::from_bytes(builder.build()).unwrap()
}

/// Single glyphs through each drawing path
fn bench_glyphs(c: &mut Criterion) {
    let glcd = Font::Glcd(GLCD_5X7);
    let line = glcd.default_metrics();
    let opaque = TextStyle::new(Rgb888::WHITE, Rgb888::BLACK);

    c.bench_function("glcd_glyph_1x", |b| {
        let mut sink = CountingSink::default();
        b.iter(|| glcd.draw_glyph(&mut sink, 0, 0, black_box(0x42), &opaque, &line, &mut FillCursor::new(0)))
    });

    // Fractional scales exercise the seam-free boundary math
    let scaled = opaque.with_size(Fixed16::from_float(2.5));
    c.bench_function("glcd_glyph_2_5x", |b| {
        let mut sink = CountingSink::default();
        b.iter(|| glcd.draw_glyph(&mut sink, 0, 0, black_box(0x42), &scaled, &line, &mut FillCursor::new(0)))
    });

    // Misses take the placeholder path
    c.bench_function("glcd_dummy_glyph", |b| {
        let mut sink = CountingSink::default();
        b.iter(|| glcd.draw_glyph(&mut sink, 0, 0, black_box(0x4E00), &opaque, &line, &mut FillCursor::new(0)))
    });
}

/// Whole lines, including metrics lookups
fn bench_lines(c: &mut Criterion) {
    let glcd = Font::Glcd(GLCD_5X7);
    let style = TextStyle::new(Rgb888::WHITE, Rgb888::BLACK);

    c.bench_function("glcd_line", |b| {
        let mut sink = CountingSink::default();
        b.iter(|| text::draw_string(&mut sink, &glcd, 0, 0, black_box(SENTENCE), &style))
    });

    c.bench_function("glcd_text_width", |b| {
        b.iter(|| text::text_width(&glcd, black_box(SENTENCE), &style))
    });
}

/// Anti-aliased glyphs paged from a stream, with and without the cache
fn bench_vlw(c: &mut Criterion) {
    let style = TextStyle::new(Rgb888::WHITE, Rgb888::BLACK);

    let mut uncached = vlw_font();
    uncached.set_cache_capacity(0);
    let font = Font::Vlw(&uncached);
    c.bench_function("vlw_line_stream", |b| {
        let mut sink = CountingSink::default();
        b.iter(|| text::draw_string(&mut sink, &font, 0, 0, black_box(SENTENCE), &style))
    });

    let mut cached = vlw_font();
    cached.set_cache_capacity(128);
    let font = Font::Vlw(&cached);
    c.bench_function("vlw_line_cached", |b| {
        let mut sink = CountingSink::default();
        b.iter(|| text::draw_string(&mut sink, &font, 0, 0, black_box(SENTENCE), &style))
    });
}

criterion_group!(benches, bench_glyphs, bench_lines, bench_vlw);
criterion_main!(benches);
