// this_file: crates/pixfont-fonts/src/proptests.rs

use crate::bmp::{BmpFont, ASCII_GLYPHS};
use crate::registry::GLCD_5X7;
use crate::u8g2::tests::sample_font;
use crate::vlw::VlwBuilder;
use crate::{Font, GfxFont, GfxGlyph, RleFont, U8g2Font, VlwFont};
use pixfont_core::{FillCursor, Fixed16, Rgb888, TextStyle};
use pixfont_record::RecordingSink;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

/// Scale factors from 1.0 up to 4.0
fn scale() -> impl Strategy<Value = Fixed16> {
    ((1i32 << 16)..(4 << 16)).prop_map(Fixed16::from_raw)
}

/// Glyph size and one value per pixel
fn grid<T: std::fmt::Debug>(cell: impl Strategy<Value = T> + Clone) -> impl Strategy<Value = (u32, u32, Vec<T>)> {
    (1u32..=8, 1u32..=8).prop_flat_map(move |(w, h)| {
        (Just(w), Just(h), prop::collection::vec(cell.clone(), (w * h) as usize))
    })
}

fn rects(sink: &RecordingSink) -> Vec<(i32, i32, i32, i32)> {
    sink.fills().into_iter().map(|(x, y, w, h, _)| (x, y, w, h)).collect()
}

/// Fills are non-empty, stay inside `[left, right) x [top, bottom)`, go
/// top to bottom and never overlap within a row
fn check_spans(fills: &[(i32, i32, i32, i32)], left: i32, top: i32, right: i32, bottom: i32) -> Result<(), TestCaseError> {
    let mut prev: Option<(i32, i32, i32)> = None;
    for &(x, y, w, h) in fills {
        prop_assert!(w > 0 && h > 0, "empty fill {:?}", (x, y, w, h));
        prop_assert!(x >= left && x + w <= right, "fill {:?} outside {}..{}", (x, y, w, h), left, right);
        prop_assert!(y >= top && y + h <= bottom, "fill {:?} outside {}..{}", (x, y, w, h), top, bottom);
        if let Some((px, py, pw)) = prev {
            prop_assert!(y >= py, "row {} after row {}", y, py);
            if y == py {
                prop_assert!(x >= px + pw, "fill at {} overlaps {}..{}", x, px, px + pw);
            }
        }
        prev = Some((x, y, w));
    }
    Ok(())
}

/// MSB-first packing as GFX tables store it
fn pack_msb(bits: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; bits.len().div_ceil(8)];
    for (i, &bit) in bits.iter().enumerate() {
        if bit {
            bytes[i >> 3] |= 0x80 >> (i & 7);
        }
    }
    bytes
}

/// Run-length tokens: colour in the high bit, length minus one below
fn encode_rle(bits: &[bool]) -> Vec<u8> {
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bits.len() {
        let value = bits[i];
        let mut n = bits[i..].iter().take_while(|&&b| b == value).count();
        i += n;
        while n > 0 {
            let len = n.min(128);
            tokens.push(((value as u8) << 7) | (len - 1) as u8);
            n -= len;
        }
    }
    tokens
}

fn opaque(raw: i32) -> TextStyle {
    TextStyle::new(Rgb888::WHITE, Rgb888::BLACK).with_size(Fixed16::from_raw(raw))
}

/// Fills grouped into runs that share a top edge, in emission order
fn rows(fills: &[(i32, i32, i32, i32, u32)]) -> Vec<Vec<(i32, i32)>> {
    let mut rows: Vec<Vec<(i32, i32)>> = Vec::new();
    let mut last_y = None;
    for &(x, y, w, _, _) in fills {
        if last_y != Some(y) {
            rows.push(Vec::new());
            last_y = Some(y);
        }
        if let Some(row) = rows.last_mut() {
            row.push((x, x + w));
        }
    }
    rows
}

// Property: GLCD columns are emitted left to right and end at the scaled cell width
proptest! {
    #[test]
    fn prop_glcd_columns_monotonic(raw in (1i32 << 16)..(4 << 16), code in 0x20u16..0x80) {
        let font = Font::Glcd(GLCD_5X7);
        let line = font.default_metrics();
        let style = opaque(raw);
        let mut sink = RecordingSink::new();
        let adv = font.draw_glyph(&mut sink, 0, 0, code, &style, &line, &mut FillCursor::new(0));
        prop_assert_eq!(adv, style.size_x.scale(6));

        let fills = sink.fills();
        let mut prev = 0;
        for &(x, _, _, _, _) in &fills {
            prop_assert!(x >= prev, "fill at {} after {}", x, prev);
            prev = x;
        }
        let right = fills.iter().map(|&(x, _, w, _, _)| x + w).max().unwrap_or(0);
        prop_assert_eq!(right, adv);
    }
}

// Property: each bitmap row tiles [0, scaled width) with non-decreasing runs
proptest! {
    #[test]
    fn prop_bmp_rows_tile(raw in (1i32 << 16)..(4 << 16), bits in prop::collection::vec(any::<u8>(), 8)) {
        let glyph: &[u8] = &bits;
        let glyphs = [glyph];
        let widths = [8u8; ASCII_GLYPHS];
        let font = Font::Bmp(BmpFont::new(&glyphs, &widths, 8, 7));
        let line = font.default_metrics();
        let style = opaque(raw);
        let mut sink = RecordingSink::new();
        let adv = font.draw_glyph(&mut sink, 0, 0, 0x20, &style, &line, &mut FillCursor::new(0));
        prop_assert_eq!(adv, style.size_x.scale(8));

        let rows = rows(&sink.fills());
        prop_assert_eq!(rows.len(), 8);
        for row in rows {
            let mut edge = 0;
            for (x0, x1) in row {
                prop_assert_eq!(x0, edge);
                prop_assert!(x1 >= x0);
                edge = x1;
            }
            prop_assert_eq!(edge, adv);
        }
    }
}

// Property: u8g2 glyphs at any scale stay inside their scaled box
proptest! {
    #[test]
    fn prop_u8g2_fills_inside_box(
        sx in scale(),
        sy in scale(),
        (code, w, h) in prop::sample::select(vec![(0x21u16, 1, 1), (0x23, 2, 2), (0x41, 3, 2)]),
    ) {
        let data = sample_font();
        let font = Font::U8g2(U8g2Font::new(&data));
        let line = font.default_metrics();
        let style = TextStyle::transparent(Rgb888::WHITE).with_size_xy(sx, sy);
        let mut sink = RecordingSink::new();
        let adv = font.draw_glyph(&mut sink, 0, 0, code, &style, &line, &mut FillCursor::new(0));
        prop_assert!(adv >= 0);

        // every sample glyph sits on the baseline with no x offset
        let y_offset = -(h + line.y_offset as i32);
        check_spans(&sink.fills_of(Rgb888::WHITE), 0, sy.scale(y_offset), sx.scale(w), sy.scale(y_offset + h))?;
    }
}

// Property: RLE rows tile the scaled cell left to right, one row band each
proptest! {
    #[test]
    fn prop_rle_rows_tile(sx in scale(), sy in scale(), (w, h, bits) in grid(any::<bool>())) {
        let tokens = encode_rle(&bits);
        let glyphs = [&tokens[..]];
        let widths = [w as u8; ASCII_GLYPHS];
        let font = Font::Rle(RleFont::new(&glyphs, &widths, h as u8, h as u8));
        let line = font.default_metrics();
        let style = TextStyle::new(Rgb888::WHITE, Rgb888::BLACK).with_size_xy(sx, sy);
        let mut sink = RecordingSink::new();
        let adv = font.draw_glyph(&mut sink, 0, 0, 0x20, &style, &line, &mut FillCursor::new(0));
        prop_assert_eq!(adv, sx.scale(w as i32));

        let fills = rects(&sink);
        check_spans(&fills, 0, 0, adv, sy.scale(h as i32))?;
        let rows = rows(&sink.fills());
        prop_assert_eq!(rows.len(), h as usize);
        for row in rows {
            let mut edge = 0;
            for (x0, x1) in row {
                prop_assert_eq!(x0, edge);
                edge = x1;
            }
            prop_assert_eq!(edge, adv);
        }
    }
}

// Property: GFX foreground stays inside the offset glyph box
proptest! {
    #[test]
    fn prop_gfx_fills_inside_box(
        sx in scale(),
        sy in scale(),
        (w, h, bits) in grid(any::<bool>()),
        x_offset in -2i8..=2,
        y_offset in -8i8..=0,
    ) {
        let bitmap = pack_msb(&bits);
        let glyphs = [GfxGlyph::new(0, w as u8, h as u8, w as u8 + 1, x_offset, y_offset)];
        let font = Font::Gfx(GfxFont::new(&bitmap, &glyphs, 0x41, 0x41, 10));
        let line = font.default_metrics();
        let style = TextStyle::transparent(Rgb888::WHITE).with_size_xy(sx, sy);
        let mut sink = RecordingSink::new();
        let adv = font.draw_glyph(&mut sink, 0, 0, 0x41, &style, &line, &mut FillCursor::new(0));
        prop_assert_eq!(adv, sx.scale(w as i32 + 1));

        let left = sx.scale(x_offset as i32);
        let top = y_offset as i32 - line.y_offset as i32;
        let fills = sink.fills_of(Rgb888::WHITE);
        check_spans(&fills, left, sy.scale(top), left + sx.scale(w as i32), sy.scale(top + h as i32))?;
        prop_assert_eq!(fills.is_empty(), !bits.contains(&true));
    }
}

// Property: VLW rows stay inside the glyph box whatever the alpha values
proptest! {
    #[test]
    fn prop_vlw_fills_inside_box(
        sx in scale(),
        sy in scale(),
        (w, h, alpha) in grid(prop::sample::select(vec![0x00u8, 0x40, 0x80, 0xFF])),
        y_delta in 0i32..=8,
        x_delta in -2i32..=2,
    ) {
        let data = VlwBuilder::new(8, 6, 2)
            .glyph(0x41, w, h, w + 1, y_delta, x_delta, alpha.clone())
            .build();
        let vlw = VlwFont::from_bytes(data).unwrap();
        let max_ascent = vlw.info().unwrap().max_ascent;
        let font = Font::Vlw(&vlw);
        let line = font.default_metrics();
        let style = TextStyle::transparent(Rgb888::WHITE).with_size_xy(sx, sy);
        let mut sink = RecordingSink::new();
        let adv = font.draw_glyph(&mut sink, 0, 0, 0x41, &style, &line, &mut FillCursor::new(0));
        prop_assert_eq!(adv, sx.scale(w as i32 + 1));
        prop_assert!(sink.is_balanced());

        let left = sx.scale(x_delta);
        let top = max_ascent - y_delta;
        let fills = rects(&sink);
        check_spans(&fills, left, sy.scale(top), left + sx.scale(w as i32), sy.scale(top + h as i32))?;
        prop_assert_eq!(fills.is_empty(), alpha.iter().all(|&a| a == 0));
    }
}
