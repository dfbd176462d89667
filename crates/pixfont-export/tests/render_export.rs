// this_file: crates/pixfont-export/tests/render_export.rs

//! Integration tests: text drawn onto a canvas, then exported

use pixfont_canvas::Canvas;
use pixfont_core::{Rgb888, TextStyle};
use pixfont_export::{exporter_for_path, Exporter, PngExporter, PnmExporter};
use pixfont_fonts::{registry::FontTable, text};
use std::path::Path;

fn rendered() -> Canvas {
    let font = FontTable::builtin().get("glcd").unwrap();
    let style = TextStyle::new(Rgb888::WHITE, Rgb888::BLACK);
    let width = text::text_width(&font, "Ok", &style) as u32;
    let height = font.default_metrics().height as u32;
    let mut canvas = Canvas::new(width, height, Rgb888::new(0, 0, 255));
    text::draw_string(&mut canvas, &font, 0, 0, "Ok", &style);
    canvas
}

#[test]
fn test_canvas_to_ppm() {
    let canvas = rendered();
    assert_eq!((canvas.width(), canvas.height()), (12, 8));
    let ppm = PnmExporter::ppm().export(&canvas.to_bitmap()).unwrap();
    let text = String::from_utf8(ppm).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("P3"));
    assert_eq!(lines.next(), Some("12 8"));
    assert_eq!(lines.next(), Some("255"));
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 8);
    // top-left of 'O' is background: the glyph cells cover the whole canvas
    assert!(rows[0].starts_with("0 0 0 255 255 255 "));
    let blue = Rgb888::new(0, 0, 255);
    assert!(canvas.pixels().iter().all(|&px| px != blue));
}

#[test]
fn test_canvas_to_png_by_extension() {
    let canvas = rendered();
    let exporter = exporter_for_path(Path::new("hello.png")).unwrap();
    let png = exporter.export(&canvas.to_bitmap()).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (12, 8));
    for (x, y, px) in decoded.enumerate_pixels() {
        let expected = canvas.pixel(x as i32, y as i32).unwrap();
        assert_eq!(px.0, [expected.r, expected.g, expected.b]);
    }
    assert_eq!(PngExporter::new().extension(), "png");
}
