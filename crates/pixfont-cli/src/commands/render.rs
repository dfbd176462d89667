// this_file: crates/pixfont-cli/src/commands/render.rs

//! Render command implementation
//!
//! Draws one line of text onto a canvas sized from the text metrics, then
//! writes it with the exporter matching the output extension.

use anyhow::{ensure, Context, Result};
use pixfont_canvas::Canvas;
use pixfont_core::{config, TextStyle};
use pixfont_fonts::{registry::FontTable, text, Font};
use pixfont_export::{exporter_for_path, Exporter};
use std::fs;

use super::load_vlw;
use crate::cli::RenderArgs;

pub fn run(args: &RenderArgs) -> Result<()> {
    if let Some(capacity) = args.glyph_cache {
        config::set_glyph_cache_capacity(capacity);
    }
    let exporter = exporter_for_path(&args.output)?;

    let vlw;
    let font = match &args.font {
        Some(path) => {
            vlw = load_vlw(path)?;
            Font::Vlw(&vlw)
        },
        None => FontTable::builtin().get(&args.builtin)?,
    };

    let (size_x, size_y) = args.scale();
    let style = if args.transparent {
        TextStyle::transparent(args.fg)
    } else {
        TextStyle::new(args.fg, args.bg)
    };
    let style = style.with_size_xy(size_x, size_y).with_cp437(args.cp437);

    let line = font.default_metrics();
    let width = args.width.unwrap_or_else(|| text::text_width(&font, &args.text, &style).max(1) as u32);
    let height = args.height.unwrap_or_else(|| size_y.scale(line.height as i32).max(1) as u32);
    ensure!(
        width > 0 && height > 0 && (width as u64 * height as u64) <= 1 << 26,
        "canvas size {width}x{height} out of range"
    );

    let mut canvas = Canvas::new(width, height, args.bg)
        .with_depth(args.depth.into())
        .with_palette(args.palette);
    let advance = text::draw_string(&mut canvas, &font, 0, 0, &args.text, &style);
    log::debug!("Drew {:?} with advance {advance} on a {width}x{height} canvas", args.text);

    let bytes = exporter.export(&canvas.to_bitmap())?;
    fs::write(&args.output, bytes).with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!("Rendered {width}x{height} {} to {}", exporter.name(), args.output.display());
    Ok(())
}
