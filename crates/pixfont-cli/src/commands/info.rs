// this_file: crates/pixfont-cli/src/commands/info.rs

//! Info command implementation

use anyhow::Result;
use pixfont_core::{config, FontKind};
use pixfont_fonts::registry::FontTable;

use super::load_vlw;
use crate::cli::InfoArgs;

pub fn run(args: &InfoArgs) -> Result<()> {
    println!("pixfont v{}", env!("CARGO_PKG_VERSION"));
    println!();

    if let Some(path) = &args.font {
        let font = load_vlw(path)?;
        let info = font.info()?;
        println!("{}:", path.display());
        println!("  glyphs            {}", info.glyph_count);
        println!("  size              {}", info.size);
        println!("  ascent / descent  {} / {}", info.ascent, info.descent);
        println!("  max asc / desc    {} / {}", info.max_ascent, info.max_descent);
        println!("  line advance      {}", info.y_advance);
        println!("  space width       {}", info.space_width);
        return Ok(());
    }

    println!("Font formats:");
    for kind in FontKind::ALL {
        println!("  {}", kind.name());
    }
    println!();

    println!("Builtin fonts:");
    for (name, font) in FontTable::builtin().iter() {
        let m = font.default_metrics();
        println!("  {:<16}  {}, {}x{} cell, baseline {}", name, font.kind().name(), m.width, m.height, m.baseline);
    }
    println!();

    println!("Output formats: png, ppm, pgm");
    println!("Glyph cache capacity: {}", config::glyph_cache_capacity());
    Ok(())
}
