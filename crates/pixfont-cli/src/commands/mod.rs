// this_file: crates/pixfont-cli/src/commands/mod.rs

//! Subcommand implementations

pub mod info;
pub mod render;

use anyhow::{Context, Result};
use pixfont_fonts::VlwFont;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Open and load a VLW font file
pub(crate) fn load_vlw(path: &Path) -> Result<VlwFont> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    VlwFont::from_source(BufReader::new(file))
        .with_context(|| format!("Failed to load VLW font {}", path.display()))
}
