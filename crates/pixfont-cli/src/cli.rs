// this_file: crates/pixfont-cli/src/cli.rs

//! CLI argument definitions using Clap v4

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use pixfont_core::{ColorDepth, Fixed16, Rgb888};
use pixfont_fonts::registry::DEFAULT_FONT;
use std::path::PathBuf;

/// pixfont - draw bitmap and anti-aliased fonts from the command line
#[derive(Parser, Debug)]
#[command(name = "pixfont")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show supported formats and builtin fonts, or describe a VLW file
    #[command(alias = "i")]
    Info(InfoArgs),

    /// Render one line of text to an image file
    #[command(alias = "r")]
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// VLW font file to describe
    #[arg(short = 'f', long = "font")]
    pub font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Text to render
    pub text: String,

    /// VLW font file
    #[arg(short = 'f', long = "font", conflicts_with = "builtin")]
    pub font: Option<PathBuf>,

    /// Builtin font name
    #[arg(short = 'b', long = "builtin", default_value = DEFAULT_FONT)]
    pub builtin: String,

    /// Output file (.png, .ppm or .pgm)
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Scale factor for both axes
    #[arg(short = 's', long = "size", default_value = "1", value_parser = parse_scale)]
    pub size: Fixed16,

    /// Horizontal scale, overrides --size
    #[arg(long = "size-x", value_parser = parse_scale)]
    pub size_x: Option<Fixed16>,

    /// Vertical scale, overrides --size
    #[arg(long = "size-y", value_parser = parse_scale)]
    pub size_y: Option<Fixed16>,

    /// Text colour (RRGGBB)
    #[arg(long = "fg", default_value = "FFFFFF", value_parser = parse_color)]
    pub fg: Rgb888,

    /// Background colour (RRGGBB)
    #[arg(long = "bg", default_value = "000000", value_parser = parse_color)]
    pub bg: Rgb888,

    /// Leave the background unpainted; anti-aliased glyphs blend over it
    #[arg(long = "transparent")]
    pub transparent: bool,

    /// Use the code page 437 layout of fixed-cell fonts
    #[arg(long = "cp437")]
    pub cp437: bool,

    /// Emulated panel colour depth
    #[arg(long = "depth", value_enum, default_value = "rgb888")]
    pub depth: DepthArg,

    /// Report raw colours as palette indices
    #[arg(long = "palette")]
    pub palette: bool,

    /// Canvas width (default: the text width)
    #[arg(long = "width")]
    pub width: Option<u32>,

    /// Canvas height (default: the line height)
    #[arg(long = "height")]
    pub height: Option<u32>,

    /// Glyph bitmap cache entries for VLW fonts (0 disables)
    #[arg(long = "glyph-cache")]
    pub glyph_cache: Option<usize>,
}

impl RenderArgs {
    pub fn scale(&self) -> (Fixed16, Fixed16) {
        (self.size_x.unwrap_or(self.size), self.size_y.unwrap_or(self.size))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum DepthArg {
    Rgb888,
    Rgb565,
    Rgb332,
    Gray8,
}

impl From<DepthArg> for ColorDepth {
    fn from(depth: DepthArg) -> Self {
        match depth {
            DepthArg::Rgb888 => ColorDepth::Rgb888,
            DepthArg::Rgb565 => ColorDepth::Rgb565,
            DepthArg::Rgb332 => ColorDepth::Rgb332,
            DepthArg::Gray8 => ColorDepth::Gray8,
        }
    }
}

/// `RRGGBB`, with an optional leading `#`
pub fn parse_color(s: &str) -> Result<Rgb888, String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 {
        return Err(format!("expected RRGGBB, got '{s}'"));
    }
    u32::from_str_radix(hex, 16)
        .map(Rgb888::from_u32)
        .map_err(|_| format!("invalid hex colour '{s}'"))
}

/// Positive decimal scale factor
pub fn parse_scale(s: &str) -> Result<Fixed16, String> {
    let value: f32 = s.parse().map_err(|_| format!("invalid scale '{s}'"))?;
    let scale = Fixed16::from_float(value);
    if !value.is_finite() || !scale.is_positive() || value > 256.0 {
        return Err(format!("scale must be between 0 and 256, got '{s}'"));
    }
    Ok(scale)
}
