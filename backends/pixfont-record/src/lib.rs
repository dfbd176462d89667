// this_file: backends/pixfont-record/src/lib.rs

//! Recording sink - see exactly which rectangles a glyph turns into
//!
//! Pixels hide the interesting part: how many fills were issued, in which
//! order, with which colour. `RecordingSink` keeps every call as a
//! [`SinkOp`] and can dump the list as JSON.

use pixfont_core::{
    error::{ExportError, Result},
    ColorConverter, ColorDepth, PixelSink, Rect, Rgb888,
};
use serde::{Deserialize, Serialize};

/// Schema version of the JSON dump
pub const JSON_SCHEMA_VERSION: &str = "1.0";

/// One recorded drawing call; colours are raw sink values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SinkOp {
    Fill { x: i32, y: i32, w: i32, h: i32, color: u32 },
    Outline { x: i32, y: i32, w: i32, h: i32, color: u32 },
    ReadBack { x: i32, y: i32, w: i32, h: i32 },
    Push { x: i32, y: i32, w: i32, h: i32, pixels: Vec<u32> },
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    schema_version: &'static str,
    depth: String,
    ops: &'a [SinkOp],
}

/// Pixel sink that remembers instead of drawing
#[derive(Debug, Clone)]
pub struct RecordingSink {
    converter: ColorConverter,
    raw: u32,
    ops: Vec<SinkOp>,
    depth: i32,
    unbalanced: bool,
    readable: bool,
    palette: bool,
    base: Rgb888,
    clip: Rect,
    /// Colour returned by read-backs
    under: Rgb888,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            converter: ColorConverter::default(),
            raw: 0,
            ops: Vec::new(),
            depth: 0,
            unbalanced: false,
            readable: false,
            palette: false,
            base: Rgb888::BLACK,
            clip: Rect::UNBOUNDED,
            under: Rgb888::BLACK,
        }
    }

    pub fn with_depth(mut self, depth: ColorDepth) -> Self {
        self.converter = ColorConverter::new(depth);
        self
    }

    /// Report pixels as readable; read-backs return `under`
    pub fn readable(mut self, under: Rgb888) -> Self {
        self.readable = true;
        self.under = under;
        self
    }

    pub fn with_palette(mut self, palette: bool) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_base_color(mut self, base: Rgb888) -> Self {
        self.base = base;
        self
    }

    pub fn with_clip(mut self, clip: Rect) -> Self {
        self.clip = clip;
        self
    }

    pub fn ops(&self) -> &[SinkOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Every `begin_write` was matched by an `end_write`, in order
    pub fn is_balanced(&self) -> bool {
        self.depth == 0 && !self.unbalanced
    }

    /// Rectangles filled with `color`, in issue order
    pub fn fills_of(&self, color: Rgb888) -> Vec<(i32, i32, i32, i32)> {
        let raw = self.converter.convert(color);
        self.ops
            .iter()
            .filter_map(|op| match *op {
                SinkOp::Fill { x, y, w, h, color } if color == raw => Some((x, y, w, h)),
                _ => None,
            })
            .collect()
    }

    /// All fills, whatever the colour
    pub fn fills(&self) -> Vec<(i32, i32, i32, i32, u32)> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                SinkOp::Fill { x, y, w, h, color } => Some((x, y, w, h, color)),
                _ => None,
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        let output = JsonOutput {
            schema_version: JSON_SCHEMA_VERSION,
            depth: format!("{:?}", self.converter.depth),
            ops: &self.ops,
        };
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| ExportError::EncodingFailed(e.to_string()))?;
        log::debug!("Serialised {} sink ops", self.ops.len());
        Ok(json)
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelSink for RecordingSink {
    fn begin_write(&mut self) {
        self.depth += 1;
    }

    fn end_write(&mut self) {
        self.depth -= 1;
        if self.depth < 0 {
            self.unbalanced = true;
        }
    }

    fn color_converter(&self) -> ColorConverter {
        self.converter
    }

    fn set_raw_color(&mut self, raw: u32) {
        self.raw = raw;
    }

    fn write_fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.ops.push(SinkOp::Fill { x, y, w, h, color: self.raw });
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb888) {
        let color = self.converter.convert(color);
        self.ops.push(SinkOp::Outline { x, y, w, h, color });
    }

    fn read_rect_rgb(&mut self, x: i32, y: i32, w: i32, h: i32, buf: &mut [Rgb888]) {
        self.ops.push(SinkOp::ReadBack { x, y, w, h });
        buf.iter_mut().for_each(|px| *px = self.under);
    }

    fn push_rect_rgb(&mut self, x: i32, y: i32, w: i32, h: i32, buf: &[Rgb888]) {
        let pixels = buf.iter().map(|c| self.converter.convert(*c)).collect();
        self.ops.push(SinkOp::Push { x, y, w, h, pixels });
    }

    fn is_readable(&self) -> bool {
        self.readable
    }

    fn has_palette(&self) -> bool {
        self.palette
    }

    fn base_color(&self) -> Rgb888 {
        self.base
    }

    fn clip_rect(&self) -> Rect {
        self.clip
    }
}
