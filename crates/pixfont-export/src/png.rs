// this_file: crates/pixfont-export/src/png.rs

//! PNG export format
//!
//! Encodes bitmaps with the `image` crate's PNG encoder. RGB8 and Gray8
//! bitmaps are written as they are, without an alpha channel.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use pixfont_core::{BitmapData, BitmapFormat, ExportError, Result};

use crate::{check_len, Exporter};

/// Encode bitmap data to PNG
pub fn encode_bitmap_to_png(bitmap: &BitmapData) -> Result<Vec<u8>> {
    let pixels = check_len(bitmap)?;
    let data = &bitmap.data[..pixels * bitmap.bytes_per_pixel()];
    let color = match bitmap.format {
        BitmapFormat::Rgb8 => ExtendedColorType::Rgb8,
        BitmapFormat::Gray8 => ExtendedColorType::L8,
    };

    let mut png_data = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut png_data, CompressionType::Default, FilterType::Sub);
    encoder
        .write_image(data, bitmap.width, bitmap.height, color)
        .map_err(|e| ExportError::EncodingFailed(format!("PNG encoding failed: {}", e)))?;
    log::debug!("Encoded {}x{} PNG, {} bytes", bitmap.width, bitmap.height, png_data.len());
    Ok(png_data)
}

/// PNG exporter
///
/// ```
/// use pixfont_export::{Exporter, PngExporter};
/// let exporter = PngExporter::new();
/// assert_eq!(exporter.mime_type(), "image/png");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PngExporter;

impl PngExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for PngExporter {
    fn name(&self) -> &'static str {
        "png"
    }

    fn export(&self, bitmap: &BitmapData) -> Result<Vec<u8>> {
        encode_bitmap_to_png(bitmap)
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn mime_type(&self) -> &'static str {
        "image/png"
    }
}
