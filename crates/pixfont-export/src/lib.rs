// this_file: crates/pixfont-export/src/lib.rs

//! Export module for pixfont
//!
//! Turns the [`BitmapData`] copied out of a canvas into file bytes: ASCII
//! PNM (P3 colour, P2 grey) and PNG.

use std::io::Write;
use std::path::Path;

use pixfont_core::{BitmapData, BitmapFormat, ExportError, Result};

pub mod png;

pub use png::PngExporter;

/// Encodes a bitmap into one file format
pub trait Exporter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Encode `bitmap` as file bytes
    fn export(&self, bitmap: &BitmapData) -> Result<Vec<u8>>;

    /// File extension, without the dot
    fn extension(&self) -> &'static str;

    fn mime_type(&self) -> &'static str;
}

/// Pick an exporter from a file name's extension
pub fn exporter_for_path(path: &Path) -> Result<Box<dyn Exporter>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Ok(Box::new(PngExporter::new())),
        "ppm" | "pnm" => Ok(Box::new(PnmExporter::ppm())),
        "pgm" => Ok(Box::new(PnmExporter::pgm())),
        _ => Err(ExportError::FormatNotSupported(format!(
            "no exporter for '{}' (expected .png, .ppm or .pgm)",
            path.display()
        ))
        .into()),
    }
}

/// Pixel count a bitmap of this size and format needs, checked against its data
pub(crate) fn check_len(bitmap: &BitmapData) -> Result<usize> {
    let pixels = bitmap.width as usize * bitmap.height as usize;
    let expected = pixels * bitmap.bytes_per_pixel();
    if bitmap.data.len() < expected {
        return Err(ExportError::EncodingFailed(format!(
            "Buffer too small: expected {} bytes for {}x{} {:?}, got {}",
            expected,
            bitmap.width,
            bitmap.height,
            bitmap.format,
            bitmap.data.len()
        ))
        .into());
    }
    Ok(pixels)
}

/// Luminance of an RGB triple
#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
}

/// PNM (Portable Any Map) exporter, ASCII variants
#[derive(Debug, Clone, Copy)]
pub struct PnmExporter {
    format: PnmFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PnmFormat {
    /// PGM - Portable Graymap (P2)
    Pgm,
    /// PPM - Portable Pixmap (P3)
    Ppm,
}

impl PnmExporter {
    pub fn new(format: PnmFormat) -> Self {
        Self { format }
    }

    pub fn ppm() -> Self {
        Self::new(PnmFormat::Ppm)
    }

    pub fn pgm() -> Self {
        Self::new(PnmFormat::Pgm)
    }

    pub fn format(&self) -> PnmFormat {
        self.format
    }

    fn export_bitmap(&self, bitmap: &BitmapData) -> Result<Vec<u8>> {
        let pixels = check_len(bitmap)?;
        let bpp = bitmap.bytes_per_pixel();
        let width = bitmap.width.max(1) as usize;
        let mut output = Vec::new();

        let magic = match self.format {
            PnmFormat::Ppm => "P3",
            PnmFormat::Pgm => "P2",
        };
        writeln!(&mut output, "{magic}")?;
        writeln!(&mut output, "{} {}", bitmap.width, bitmap.height)?;
        writeln!(&mut output, "255")?;

        for (i, px) in bitmap.data.chunks_exact(bpp).take(pixels).enumerate() {
            let (r, g, b) = match bitmap.format {
                BitmapFormat::Rgb8 => (px[0], px[1], px[2]),
                BitmapFormat::Gray8 => (px[0], px[0], px[0]),
            };
            match (self.format, bitmap.format) {
                (PnmFormat::Ppm, _) => write!(&mut output, "{r} {g} {b} ")?,
                (PnmFormat::Pgm, BitmapFormat::Gray8) => write!(&mut output, "{r} ")?,
                (PnmFormat::Pgm, BitmapFormat::Rgb8) => write!(&mut output, "{} ", luma(r, g, b))?,
            }
            if (i + 1) % width == 0 {
                writeln!(&mut output)?;
            }
        }
        Ok(output)
    }
}

impl Exporter for PnmExporter {
    fn name(&self) -> &'static str {
        match self.format {
            PnmFormat::Pgm => "pgm",
            PnmFormat::Ppm => "ppm",
        }
    }

    fn export(&self, bitmap: &BitmapData) -> Result<Vec<u8>> {
        self.export_bitmap(bitmap)
    }

    fn extension(&self) -> &'static str {
        self.name()
    }

    fn mime_type(&self) -> &'static str {
        match self.format {
            PnmFormat::Pgm => "image/x-portable-graymap",
            PnmFormat::Ppm => "image/x-portable-pixmap",
        }
    }
}

impl Default for PnmExporter {
    fn default() -> Self {
        Self::ppm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixfont_core::PixfontError;

    fn rgb_2x1() -> BitmapData {
        BitmapData {
            width: 2,
            height: 1,
            format: BitmapFormat::Rgb8,
            data: vec![255, 0, 0, 255, 255, 255],
        }
    }

    #[test]
    fn test_ppm_export() {
        let exported = PnmExporter::ppm().export(&rgb_2x1()).unwrap();
        let text = String::from_utf8(exported).unwrap();
        assert_eq!(text, "P3\n2 1\n255\n255 0 0 255 255 255 \n");
    }

    #[test]
    fn test_pgm_from_rgb_uses_luminance() {
        let exported = PnmExporter::pgm().export(&rgb_2x1()).unwrap();
        let text = String::from_utf8(exported).unwrap();
        // red: 255 * 299 / 1000 = 76
        assert_eq!(text, "P2\n2 1\n255\n76 255 \n");
    }

    #[test]
    fn test_ppm_from_gray_repeats_channel() {
        let bitmap = BitmapData {
            width: 1,
            height: 2,
            format: BitmapFormat::Gray8,
            data: vec![128, 7],
        };
        let text = String::from_utf8(PnmExporter::ppm().export(&bitmap).unwrap()).unwrap();
        assert_eq!(text, "P3\n1 2\n255\n128 128 128 \n7 7 7 \n");
    }

    #[test]
    fn test_short_buffer_rejected() {
        let mut bitmap = rgb_2x1();
        bitmap.data.pop();
        let err = PnmExporter::pgm().export(&bitmap).unwrap_err();
        assert!(matches!(err, PixfontError::Export(ExportError::EncodingFailed(_))));
    }

    #[test]
    fn test_extension_and_mime() {
        let ppm = PnmExporter::ppm();
        assert_eq!(ppm.extension(), "ppm");
        assert_eq!(ppm.mime_type(), "image/x-portable-pixmap");

        let pgm = PnmExporter::pgm();
        assert_eq!(pgm.extension(), "pgm");
        assert_eq!(pgm.mime_type(), "image/x-portable-graymap");
    }

    #[test]
    fn test_exporter_for_path() {
        assert_eq!(exporter_for_path(Path::new("out.PNG")).unwrap().name(), "png");
        assert_eq!(exporter_for_path(Path::new("a/b.pgm")).unwrap().name(), "pgm");
        assert_eq!(exporter_for_path(Path::new("x.pnm")).unwrap().name(), "ppm");
        let err = exporter_for_path(Path::new("out.svg")).err().unwrap();
        assert!(matches!(err, PixfontError::Export(ExportError::FormatNotSupported(_))));
        assert!(exporter_for_path(Path::new("noext")).is_err());
    }
}
