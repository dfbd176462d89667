// this_file: crates/pixfont-core/src/error.rs

//! Error types for pixfont
//!
//! Glyph lookups never fail: a missing code point is drawn as a placeholder
//! box. The errors here cover the few places where something outside the
//! glyph tables can go wrong: loading a font from a stream, exporting a
//! rendered canvas, and configuration.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PixfontError>;

/// Main error type for pixfont
#[derive(Debug, Error)]
pub enum PixfontError {
    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Font loading errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FontLoadError {
    #[error("Font contains no glyphs")]
    EmptyFont,

    #[error("Font data truncated: needed {needed} bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    #[error("Out of memory allocating glyph index for {glyphs} glyphs")]
    OutOfMemory { glyphs: usize },

    #[error("Bit field {field} is {bits} bits wide")]
    BitFieldTooWide { field: &'static str, bits: u8 },

    #[error("Font is not loaded")]
    NotLoaded,

    #[error("Unknown font: {0}")]
    UnknownFont(String),
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Format not supported: {0}")]
    FormatNotSupported(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_load_error_converts() {
        let err: PixfontError = FontLoadError::EmptyFont.into();
        assert!(matches!(err, PixfontError::FontLoad(FontLoadError::EmptyFont)));
        assert_eq!(err.to_string(), "Font loading failed: Font contains no glyphs");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let err: PixfontError = io.into();
        assert!(matches!(err, PixfontError::Io(_)));
    }

    #[test]
    fn test_truncated_message() {
        let err = FontLoadError::Truncated { offset: 24, needed: 28 };
        assert_eq!(err.to_string(), "Font data truncated: needed 28 bytes at offset 24");
    }
}
