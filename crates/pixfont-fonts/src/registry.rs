// this_file: crates/pixfont-fonts/src/registry.rs

//! Named font lookup
//!
//! [`FontTable::builtin`] holds the fonts compiled into the crate. Callers
//! add their own (embedded tables or loaded VLW fonts) with
//! [`register`](FontTable::register) and look them up by name.

use pixfont_core::{FontLoadError, Result};

use crate::glcd::{GlcdFont, GlcdInfo};
use crate::raster::FontBox;
use crate::Font;

/// Classic 5x7 ASCII font, one byte per column, LSB at the top
#[rustfmt::skip]
pub static GLCD_5X7_DATA: [u8; 96 * 5] = [
    0x00, 0x00, 0x00, 0x00, 0x00, // ' '
    0x00, 0x00, 0x5F, 0x00, 0x00, // !
    0x00, 0x07, 0x00, 0x07, 0x00, // "
    0x14, 0x7F, 0x14, 0x7F, 0x14, // #
    0x24, 0x2A, 0x7F, 0x2A, 0x12, // $
    0x23, 0x13, 0x08, 0x64, 0x62, // %
    0x36, 0x49, 0x55, 0x22, 0x50, // &
    0x00, 0x05, 0x03, 0x00, 0x00, // '
    0x00, 0x1C, 0x22, 0x41, 0x00, // (
    0x00, 0x41, 0x22, 0x1C, 0x00, // )
    0x14, 0x08, 0x3E, 0x08, 0x14, // *
    0x08, 0x08, 0x3E, 0x08, 0x08, // +
    0x00, 0x50, 0x30, 0x00, 0x00, // ,
    0x08, 0x08, 0x08, 0x08, 0x08, // -
    0x00, 0x60, 0x60, 0x00, 0x00, // .
    0x20, 0x10, 0x08, 0x04, 0x02, // /
    0x3E, 0x51, 0x49, 0x45, 0x3E, // 0
    0x00, 0x42, 0x7F, 0x40, 0x00, // 1
    0x42, 0x61, 0x51, 0x49, 0x46, // 2
    0x21, 0x41, 0x45, 0x4B, 0x31, // 3
    0x18, 0x14, 0x12, 0x7F, 0x10, // 4
    0x27, 0x45, 0x45, 0x45, 0x39, // 5
    0x3C, 0x4A, 0x49, 0x49, 0x30, // 6
    0x01, 0x71, 0x09, 0x05, 0x03, // 7
    0x36, 0x49, 0x49, 0x49, 0x36, // 8
    0x06, 0x49, 0x49, 0x29, 0x1E, // 9
    0x00, 0x36, 0x36, 0x00, 0x00, // :
    0x00, 0x56, 0x36, 0x00, 0x00, // ;
    0x08, 0x14, 0x22, 0x41, 0x00, // <
    0x14, 0x14, 0x14, 0x14, 0x14, // =
    0x00, 0x41, 0x22, 0x14, 0x08, // >
    0x02, 0x01, 0x51, 0x09, 0x06, // ?
    0x32, 0x49, 0x79, 0x41, 0x3E, // @
    0x7E, 0x11, 0x11, 0x11, 0x7E, // A
    0x7F, 0x49, 0x49, 0x49, 0x36, // B
    0x3E, 0x41, 0x41, 0x41, 0x22, // C
    0x7F, 0x41, 0x41, 0x22, 0x1C, // D
    0x7F, 0x49, 0x49, 0x49, 0x41, // E
    0x7F, 0x09, 0x09, 0x09, 0x01, // F
    0x3E, 0x41, 0x49, 0x49, 0x7A, // G
    0x7F, 0x08, 0x08, 0x08, 0x7F, // H
    0x00, 0x41, 0x7F, 0x41, 0x00, // I
    0x20, 0x40, 0x41, 0x3F, 0x01, // J
    0x7F, 0x08, 0x14, 0x22, 0x41, // K
    0x7F, 0x40, 0x40, 0x40, 0x40, // L
    0x7F, 0x02, 0x0C, 0x02, 0x7F, // M
    0x7F, 0x04, 0x08, 0x10, 0x7F, // N
    0x3E, 0x41, 0x41, 0x41, 0x3E, // O
    0x7F, 0x09, 0x09, 0x09, 0x06, // P
    0x3E, 0x41, 0x51, 0x21, 0x5E, // Q
    0x7F, 0x09, 0x19, 0x29, 0x46, // R
    0x46, 0x49, 0x49, 0x49, 0x31, // S
    0x01, 0x01, 0x7F, 0x01, 0x01, // T
    0x3F, 0x40, 0x40, 0x40, 0x3F, // U
    0x1F, 0x20, 0x40, 0x20, 0x1F, // V
    0x3F, 0x40, 0x38, 0x40, 0x3F, // W
    0x63, 0x14, 0x08, 0x14, 0x63, // X
    0x07, 0x08, 0x70, 0x08, 0x07, // Y
    0x61, 0x51, 0x49, 0x45, 0x43, // Z
    0x00, 0x7F, 0x41, 0x41, 0x00, // [
    0x02, 0x04, 0x08, 0x10, 0x20, // backslash
    0x00, 0x41, 0x41, 0x7F, 0x00, // ]
    0x04, 0x02, 0x01, 0x02, 0x04, // ^
    0x40, 0x40, 0x40, 0x40, 0x40, // _
    0x00, 0x01, 0x02, 0x04, 0x00, // `
    0x20, 0x54, 0x54, 0x54, 0x78, // a
    0x7F, 0x48, 0x44, 0x44, 0x38, // b
    0x38, 0x44, 0x44, 0x44, 0x20, // c
    0x38, 0x44, 0x44, 0x48, 0x7F, // d
    0x38, 0x54, 0x54, 0x54, 0x18, // e
    0x08, 0x7E, 0x09, 0x01, 0x02, // f
    0x0C, 0x52, 0x52, 0x52, 0x3E, // g
    0x7F, 0x08, 0x04, 0x04, 0x78, // h
    0x00, 0x44, 0x7D, 0x40, 0x00, // i
    0x20, 0x40, 0x44, 0x3D, 0x00, // j
    0x7F, 0x10, 0x28, 0x44, 0x00, // k
    0x00, 0x41, 0x7F, 0x40, 0x00, // l
    0x7C, 0x04, 0x18, 0x04, 0x78, // m
    0x7C, 0x08, 0x04, 0x04, 0x78, // n
    0x38, 0x44, 0x44, 0x44, 0x38, // o
    0x7C, 0x14, 0x14, 0x14, 0x08, // p
    0x08, 0x14, 0x14, 0x18, 0x7C, // q
    0x7C, 0x08, 0x04, 0x04, 0x08, // r
    0x48, 0x54, 0x54, 0x54, 0x20, // s
    0x04, 0x3F, 0x44, 0x40, 0x20, // t
    0x3C, 0x40, 0x40, 0x20, 0x7C, // u
    0x1C, 0x20, 0x40, 0x20, 0x1C, // v
    0x3C, 0x40, 0x30, 0x40, 0x3C, // w
    0x44, 0x28, 0x10, 0x28, 0x44, // x
    0x0C, 0x50, 0x50, 0x50, 0x3C, // y
    0x44, 0x64, 0x54, 0x4C, 0x44, // z
    0x00, 0x08, 0x36, 0x41, 0x00, // {
    0x00, 0x00, 0x7F, 0x00, 0x00, // |
    0x00, 0x41, 0x36, 0x08, 0x00, // }
    0x10, 0x08, 0x08, 0x10, 0x08, // ~
    0x78, 0x46, 0x41, 0x46, 0x78, // DEL
];

/// 5x7 glyphs in a 6x8 cell covering printable ASCII
pub static GLCD_5X7: GlcdFont<'static> =
    GlcdFont::new(&GLCD_5X7_DATA, GlcdInfo::new(0x20, 0x7F, 5), FontBox::new(6, 8, 7));

/// Name of the font [`FontTable::builtin`] returns first
pub const DEFAULT_FONT: &str = "glcd";

/// Fonts by name, in registration order
#[derive(Debug, Clone, Default)]
pub struct FontTable<'a> {
    entries: Vec<(String, Font<'a>)>,
}

impl FontTable<'static> {
    /// Every font compiled into the crate
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table.register(DEFAULT_FONT, Font::Glcd(GLCD_5X7));
        table
    }
}

impl<'a> FontTable<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a font, replacing any font already registered under `name`
    pub fn register(&mut self, name: impl Into<String>, font: Font<'a>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = font,
            None => self.entries.push((name, font)),
        }
    }

    pub fn get(&self, name: &str) -> Result<Font<'a>> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, font)| *font)
            .ok_or_else(|| FontLoadError::UnknownFont(name.to_string()).into())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Font<'a>)> {
        self.entries.iter().map(|(n, f)| (n.as_str(), *f))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixfont_core::{FontKind, PixfontError};

    #[test]
    fn test_builtin_has_glcd() {
        let table = FontTable::builtin();
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["glcd"]);
        let font = table.get("GLCD").unwrap();
        assert_eq!(font.kind(), FontKind::Glcd);
        let m = font.default_metrics();
        assert_eq!((m.width, m.height, m.baseline), (6, 8, 7));
    }

    #[test]
    fn test_unknown_font() {
        let err = FontTable::builtin().get("nope").unwrap_err();
        assert!(matches!(
            err,
            PixfontError::FontLoad(FontLoadError::UnknownFont(ref n)) if n == "nope"
        ));
    }

    #[test]
    fn test_register_replaces() {
        let mut table = FontTable::builtin();
        table.register("small", Font::Glcd(GLCD_5X7));
        table.register("small", Font::Glcd(GLCD_5X7));
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
        assert_eq!(table.iter().map(|(n, _)| n).collect::<Vec<_>>(), vec!["glcd", "small"]);
    }

    #[test]
    fn test_table_covers_printable_ascii() {
        let info = GLCD_5X7.info();
        assert_eq!(GLCD_5X7_DATA.len(), (info.end - info.start + 1) as usize * info.datawidth as usize);
    }
}
