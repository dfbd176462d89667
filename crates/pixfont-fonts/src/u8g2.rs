// this_file: crates/pixfont-fonts/src/u8g2.rs

//! u8g2 compressed fonts
//!
//! A whole font is one blob: a 23-byte header, then glyph records. Each
//! record starts with a bit-packed header (width, height, x/y offset,
//! advance; field widths come from the font header) followed by rows
//! encoded as alternating background/foreground run lengths. A single
//! continuation bit after each run pair says whether the pair repeats.

use pixfont_core::{
    BitCursor, CodePoint, FillCursor, FontLoadError, GlyphMetrics, PixelSink, Result, TextStyle, WriteGuard,
};

use crate::raster::{draw_dummy, BgSpan, ColorTable};

/// Offset of the first glyph record
pub const U8G2_HEADER_LEN: usize = 23;

/// Decoded font header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct U8g2Header {
    pub glyph_count: u8,
    pub bbx_mode: u8,
    pub bits_per_0: u8,
    pub bits_per_1: u8,
    pub bits_per_char_width: u8,
    pub bits_per_char_height: u8,
    pub bits_per_char_x: u8,
    pub bits_per_char_y: u8,
    pub bits_per_delta_x: u8,
    pub max_char_width: i8,
    pub max_char_height: i8,
    pub x_offset: i8,
    pub y_offset: i8,
    pub ascent_a: i8,
    pub descent_g: i8,
    pub ascent_para: i8,
    pub descent_para: i8,
    pub start_pos_upper_a: u16,
    pub start_pos_lower_a: u16,
    pub start_pos_unicode: u16,
}

impl U8g2Header {
    /// Parse the header
    ///
    /// Fails with `Truncated` when `data` is shorter than 23 bytes and with
    /// `BitFieldTooWide` when a field width exceeds what [`BitCursor`]
    /// decodes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let h = data.get(..U8G2_HEADER_LEN).ok_or(FontLoadError::Truncated {
            offset: 0,
            needed: U8G2_HEADER_LEN,
        })?;
        let be16 = |i: usize| u16::from_be_bytes([h[i], h[i + 1]]);
        let header = Self {
            glyph_count: h[0],
            bbx_mode: h[1],
            bits_per_0: h[2],
            bits_per_1: h[3],
            bits_per_char_width: h[4],
            bits_per_char_height: h[5],
            bits_per_char_x: h[6],
            bits_per_char_y: h[7],
            bits_per_delta_x: h[8],
            max_char_width: h[9] as i8,
            max_char_height: h[10] as i8,
            x_offset: h[11] as i8,
            y_offset: h[12] as i8,
            ascent_a: h[13] as i8,
            descent_g: h[14] as i8,
            ascent_para: h[15] as i8,
            descent_para: h[16] as i8,
            start_pos_upper_a: be16(17),
            start_pos_lower_a: be16(19),
            start_pos_unicode: be16(21),
        };
        header.check_widths()?;
        Ok(header)
    }

    fn check_widths(&self) -> Result<()> {
        let fields = [
            ("bits_per_0", self.bits_per_0),
            ("bits_per_1", self.bits_per_1),
            ("bits_per_char_width", self.bits_per_char_width),
            ("bits_per_char_height", self.bits_per_char_height),
            ("bits_per_char_x", self.bits_per_char_x),
            ("bits_per_char_y", self.bits_per_char_y),
            ("bits_per_delta_x", self.bits_per_delta_x),
        ];
        for (field, bits) in fields {
            if bits > BitCursor::MAX_FIELD_BITS {
                return Err(FontLoadError::BitFieldTooWide { field, bits }.into());
            }
        }
        Ok(())
    }
}

/// Per-glyph header, already read from the bit stream
struct GlyphHeader {
    width: u32,
    height: u32,
    x_offset: i32,
    y_offset: i32,
    x_advance: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct U8g2Font<'a> {
    data: &'a [u8],
    header: U8g2Header,
}

impl<'a> U8g2Font<'a> {
    /// Wrap a font blob, checking its header
    pub fn try_new(data: &'a [u8]) -> Result<Self> {
        let header = U8g2Header::parse(data)?;
        Ok(Self { data, header })
    }

    /// Wrap a font blob; a blob with an unusable header decodes no glyphs
    pub fn new(data: &'a [u8]) -> Self {
        Self::try_new(data).unwrap_or_else(|err| {
            log::warn!("u8g2 font rejected: {err}");
            Self {
                data: &[],
                header: U8g2Header::default(),
            }
        })
    }

    pub fn header(&self) -> &U8g2Header {
        &self.header
    }

    fn byte(&self, pos: usize) -> u8 {
        self.data.get(pos).copied().unwrap_or(0)
    }

    fn be16(&self, pos: usize) -> u16 {
        u16::from_be_bytes([self.byte(pos), self.byte(pos + 1)])
    }

    /// Cursor positioned at the bit-packed header of `code`'s glyph
    pub fn glyph(&self, code: CodePoint) -> Option<BitCursor<'a>> {
        if self.data.len() <= U8G2_HEADER_LEN {
            return None;
        }
        let mut pos = U8G2_HEADER_LEN;
        if code <= 0xFF {
            if code >= b'a' as CodePoint {
                pos += self.header.start_pos_lower_a as usize;
            } else if code >= b'A' as CodePoint {
                pos += self.header.start_pos_upper_a as usize;
            }
            loop {
                let size = self.byte(pos + 1) as usize;
                if size == 0 || pos >= self.data.len() {
                    return None;
                }
                if self.byte(pos) as CodePoint == code {
                    return Some(BitCursor::at(self.data, pos + 2));
                }
                pos += size;
            }
        }

        pos += self.header.start_pos_unicode as usize;
        let mut lut = pos;
        loop {
            if lut + 4 > self.data.len() {
                return None;
            }
            pos += self.be16(lut) as usize;
            let end = self.be16(lut + 2);
            lut += 4;
            if end >= code {
                break;
            }
        }
        loop {
            let e = self.be16(pos);
            if e == 0 || pos >= self.data.len() {
                return None;
            }
            if e == code {
                return Some(BitCursor::at(self.data, pos + 3));
            }
            let size = self.byte(pos + 2) as usize;
            if size == 0 {
                return None;
            }
            pos += size;
        }
    }

    fn read_header(&self, bits: &mut BitCursor<'_>) -> GlyphHeader {
        let h = &self.header;
        GlyphHeader {
            width: bits.read_unsigned(h.bits_per_char_width),
            height: bits.read_unsigned(h.bits_per_char_height),
            x_offset: bits.read_signed(h.bits_per_char_x),
            y_offset: bits.read_signed(h.bits_per_char_y),
            x_advance: bits.read_signed(h.bits_per_delta_x),
        }
    }

    pub fn default_metrics(&self) -> GlyphMetrics {
        let height = self.header.max_char_height as i16;
        let width = self.header.max_char_width as i16;
        let baseline = height + self.header.y_offset as i16;
        GlyphMetrics {
            width,
            x_advance: width,
            x_offset: 0,
            height,
            y_advance: height,
            y_offset: -baseline,
            baseline,
        }
    }

    pub fn update_metrics(&self, metrics: &mut GlyphMetrics, code: CodePoint) -> bool {
        match self.glyph(code) {
            Some(mut bits) => {
                let g = self.read_header(&mut bits);
                metrics.width = g.width as i16;
                metrics.x_offset = g.x_offset as i16;
                metrics.x_advance = g.x_advance as i16;
                true
            },
            None => {
                metrics.width = self.header.max_char_width as i16;
                metrics.x_advance = metrics.width;
                metrics.x_offset = 0;
                false
            },
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw<S: PixelSink + ?Sized>(
        &self,
        sink: &mut S,
        x: i32,
        y: i32,
        code: CodePoint,
        style: &TextStyle,
        line: &GlyphMetrics,
        cursor: &mut FillCursor,
    ) -> i32 {
        let Some(mut bits) = self.glyph(code) else {
            let w = self.header.max_char_width as i32;
            return draw_dummy(sink, x, y, w, line.height as i32, style, cursor);
        };
        let g = self.read_header(&mut bits);
        let (w, h) = (g.width, g.height);
        let (sx, sy) = (style.size_x, style.size_y);
        let x_offset = sx.scale(g.x_offset);
        let y_offset = -(g.y_offset + h as i32 + line.y_offset as i32);
        let x_advance = sx.scale(g.x_advance);

        let colors = ColorTable::new(sink, style);
        let fill_bg = style.fill_background();
        let span = BgSpan::claim(fill_bg, x, x_offset, sx.scale(w as i32), x_advance, cursor);
        let x = x + x_offset;

        let mut sink = WriteGuard::new(sink);
        sink.set_raw_color(colors.back());
        span.fill_bands(&mut *sink, y, y_offset, h as i32, line.height as i32, sy);

        if w == 0 || h == 0 {
            return x_advance;
        }
        if !span.is_empty() {
            let y0 = sy.scale(y_offset);
            let len = sy.scale(y_offset + h as i32) - y0;
            if span.left < x {
                sink.write_fill_rect(span.left, y + y0, x - span.left, len);
            }
            let xwsx = x + sx.scale(w as i32);
            if xwsx < span.right {
                sink.write_fill_rect(xwsx, y + y0, span.right - xwsx, len);
            }
        }

        let left = span.left - x;
        let mut lx = 0;
        let mut ly = 0;
        let mut y0 = sy.scale(y_offset);
        let mut y1 = sy.scale(y_offset + 1);
        while ly < h {
            if bits.is_exhausted() {
                log::trace!("u8g2 glyph {code:#06x} ends early at row {ly}");
                break;
            }
            let runs = [
                bits.read_unsigned(self.header.bits_per_0),
                bits.read_unsigned(self.header.bits_per_1),
            ];
            loop {
                for (color, &run) in runs.iter().enumerate() {
                    let fore = color == 1;
                    let mut length = run;
                    while length > 0 {
                        let len = length.min(w - lx);
                        length -= len;
                        if fore || fill_bg {
                            let mut x0 = sx.scale(lx as i32);
                            if !fore && x0 < left {
                                x0 = left;
                            }
                            let x1 = sx.scale((lx + len) as i32);
                            if x0 < x1 {
                                sink.set_raw_color(colors.get(fore));
                                sink.write_fill_rect(x + x0, y + y0, x1 - x0, y1 - y0);
                            }
                        }
                        lx += len;
                        if lx == w {
                            lx = 0;
                            ly += 1;
                            y0 = y1;
                            y1 = sy.scale((ly + 1) as i32 + y_offset);
                        }
                    }
                }
                if bits.read_unsigned(1) == 0 || ly >= h {
                    break;
                }
            }
        }
        x_advance
    }
}
