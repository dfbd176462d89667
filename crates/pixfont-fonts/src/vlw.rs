// this_file: crates/pixfont-fonts/src/vlw.rs

//! Anti-aliased fonts loaded at runtime from VLW streams
//!
//! A VLW stream is a 24-byte header, one 28-byte record per glyph and then
//! every glyph's 8-bit alpha bitmap back to back. All integers are
//! big-endian `u32`.
//!
//! Loading keeps only the code point, width, advance, x delta and bitmap
//! offset of every glyph in memory; records and bitmaps are read from the
//! stream again whenever a glyph is drawn. The stream stays owned by the
//! font until it is unloaded or dropped.
//!
//! ```rust
//! use pixfont_fonts::vlw::{VlwBuilder, VlwFont};
//!
//! let data = VlwBuilder::new(12, 9, 3)
//!     .glyph(0x41, 2, 1, 3, 9, 0, vec![0xFF, 0x80])
//!     .build();
//! let font = VlwFont::from_bytes(data).unwrap();
//! assert_eq!(font.unicode_index(0x41), Some(0));
//! assert_eq!(font.unicode_index(0x42), None);
//! ```

use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::sync::Arc;

use parking_lot::Mutex;
use pixfont_core::{
    config, ByteCursor, CodePoint, FillCursor, FontLoadError, GlyphMetrics, PixelSink, Result,
    Rgb888, TextStyle, WriteGuard,
};

use crate::glyph_cache::{GlyphCache, GlyphCacheStats, VlwGlyph};
use crate::raster::{draw_dummy, BgSpan, ColorTable};

pub const HEADER_LEN: usize = 24;
pub const RECORD_LEN: usize = 28;

const SPACE: CodePoint = 0x20;
const IDEOGRAPHIC_SPACE: CodePoint = 0x3000;

/// Seekable byte stream a VLW font is read from
pub trait FontSource: Read + Seek + Send {}

impl<T: Read + Seek + Send + ?Sized> FontSource for T {}

/// Header values and the line metrics derived from the glyph records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VlwInfo {
    pub glyph_count: usize,
    /// Nominal point size from the header
    pub size: u32,
    pub ascent: i32,
    pub descent: i32,
    pub max_ascent: i32,
    pub max_descent: i32,
    pub y_advance: i32,
    pub space_width: i32,
}

/// Everything that exists only while a font is loaded
struct Loaded {
    source: Box<dyn FontSource>,
    info: VlwInfo,
    unicode: Vec<u16>,
    width: Vec<u8>,
    x_advance: Vec<u8>,
    x_delta: Vec<i8>,
    bitmap: Vec<u32>,
    cache: Option<GlyphCache>,
}

fn alloc<T>(count: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(count)
        .map_err(|_| FontLoadError::OutOfMemory { glyphs: count })?;
    Ok(v)
}

fn be_words<const N: usize>(bytes: &[u8]) -> [u32; N] {
    let mut words = [0u32; N];
    for (word, b) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = u32::from_be_bytes([b[0], b[1], b[2], b[3]]);
    }
    words
}

impl Loaded {
    fn read(mut source: Box<dyn FontSource>) -> Result<Self> {
        let len = source.seek(SeekFrom::End(0))?;
        source.seek(SeekFrom::Start(0))?;

        let mut header = [0u8; HEADER_LEN];
        source.read_exact(&mut header)?;
        let mut c = ByteCursor::new(&header);
        let count = c.read_u32_be()? as usize;
        c.skip(4)?; // encoder version
        let size = c.read_u32_be()?;
        c.skip(4)?;
        let ascent = c.read_u32_be()? as i16 as i32;
        let descent = c.read_u32_be()? as i16 as i32;

        if count == 0 {
            return Err(FontLoadError::EmptyFont.into());
        }
        let table_len = count
            .checked_mul(RECORD_LEN)
            .filter(|&n| (HEADER_LEN + n) as u64 <= len)
            .ok_or(FontLoadError::Truncated {
                offset: HEADER_LEN,
                needed: count.saturating_mul(RECORD_LEN),
            })?;

        let mut table = alloc::<u8>(table_len)?;
        table.resize(table_len, 0);
        source.read_exact(&mut table)?;

        let mut unicode = alloc(count)?;
        let mut width = alloc(count)?;
        let mut x_advance = alloc(count)?;
        let mut x_delta = alloc(count)?;
        let mut bitmap = alloc(count)?;

        let y_advance = (size as u16 as i32).max(ascent + descent);
        let space_width = y_advance * 2 / 7;
        let mut max_ascent = ascent;
        let mut max_descent = descent;
        let mut bitmap_ptr = (HEADER_LEN + table_len) as u32;

        let mut c = ByteCursor::new(&table);
        for _ in 0..count {
            let code = c.read_u32_be()? as u16;
            let height = c.read_u32_be()? as u16 as i32;
            let w = c.read_u32_be()? as u8;
            let adv = c.read_u32_be()? as u8;
            let dy = c.read_u32_be()? as i16 as i32;
            let dx = c.read_u32_be()? as i8;
            c.skip(4)?;

            // bounds come from visible glyphs only: not controls, not
            // Latin-1 space-like codes, and not the full-width space
            let visible = code > 0xFF || (code > 0x20 && code < 0xA0 && code != 0x7F);
            if visible && code != IDEOGRAPHIC_SPACE {
                max_ascent = max_ascent.max(dy);
                max_descent = max_descent.max(height - dy);
            }

            unicode.push(code);
            width.push(w);
            x_advance.push(adv);
            x_delta.push(dx);
            bitmap.push(bitmap_ptr);
            bitmap_ptr = bitmap_ptr.wrapping_add(w as u32 * height as u32);
        }

        let info = VlwInfo {
            glyph_count: count,
            size,
            ascent,
            descent,
            max_ascent,
            max_descent,
            y_advance: max_ascent + max_descent,
            space_width,
        };
        Ok(Self {
            source,
            info,
            unicode,
            width,
            x_advance,
            x_delta,
            bitmap,
            cache: GlyphCache::new(config::glyph_cache_capacity()),
        })
    }

    fn unicode_index(&self, code: CodePoint) -> Option<usize> {
        let last = *self.unicode.last()?;
        if last < code {
            return None;
        }
        let idx = self.unicode.partition_point(|&u| u < code);
        (self.unicode.get(idx) == Some(&code)).then_some(idx)
    }

    /// Record fields after the code point: height, width, advance, y delta,
    /// x delta, padding
    fn read_record(&mut self, idx: usize) -> io::Result<[u32; 6]> {
        let pos = (RECORD_LEN * (idx + 1)) as u64;
        self.source.seek(SeekFrom::Start(pos))?;
        let mut buf = [0u8; 24];
        self.source.read_exact(&mut buf)?;
        Ok(be_words(&buf))
    }

    fn space_metrics(&self, metrics: &mut GlyphMetrics) {
        metrics.width = self.info.space_width as i16;
        metrics.x_advance = self.info.space_width as i16;
        metrics.x_offset = 0;
    }

    fn update_metrics(&mut self, metrics: &mut GlyphMetrics, code: CodePoint) -> bool {
        let Some(idx) = self.unicode_index(code) else {
            self.space_metrics(metrics);
            return code == SPACE;
        };
        // a zero x delta means "not kept in memory": read the record again
        if self.x_delta[idx] != 0 {
            metrics.width = self.width[idx] as i16;
            metrics.x_advance = self.x_advance[idx] as i16;
            metrics.x_offset = self.x_delta[idx] as i16;
            return true;
        }
        match self.read_record(idx) {
            Ok(rec) => {
                metrics.width = rec[1] as i16;
                metrics.x_advance = rec[2] as i16;
                metrics.x_offset = rec[4] as i8 as i16;
            },
            Err(err) => {
                log::warn!("Failed to read VLW metrics for U+{code:04X}: {err}");
                self.space_metrics(metrics);
            },
        }
        true
    }

    fn glyph(&mut self, idx: usize) -> io::Result<Arc<VlwGlyph>> {
        if let Some(glyph) = self.cache.as_ref().and_then(|c| c.get(idx)) {
            return Ok(glyph);
        }
        let rec = self.read_record(idx)?;
        let height = rec[0] as u16 as i32;
        let width = rec[1] as u16 as i32;
        let len = width as usize * height as usize;

        self.source.seek(SeekFrom::Start(self.bitmap[idx] as u64))?;
        let mut pixels = Vec::new();
        Read::take(&mut *self.source, len as u64).read_to_end(&mut pixels)?;
        if pixels.len() != len {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }

        let glyph = Arc::new(VlwGlyph {
            height,
            width,
            x_advance: rec[2] as i32,
            y_delta: rec[3] as i16 as i32,
            x_delta: rec[4] as i8 as i32,
            pixels,
        });
        if let Some(cache) = &self.cache {
            cache.insert(idx, Arc::clone(&glyph));
        }
        Ok(glyph)
    }
}

/// A VLW font and the stream backing it
///
/// Starts out unloaded. [`load`](Self::load) either loads the whole glyph
/// index or leaves the font unloaded; [`unload`](Self::unload) can be
/// called any number of times.
#[derive(Default)]
pub struct VlwFont {
    state: Mutex<Option<Loaded>>,
}

impl VlwFont {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_source(source: impl FontSource + 'static) -> Result<Self> {
        let mut font = Self::new();
        font.load(source)?;
        Ok(font)
    }

    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Result<Self> {
        Self::from_source(Cursor::new(data.into()))
    }

    /// Load the glyph index from `source`, replacing any loaded font
    ///
    /// Fails with `EmptyFont` for a zero glyph count, `Truncated` when the
    /// record table does not fit in the stream, `OutOfMemory` when the
    /// index cannot be allocated and `Io` for read errors.
    pub fn load(&mut self, source: impl FontSource + 'static) -> Result<()> {
        self.unload();
        let loaded = Loaded::read(Box::new(source))?;
        log::debug!(
            "Loaded VLW font: {} glyphs, size {}, ascent {}, descent {}, line {}",
            loaded.info.glyph_count,
            loaded.info.size,
            loaded.info.max_ascent,
            loaded.info.max_descent,
            loaded.info.y_advance
        );
        *self.state.get_mut() = Some(loaded);
        Ok(())
    }

    /// Release the glyph index and close the stream
    pub fn unload(&mut self) {
        if self.state.get_mut().take().is_some() {
            log::debug!("Unloaded VLW font");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.state.lock().is_some()
    }

    /// Header summary of the loaded font; `NotLoaded` otherwise
    pub fn info(&self) -> Result<VlwInfo> {
        self.state
            .lock()
            .as_ref()
            .map(|f| f.info)
            .ok_or_else(|| FontLoadError::NotLoaded.into())
    }

    /// Replace the glyph bitmap cache of a loaded font (0 disables it)
    pub fn set_cache_capacity(&mut self, capacity: usize) {
        if let Some(loaded) = self.state.get_mut() {
            loaded.cache = GlyphCache::new(capacity);
        }
    }

    pub fn cache_stats(&self) -> Option<GlyphCacheStats> {
        self.state.lock().as_ref()?.cache.as_ref().map(GlyphCache::stats)
    }

    /// Position of `code` in the sorted glyph index
    pub fn unicode_index(&self, code: CodePoint) -> Option<usize> {
        self.state.lock().as_ref()?.unicode_index(code)
    }

    pub fn default_metrics(&self) -> GlyphMetrics {
        let state = self.state.lock();
        let Some(info) = state.as_ref().map(|f| f.info) else {
            return GlyphMetrics::default();
        };
        GlyphMetrics {
            width: info.space_width as i16,
            x_advance: info.space_width as i16,
            x_offset: 0,
            height: info.y_advance as i16,
            y_advance: info.y_advance as i16,
            y_offset: 0,
            baseline: info.max_ascent as i16,
        }
    }

    /// Codes missing from the font report the space width; only a missing
    /// U+0020 still counts as found
    pub fn update_metrics(&self, metrics: &mut GlyphMetrics, code: CodePoint) -> bool {
        match self.state.lock().as_mut() {
            Some(font) => font.update_metrics(metrics, code),
            None => false,
        }
    }

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
        let (fetched, max_ascent, space_width) = {
            let mut state = self.state.lock();
            let Some(font) = state.as_mut() else {
                log::warn!("Drawing U+{code:04X} with an unloaded VLW font");
                return 0;
            };
            let space_width = font.info.space_width;
            let fetched = if code == SPACE {
                Ok(Some(Arc::new(VlwGlyph {
                    x_advance: space_width,
                    ..Default::default()
                })))
            } else {
                match font.unicode_index(code) {
                    Some(idx) => font.glyph(idx).map(Some),
                    None => Ok(None),
                }
            };
            (fetched, font.info.max_ascent, space_width)
        };

        let glyph = match fetched {
            Ok(Some(glyph)) => glyph,
            Ok(None) => {
                return draw_dummy(sink, x, y, space_width, line.height as i32, style, cursor)
            },
            Err(err) => {
                log::warn!("Failed to read VLW glyph U+{code:04X}: {err}");
                return draw_dummy(sink, x, y, space_width, line.height as i32, style, cursor);
            },
        };
        draw_glyph(sink, x, y, &glyph, max_ascent, style, line, cursor)
    }
}

impl std::fmt::Debug for VlwFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VlwFont").field("info", &self.info().ok()).finish()
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_glyph<S: PixelSink + ?Sized>(
    sink: &mut S,
    x: i32,
    y: i32,
    glyph: &VlwGlyph,
    max_ascent: i32,
    style: &TextStyle,
    line: &GlyphMetrics,
    cursor: &mut FillCursor,
) -> i32 {
    let (sx, sy) = (style.size_x, style.size_y);
    let x_advance = sx.scale(glyph.x_advance);
    let x_offset = sx.scale(glyph.x_delta);
    let y_offset = max_ascent - glyph.y_delta;

    let colors = ColorTable::new(sink, style);
    let fill_bg = style.fill_background();
    let mut sink = WriteGuard::new(sink);
    let span = BgSpan::claim(fill_bg, x, x_offset, sx.scale(glyph.width), x_advance, cursor);
    let x = x + x_offset;

    let clip = sink.clip_rect();
    let mut bx = x;
    let mut bw = sx.scale(glyph.width);
    if x < clip.left() {
        bw += x - clip.left();
        bx = clip.left();
    }
    bw = bw.min(clip.right() + 1 - bx);
    if bw < 0 {
        return x_advance;
    }

    let pass = GlyphPass {
        x,
        y,
        y_offset,
        glyph,
        style,
    };
    if fill_bg || !sink.is_readable() || sink.has_palette() {
        if !span.is_empty() {
            sink.set_raw_color(colors.back());
            span.fill_bands(&mut *sink, y, y_offset, glyph.height, line.height as i32, sy);
        }
        pass.opaque(&mut *sink, colors, span);
    } else {
        pass.blended(&mut *sink, bx, bw);
    }
    x_advance
}

/// One positioned glyph on its way to the sink; `x` already includes the
/// scaled x delta
struct GlyphPass<'a> {
    x: i32,
    y: i32,
    y_offset: i32,
    glyph: &'a VlwGlyph,
    style: &'a TextStyle,
}

impl GlyphPass<'_> {
    /// Blend every partial pixel against a known background colour
    fn opaque<S: PixelSink + ?Sized>(&self, sink: &mut S, colors: ColorTable, span: BgSpan) {
        let (x, y) = (self.x, self.y);
        let (sx, sy) = (self.style.size_x, self.style.size_y);
        let w = self.glyph.width;
        if w <= 0 {
            return;
        }
        let back = if self.style.fill_background() {
            self.style.back
        } else {
            sink.base_color()
        };
        let clip = sink.clip_rect();
        let mut y1 = sy.scale(self.y_offset);
        for i in 0..self.glyph.height {
            let y0 = y1;
            if y0 > clip.bottom() - y {
                break;
            }
            y1 = sy.scale(self.y_offset + i + 1);
            if !span.is_empty() {
                sink.set_raw_color(colors.back());
                sink.write_fill_rect(span.left, y + y0, span.width(), y1 - y0);
            }
            let row = self.glyph.row(i);
            let alpha = |j: i32| row.get(j as usize).copied().unwrap_or(0);

            let mut j = 0;
            loop {
                let mut x0 = sx.scale(j);
                while alpha(j) != 0xFF {
                    let x1 = sx.scale(j + 1);
                    let a = alpha(j);
                    if a != 0 && x0 < x1 {
                        sink.set_color(self.style.fore.blend_over(back, a));
                        sink.write_fill_rect(x + x0, y + y0, x1 - x0, y1 - y0);
                    }
                    x0 = x1;
                    j += 1;
                    if j == w || clip.right() - x < x0 {
                        break;
                    }
                }
                if j == w || clip.right() - x < x0 {
                    break;
                }
                sink.set_raw_color(colors.fore());
                j += 1;
                while j != w && alpha(j) == 0xFF {
                    j += 1;
                }
                sink.write_fill_rect(x + x0, y + y0, sx.scale(j) - x0, y1 - y0);
                if j == w {
                    break;
                }
            }
        }
    }

    /// Blend over whatever the sink already holds, one row span at a time
    fn blended<S: PixelSink + ?Sized>(&self, sink: &mut S, bx: i32, bw: i32) {
        let (x, y) = (self.x, self.y);
        let (sx, sy) = (self.style.size_x, self.style.size_y);
        let fore = self.style.fore;
        let clip = sink.clip_rect();
        let mut buf: Vec<Rgb888> = Vec::new();
        let mut y1 = sy.scale(self.y_offset);
        for i in 0..self.glyph.height {
            let y0 = y1;
            if y0 > clip.bottom() - y {
                break;
            }
            y1 = sy.scale(self.y_offset + i + 1);
            let mut by = y + y0;
            let mut bh = y1 - y0;
            if by < clip.top() {
                bh += by - clip.top();
                by = clip.top();
            }
            if bh <= 0 {
                continue;
            }

            let row = self.glyph.row(i);
            let Some(first) = row.iter().position(|&a| a != 0) else {
                continue;
            };
            let last = row.iter().rposition(|&a| a != 0).map_or(first + 1, |j| j + 1);
            let rx = sx.scale(first as i32).max(bx - x);
            let rw = sx.scale(last as i32).min(bx + bw - x) - rx;
            if rw <= 0 {
                continue;
            }

            buf.clear();
            buf.resize((rw * bh) as usize, Rgb888::BLACK);
            sink.read_rect_rgb(x + rx, by, rw, bh, &mut buf);

            let mut x1 = sx.scale(first as i32) - rx;
            for (j, &a) in row.iter().enumerate().take(last).skip(first) {
                let x0 = x1.max(0);
                x1 = (sx.scale(j as i32 + 1) - rx).min(rw);
                if a == 0 || x0 >= x1 {
                    continue;
                }
                for yy in 0..bh {
                    for xx in x0..x1 {
                        if let Some(px) = buf.get_mut((xx + yy * rw) as usize) {
                            *px = fore.blend_over(*px, a);
                        }
                    }
                }
            }
            sink.push_rect_rgb(x + rx, by, rw, bh, &buf);
        }
    }
}

/// Writes VLW streams, mostly for tests and tooling
///
/// Glyphs are sorted by code point on [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct VlwBuilder {
    size: u32,
    ascent: u32,
    descent: u32,
    glyphs: Vec<BuilderGlyph>,
}

#[derive(Debug, Clone)]
struct BuilderGlyph {
    code: CodePoint,
    width: u32,
    height: u32,
    x_advance: u32,
    y_delta: i32,
    x_delta: i32,
    pixels: Vec<u8>,
}

impl VlwBuilder {
    pub fn new(size: u32, ascent: u32, descent: u32) -> Self {
        Self {
            size,
            ascent,
            descent,
            glyphs: Vec::new(),
        }
    }

    /// `pixels` is truncated or zero-padded to `width * height`
    #[allow(clippy::too_many_arguments)]
    pub fn glyph(
        mut self,
        code: CodePoint,
        width: u32,
        height: u32,
        x_advance: u32,
        y_delta: i32,
        x_delta: i32,
        mut pixels: Vec<u8>,
    ) -> Self {
        pixels.resize((width * height) as usize, 0);
        self.glyphs.push(BuilderGlyph {
            code,
            width,
            height,
            x_advance,
            y_delta,
            x_delta,
            pixels,
        });
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.glyphs.sort_by_key(|g| g.code);
        let mut out = Vec::new();
        for word in [self.glyphs.len() as u32, 11, self.size, 0, self.ascent, self.descent] {
            out.extend_from_slice(&word.to_be_bytes());
        }
        for g in &self.glyphs {
            let words = [
                g.code as u32,
                g.height,
                g.width,
                g.x_advance,
                g.y_delta as u32,
                g.x_delta as u32,
                0,
            ];
            for word in words {
                out.extend_from_slice(&word.to_be_bytes());
            }
        }
        for g in &self.glyphs {
            out.extend_from_slice(&g.pixels);
        }
        out
    }
}
