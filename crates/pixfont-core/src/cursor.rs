// this_file: crates/pixfont-core/src/cursor.rs

//! Bounds-checked readers over embedded font tables
//!
//! Font tables are walked with an explicit position instead of raw pointer
//! arithmetic. Reading past the end of a table never panics: `BitCursor`
//! yields zero bits and reports itself exhausted, `ByteCursor` returns a
//! `Truncated` error.

use crate::error::{FontLoadError, Result};

/// LSB-first bit reader used by the u8g2 glyph encoding
///
/// Fields are packed starting at the least significant bit of each byte and
/// may straddle byte boundaries.
///
/// ```rust
/// use pixfont_core::cursor::BitCursor;
///
/// let mut bits = BitCursor::new(&[0b1010_0101, 0b0000_0011]);
/// assert_eq!(bits.read_unsigned(4), 0b0101);
/// assert_eq!(bits.read_unsigned(6), 0b11_1010);
/// ```
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    data: &'a [u8],
    pos: usize,
    bit: u8,
}

impl<'a> BitCursor<'a> {
    /// Widest field a single read decodes
    pub const MAX_FIELD_BITS: u8 = 24;

    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0, bit: 0 }
    }

    /// Start reading at a byte offset into `data`
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos, bit: 0 }
    }

    /// Byte position of the next unread bit
    pub fn byte_pos(&self) -> usize {
        self.pos
    }

    /// Bit position inside the current byte (0..8)
    pub fn bit_pos(&self) -> u8 {
        self.bit
    }

    /// True once every bit of the underlying data has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Read `cnt` bits as an unsigned value
    ///
    /// A wider request reads only [`MAX_FIELD_BITS`](Self::MAX_FIELD_BITS)
    /// bits.
    pub fn read_unsigned(&mut self, cnt: u8) -> u32 {
        let cnt = cnt.min(Self::MAX_FIELD_BITS);
        let mut value = 0u32;
        let mut got = 0u8;
        while got < cnt {
            let byte = self.data.get(self.pos).copied().unwrap_or(0) as u32;
            let take = (8 - self.bit).min(cnt - got);
            let bits = (byte >> self.bit) & ((1u32 << take) - 1);
            value |= bits << got;
            got += take;
            self.bit += take;
            if self.bit == 8 {
                self.bit = 0;
                self.pos += 1;
            }
        }
        value
    }

    /// Read `cnt` bits and remove the bias of `1 << (cnt - 1)`
    ///
    /// A 4-bit field storing `0b0000` decodes to -8 and `0b1111` to 7.
    pub fn read_signed(&mut self, cnt: u8) -> i32 {
        let cnt = cnt.min(Self::MAX_FIELD_BITS);
        if cnt == 0 {
            return 0;
        }
        self.read_unsigned(cnt) as i32 - (1i32 << (cnt - 1))
    }
}

/// Big-endian byte reader for fixed-layout headers and records
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.data.len());
        match end {
            Some(end) => {
                let bytes = &self.data[self.pos..end];
                self.pos = end;
                Ok(bytes)
            },
            None => Err(FontLoadError::Truncated {
                offset: self.pos,
                needed: n,
            }
            .into()),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_i32_be(&mut self) -> Result<i32> {
        Ok(self.read_u32_be()? as i32)
    }
}
