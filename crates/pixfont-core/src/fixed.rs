// this_file: crates/pixfont-core/src/fixed.rs

//! 16.16 fixed-point scale factors
//!
//! Glyph rasterisers never touch floating point on the draw path. A text
//! size of 1.5 is stored as `1.5 * 65536` and every scaled pixel boundary is
//! computed as `(index * scale) >> 16`. Because the same formula is applied
//! to every boundary, adjacent fill rectangles always share an edge: the
//! sequence of boundaries for `0..=n` is non-decreasing and never leaves a
//! one-pixel seam.

use std::ops::Mul;

/// A magnification factor with 16 fractional bits
///
/// ```rust
/// use pixfont_core::fixed::Fixed16;
///
/// let double = Fixed16::from_int(2);
/// assert_eq!(double.scale(7), 14);
///
/// let one_and_half = Fixed16::from_float(1.5);
/// assert_eq!(one_and_half.scale(4), 6);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Fixed16(i32);

impl Fixed16 {
    /// Number of fractional bits
    pub const FRAC_BITS: u32 = 16;

    /// Exactly 1.0
    pub const ONE: Fixed16 = Fixed16(1 << Self::FRAC_BITS);

    /// Exactly 0.0
    pub const ZERO: Fixed16 = Fixed16(0);

    #[inline]
    pub const fn from_int(x: i32) -> Self {
        Fixed16(x << Self::FRAC_BITS)
    }

    /// Truncating conversion, matching `(int32_t)(65536 * size)`
    #[inline]
    pub fn from_float(x: f32) -> Self {
        Fixed16((x * 65536.0) as i32)
    }

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Fixed16(raw)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub fn to_float(self) -> f32 {
        self.0 as f32 / 65536.0
    }

    /// Scaled pixel boundary for a source index: `(n * self) >> 16`
    ///
    /// The product is formed in 64 bits so large glyph coordinates cannot
    /// overflow; the shift is arithmetic, so negative offsets round toward
    /// negative infinity exactly like the 32-bit formula they replace.
    #[inline]
    pub const fn scale(self, n: i32) -> i32 {
        ((n as i64 * self.0 as i64) >> Self::FRAC_BITS) as i32
    }

    /// True when the factor is strictly positive
    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl Default for Fixed16 {
    fn default() -> Self {
        Self::ONE
    }
}

impl Mul<i32> for Fixed16 {
    type Output = i32;

    #[inline]
    fn mul(self, n: i32) -> i32 {
        self.scale(n)
    }
}

impl From<i32> for Fixed16 {
    #[inline]
    fn from(x: i32) -> Self {
        Self::from_int(x)
    }
}

impl From<f32> for Fixed16 {
    #[inline]
    fn from(x: f32) -> Self {
        Self::from_float(x)
    }
}

impl From<Fixed16> for f32 {
    #[inline]
    fn from(x: Fixed16) -> f32 {
        x.to_float()
    }
}
