//! Fixed-width scalar conversions.
//!
//! This module provides the [`Scalar`] trait, which unifies the byte-level
//! encoding of every fixed-width primitive the stream accessors understand.
//! Readers and writers have a single generic path for all ten integer and
//! float widths instead of one hand-written conversion per type; the typed
//! `read_u32`/`write_f64` entry points are thin wrappers over it.
//!
//! Also here: the half-precision float bit conversions used by
//! `read_f16`/`write_f16`, and [`Decimal`], the 128-bit scaled integer
//! format laid out as four little-endian 32-bit words.
//!
//! # Example
//!
//! ```
//! use oxistream::scalar::Scalar;
//!
//! fn decode_le<T: Scalar>(bytes: T::Bytes) -> T {
//!     T::from_le_bytes(bytes)
//! }
//!
//! let value: u16 = decode_le([0x34, 0x12]);
//! assert_eq!(value, 0x1234);
//! ```

/// A fixed-width value with little- and big-endian byte encodings.
///
/// Implemented for `u8`/`i8` through `u64`/`i64` plus `f32` and `f64`. The
/// encoded width equals `size_of::<Self>()` for every implementor.
pub trait Scalar: Sized + Copy {
    /// Fixed-size byte array type holding one encoded value.
    type Bytes: AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Decode from bytes in little-endian order.
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
    /// Decode from bytes in big-endian order.
    fn from_be_bytes(bytes: Self::Bytes) -> Self;
    /// Encode to bytes in little-endian order.
    fn to_le_bytes(self) -> Self::Bytes;
    /// Encode to bytes in big-endian order.
    fn to_be_bytes(self) -> Self::Bytes;
}

impl Scalar for u8 {
    type Bytes = [u8; 1];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u8::from_le_bytes(bytes)
    }

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        u8::from_be_bytes(bytes)
    }

    fn to_le_bytes(self) -> Self::Bytes {
        u8::to_le_bytes(self)
    }

    fn to_be_bytes(self) -> Self::Bytes {
        u8::to_be_bytes(self)
    }
}

impl Scalar for i8 {
    type Bytes = [u8; 1];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        i8::from_le_bytes(bytes)
    }

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        i8::from_be_bytes(bytes)
    }

    fn to_le_bytes(self) -> Self::Bytes {
        i8::to_le_bytes(self)
    }

    fn to_be_bytes(self) -> Self::Bytes {
        i8::to_be_bytes(self)
    }
}

impl Scalar for u16 {
    type Bytes = [u8; 2];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u16::from_le_bytes(bytes)
    }

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        u16::from_be_bytes(bytes)
    }

    fn to_le_bytes(self) -> Self::Bytes {
        u16::to_le_bytes(self)
    }

    fn to_be_bytes(self) -> Self::Bytes {
        u16::to_be_bytes(self)
    }
}

impl Scalar for i16 {
    type Bytes = [u8; 2];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        i16::from_le_bytes(bytes)
    }

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        i16::from_be_bytes(bytes)
    }

    fn to_le_bytes(self) -> Self::Bytes {
        i16::to_le_bytes(self)
    }

    fn to_be_bytes(self) -> Self::Bytes {
        i16::to_be_bytes(self)
    }
}

impl Scalar for u32 {
    type Bytes = [u8; 4];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u32::from_le_bytes(bytes)
    }

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        u32::from_be_bytes(bytes)
    }

    fn to_le_bytes(self) -> Self::Bytes {
        u32::to_le_bytes(self)
    }

    fn to_be_bytes(self) -> Self::Bytes {
        u32::to_be_bytes(self)
    }
}

impl Scalar for i32 {
    type Bytes = [u8; 4];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        i32::from_le_bytes(bytes)
    }

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        i32::from_be_bytes(bytes)
    }

    fn to_le_bytes(self) -> Self::Bytes {
        i32::to_le_bytes(self)
    }

    fn to_be_bytes(self) -> Self::Bytes {
        i32::to_be_bytes(self)
    }
}

impl Scalar for u64 {
    type Bytes = [u8; 8];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u64::from_le_bytes(bytes)
    }

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        u64::from_be_bytes(bytes)
    }

    fn to_le_bytes(self) -> Self::Bytes {
        u64::to_le_bytes(self)
    }

    fn to_be_bytes(self) -> Self::Bytes {
        u64::to_be_bytes(self)
    }
}

impl Scalar for i64 {
    type Bytes = [u8; 8];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        i64::from_le_bytes(bytes)
    }

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        i64::from_be_bytes(bytes)
    }

    fn to_le_bytes(self) -> Self::Bytes {
        i64::to_le_bytes(self)
    }

    fn to_be_bytes(self) -> Self::Bytes {
        i64::to_be_bytes(self)
    }
}

impl Scalar for f32 {
    type Bytes = [u8; 4];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        f32::from_le_bytes(bytes)
    }

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        f32::from_be_bytes(bytes)
    }

    fn to_le_bytes(self) -> Self::Bytes {
        f32::to_le_bytes(self)
    }

    fn to_be_bytes(self) -> Self::Bytes {
        f32::to_be_bytes(self)
    }
}

impl Scalar for f64 {
    type Bytes = [u8; 8];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        f64::from_le_bytes(bytes)
    }

    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        f64::from_be_bytes(bytes)
    }

    fn to_le_bytes(self) -> Self::Bytes {
        f64::to_le_bytes(self)
    }

    fn to_be_bytes(self) -> Self::Bytes {
        f64::to_be_bytes(self)
    }
}

/// Convert IEEE 754 half-precision bits to an `f32`.
///
/// Handles signed zeros, subnormals, infinities, and NaN. Every half value
/// is exactly representable in single precision, so the conversion is
/// lossless.
///
/// # Example
///
/// ```
/// use oxistream::scalar::f16_to_f32;
///
/// assert_eq!(f16_to_f32(0x3C00), 1.0);
/// assert_eq!(f16_to_f32(0xC000), -2.0);
/// assert_eq!(f16_to_f32(0x7C00), f32::INFINITY);
/// ```
pub fn f16_to_f32(bits: u16) -> f32 {
    let sign = (bits as u32 >> 15) << 31;
    let exp = (bits >> 10) & 0x1F;
    let frac = (bits & 0x3FF) as u32;

    let out = if exp == 0 {
        if frac == 0 {
            sign
        } else {
            // Subnormal half: renormalize into the f32 exponent range.
            let mut exp = 113u32;
            let mut frac = frac;
            while frac & 0x400 == 0 {
                frac <<= 1;
                exp -= 1;
            }
            sign | (exp << 23) | ((frac & 0x3FF) << 13)
        }
    } else if exp == 0x1F {
        sign | 0x7F80_0000 | (frac << 13)
    } else {
        sign | ((exp as u32 + 112) << 23) | (frac << 13)
    };
    f32::from_bits(out)
}

/// Convert an `f32` to IEEE 754 half-precision bits.
///
/// Rounds to nearest, ties to even. Values beyond the half range become
/// signed infinity; values below the smallest subnormal become signed zero.
/// NaN maps to a quiet NaN.
///
/// # Example
///
/// ```
/// use oxistream::scalar::f32_to_f16;
///
/// assert_eq!(f32_to_f16(1.0), 0x3C00);
/// assert_eq!(f32_to_f16(65504.0), 0x7BFF);
/// assert_eq!(f32_to_f16(1e9), 0x7C00);
/// ```
pub fn f32_to_f16(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exp = ((bits >> 23) & 0xFF) as i32;
    let frac = bits & 0x7F_FFFF;

    if exp == 0xFF {
        return if frac == 0 { sign | 0x7C00 } else { sign | 0x7E00 };
    }

    let unbiased = exp - 127;
    if unbiased > 15 {
        sign | 0x7C00
    } else if unbiased >= -14 {
        let mut h_exp = (unbiased + 15) as u32;
        let mut h_frac = frac >> 13;
        // Round to nearest even on the 13 dropped bits.
        let dropped = frac & 0x1FFF;
        if dropped > 0x1000 || (dropped == 0x1000 && h_frac & 1 == 1) {
            h_frac += 1;
            if h_frac == 0x400 {
                h_frac = 0;
                h_exp += 1;
            }
        }
        if h_exp >= 0x1F {
            sign | 0x7C00
        } else {
            sign | ((h_exp as u16) << 10) | h_frac as u16
        }
    } else if unbiased >= -24 {
        // Subnormal half: the implicit leading 1 becomes explicit, then
        // rounding can carry into the smallest normal, which is already
        // the correct bit pattern.
        let mant = 0x80_0000 | frac;
        let drop = 13 + (-14 - unbiased) as u32;
        let mut h = mant >> drop;
        let round = 1u32 << (drop - 1);
        let rem = round - 1;
        if mant & round != 0 && (mant & rem != 0 || h & 1 == 1) {
            h += 1;
        }
        sign | h as u16
    } else {
        sign
    }
}

/// Scale field position within [`Decimal::flags`].
const DECIMAL_SCALE_SHIFT: u32 = 16;
/// Scale field mask within [`Decimal::flags`].
const DECIMAL_SCALE_MASK: u32 = 0x00FF_0000;
/// Sign bit within [`Decimal::flags`].
const DECIMAL_SIGN_MASK: u32 = 0x8000_0000;

/// A 128-bit scaled decimal value.
///
/// The wire format is four 32-bit words, each little-endian regardless of
/// the accessor's configured byte order: the low, middle, and high words of
/// a 96-bit integer mantissa, then a flags word carrying the decimal scale
/// (power of ten, bits 16-23) and the sign (bit 31). The represented value
/// is `mantissa / 10^scale`, negated when the sign bit is set.
///
/// This type stores the words as decoded and performs no arithmetic or
/// range validation; [`Decimal::to_f64`] gives a lossy numeric view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decimal {
    /// Low 32 bits of the mantissa.
    pub lo: u32,
    /// Middle 32 bits of the mantissa.
    pub mid: u32,
    /// High 32 bits of the mantissa.
    pub hi: u32,
    /// Scale and sign flags.
    pub flags: u32,
}

impl Decimal {
    /// Create a decimal from its four raw words.
    pub fn new(lo: u32, mid: u32, hi: u32, flags: u32) -> Self {
        Self { lo, mid, hi, flags }
    }

    /// Create a decimal from a 96-bit mantissa, a power-of-ten scale, and a
    /// sign. Mantissa bits above 96 are discarded.
    pub fn from_parts(mantissa: u128, scale: u8, negative: bool) -> Self {
        let mut flags = ((scale as u32) << DECIMAL_SCALE_SHIFT) & DECIMAL_SCALE_MASK;
        if negative {
            flags |= DECIMAL_SIGN_MASK;
        }
        Self {
            lo: mantissa as u32,
            mid: (mantissa >> 32) as u32,
            hi: (mantissa >> 64) as u32,
            flags,
        }
    }

    /// The 96-bit integer mantissa.
    pub fn mantissa(&self) -> u128 {
        (self.hi as u128) << 64 | (self.mid as u128) << 32 | self.lo as u128
    }

    /// The power-of-ten scale.
    pub fn scale(&self) -> u8 {
        ((self.flags & DECIMAL_SCALE_MASK) >> DECIMAL_SCALE_SHIFT) as u8
    }

    /// Whether the sign bit is set.
    pub fn is_sign_negative(&self) -> bool {
        self.flags & DECIMAL_SIGN_MASK != 0
    }

    /// Lossy conversion to `f64`.
    pub fn to_f64(&self) -> f64 {
        let magnitude = self.mantissa() as f64 / 10f64.powi(self.scale() as i32);
        if self.is_sign_negative() {
            -magnitude
        } else {
            magnitude
        }
    }
}
