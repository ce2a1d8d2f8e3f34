//! Variable-length integer encoding and decoding.
//!
//! All varints here share one unsigned wire layout: each byte carries 7
//! value bits in its low half, the high bit is set on every byte except the
//! last, and groups appear least-significant first. Decoding stops at the
//! first byte whose high bit is clear and never consumes a byte past it.
//!
//! Signed values map onto that layout in one of two ways, selected by
//! [`VarintMode`]:
//!
//! - **Zigzag** folds the sign into bit 0 (`0, -1, 1, -2, ...` encode as
//!   `0, 1, 2, 3, ...`), so small magnitudes of either sign stay short.
//! - **SevenBit** transports the two's-complement pattern unchanged, the
//!   scheme used by 7-bit encoded ints; negative values always occupy the
//!   width's maximum byte count.
//!
//! [`VarintWidth`] caps decoding at 32 or 64 bits (5 or 10 encoded bytes);
//! an encoding that runs past the cap, or whose final byte carries payload
//! bits above it, fails with
//! [`VarintOverflow`](crate::error::OxiStreamError::VarintOverflow). A
//! truncated encoding surfaces the underlying reader's end-of-stream error.
//!
//! # Example
//!
//! ```
//! use oxistream::varint;
//! use oxistream::config::VarintWidth;
//! use std::io::Cursor;
//!
//! let mut buf = Vec::new();
//! assert_eq!(varint::write_unsigned(&mut buf, 300).unwrap(), 2);
//! assert_eq!(buf, [0xAC, 0x02]);
//!
//! let mut cursor = Cursor::new(&buf);
//! assert_eq!(
//!     varint::read_unsigned(&mut cursor, VarintWidth::Bits64).unwrap(),
//!     300
//! );
//! ```

use crate::config::{VarintMode, VarintWidth};
use crate::error::{OxiStreamError, Result};
use std::io::{Read, Write};

/// Fold a signed 32-bit value into its zigzag representation.
pub fn zigzag_encode32(value: i32) -> u32 {
    (((value as i64) << 1) ^ ((value as i64) >> 31)) as u32
}

/// Unfold a zigzag representation into a signed 32-bit value.
pub fn zigzag_decode32(encoded: u32) -> i32 {
    ((encoded >> 1) as i32) ^ -((encoded & 1) as i32)
}

/// Fold a signed 64-bit value into its zigzag representation.
pub fn zigzag_encode64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Unfold a zigzag representation into a signed 64-bit value.
pub fn zigzag_decode64(encoded: u64) -> i64 {
    ((encoded >> 1) as i64) ^ -((encoded & 1) as i64)
}

/// Number of bytes the unsigned encoding of `value` occupies.
pub fn encoded_len(value: u64) -> usize {
    ((64 - value.leading_zeros()) as usize).div_ceil(7).max(1)
}

#[inline]
fn read_byte<R: Read>(reader: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read an unsigned varint capped at `width`.
///
/// Consumes exactly the encoded bytes, never sign-extends, and fails with
/// `VarintOverflow` when the encoding needs more bits than the cap allows.
pub fn read_unsigned<R: Read>(reader: &mut R, width: VarintWidth) -> Result<u64> {
    let max_bits = width.bits();
    let mut result = 0u64;
    let mut shift = 0u32;

    for _ in 0..width.max_bytes() {
        let byte = read_byte(reader)?;
        let group = (byte & 0x7F) as u64;
        // The final group may only use the bits remaining below the cap.
        if shift + 7 > max_bits && group >> (max_bits - shift) != 0 {
            return Err(OxiStreamError::varint_overflow(max_bits));
        }
        result |= group << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
    Err(OxiStreamError::varint_overflow(max_bits))
}

/// Read a signed varint, unfolded per `mode` and capped at `width`.
pub fn read_signed<R: Read>(reader: &mut R, mode: VarintMode, width: VarintWidth) -> Result<i64> {
    let encoded = read_unsigned(reader, width)?;
    Ok(match (mode, width) {
        (VarintMode::Zigzag, VarintWidth::Bits32) => zigzag_decode32(encoded as u32) as i64,
        (VarintMode::Zigzag, VarintWidth::Bits64) => zigzag_decode64(encoded),
        (VarintMode::SevenBit, VarintWidth::Bits32) => encoded as u32 as i32 as i64,
        (VarintMode::SevenBit, VarintWidth::Bits64) => encoded as i64,
    })
}

/// Write an unsigned varint. Returns the encoded length in bytes.
pub fn write_unsigned<W: Write>(writer: &mut W, value: u64) -> Result<usize> {
    let mut value = value;
    let mut written = 0;
    loop {
        written += 1;
        if value < 0x80 {
            writer.write_all(&[value as u8])?;
            return Ok(written);
        }
        writer.write_all(&[value as u8 | 0x80])?;
        value >>= 7;
    }
}

/// Write a signed varint, folded per `mode` and truncated to `width`.
/// Returns the encoded length in bytes.
pub fn write_signed<W: Write>(
    writer: &mut W,
    value: i64,
    mode: VarintMode,
    width: VarintWidth,
) -> Result<usize> {
    let encoded = match (mode, width) {
        (VarintMode::Zigzag, VarintWidth::Bits32) => zigzag_encode32(value as i32) as u64,
        (VarintMode::Zigzag, VarintWidth::Bits64) => zigzag_encode64(value),
        (VarintMode::SevenBit, VarintWidth::Bits32) => value as i32 as u32 as u64,
        (VarintMode::SevenBit, VarintWidth::Bits64) => value as u64,
    };
    write_unsigned(writer, encoded)
}

/// Read a 7-bit encoded 32-bit integer.
///
/// The two's-complement scheme: the accumulated 32-bit pattern is
/// reinterpreted as signed, so five-byte encodings ending in `0x0F` decode
/// to negative values. The fifth byte may carry at most four payload bits.
pub fn read_7bit_i32<R: Read>(reader: &mut R) -> Result<i32> {
    let value = read_unsigned(reader, VarintWidth::Bits32)?;
    Ok(value as u32 as i32)
}

/// Read a 7-bit encoded 64-bit integer.
///
/// The tenth byte may carry at most one payload bit.
pub fn read_7bit_i64<R: Read>(reader: &mut R) -> Result<i64> {
    let value = read_unsigned(reader, VarintWidth::Bits64)?;
    Ok(value as i64)
}

/// Write a 7-bit encoded 32-bit integer. Returns the encoded length.
pub fn write_7bit_i32<W: Write>(writer: &mut W, value: i32) -> Result<usize> {
    write_unsigned(writer, value as u32 as u64)
}

/// Write a 7-bit encoded 64-bit integer. Returns the encoded length.
pub fn write_7bit_i64<W: Write>(writer: &mut W, value: i64) -> Result<usize> {
    write_unsigned(writer, value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_zigzag_vectors() {
        assert_eq!(zigzag_encode64(0), 0);
        assert_eq!(zigzag_encode64(-1), 1);
        assert_eq!(zigzag_encode64(1), 2);
        assert_eq!(zigzag_encode64(-2), 3);
        assert_eq!(zigzag_encode64(2), 4);
        assert_eq!(zigzag_encode64(i64::MAX), u64::MAX - 1);
        assert_eq!(zigzag_encode64(i64::MIN), u64::MAX);

        for v in [0i64, 1, -1, 127, -128, i64::MAX, i64::MIN] {
            assert_eq!(zigzag_decode64(zigzag_encode64(v)), v);
        }
        for v in [0i32, 1, -1, 300, -300, i32::MAX, i32::MIN] {
            assert_eq!(zigzag_decode32(zigzag_encode32(v)), v);
        }
    }

    #[test]
    fn test_unsigned_known_bytes() {
        let cases: [(u64, &[u8]); 6] = [
            (0, &[0x00]),
            (127, &[0x7F]),
            (128, &[0x80, 0x01]),
            (300, &[0xAC, 0x02]),
            (16383, &[0xFF, 0x7F]),
            (16384, &[0x80, 0x80, 0x01]),
        ];
        for (value, expected) in cases {
            let mut buf = Vec::new();
            let len = write_unsigned(&mut buf, value).unwrap();
            assert_eq!(buf, expected, "encoding of {value}");
            assert_eq!(len, expected.len());
            assert_eq!(encoded_len(value), expected.len());

            let mut cursor = Cursor::new(&buf);
            assert_eq!(read_unsigned(&mut cursor, VarintWidth::Bits64).unwrap(), value);
            assert_eq!(cursor.position() as usize, expected.len());
        }
    }

    #[test]
    fn test_unsigned_roundtrip_boundaries() {
        let boundaries = [
            0u64,
            1,
            0x7F,
            0x80,
            0x3FFF,
            0x4000,
            0x001F_FFFF,
            0x0020_0000,
            u32::MAX as u64,
            u64::MAX,
        ];
        for value in boundaries {
            let mut buf = Vec::new();
            write_unsigned(&mut buf, value).unwrap();
            assert_eq!(buf.len(), encoded_len(value));
            let mut cursor = Cursor::new(&buf);
            assert_eq!(read_unsigned(&mut cursor, VarintWidth::Bits64).unwrap(), value);
        }
    }

    #[test]
    fn test_no_overread_past_terminator() {
        // A varint followed by unrelated payload: only the varint moves the
        // cursor.
        let data = [0xAC, 0x02, 0xDE, 0xAD];
        let mut cursor = Cursor::new(&data[..]);
        assert_eq!(read_unsigned(&mut cursor, VarintWidth::Bits64).unwrap(), 300);
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_width_cap_32() {
        // u32::MAX encodes in 5 bytes, the last carrying 4 payload bits.
        let mut buf = Vec::new();
        write_unsigned(&mut buf, u32::MAX as u64).unwrap();
        assert_eq!(buf, [0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
        let mut cursor = Cursor::new(&buf);
        assert_eq!(
            read_unsigned(&mut cursor, VarintWidth::Bits32).unwrap(),
            u32::MAX as u64
        );

        // A fifth byte above 0x0F does not fit in 32 bits.
        let mut cursor = Cursor::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0x10][..]);
        let err = read_unsigned(&mut cursor, VarintWidth::Bits32).unwrap_err();
        assert!(matches!(
            err,
            OxiStreamError::VarintOverflow { max_bits: 32 }
        ));

        // A sixth byte is over the byte budget outright.
        let mut cursor = Cursor::new(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01][..]);
        assert!(matches!(
            read_unsigned(&mut cursor, VarintWidth::Bits32),
            Err(OxiStreamError::VarintOverflow { max_bits: 32 })
        ));
    }

    #[test]
    fn test_width_cap_64() {
        let mut buf = Vec::new();
        write_unsigned(&mut buf, u64::MAX).unwrap();
        assert_eq!(buf.len(), 10);
        assert_eq!(buf[9], 0x01);
        let mut cursor = Cursor::new(&buf);
        assert_eq!(read_unsigned(&mut cursor, VarintWidth::Bits64).unwrap(), u64::MAX);

        // A tenth byte above 0x01 overflows 64 bits.
        let data = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x02];
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            read_unsigned(&mut cursor, VarintWidth::Bits64),
            Err(OxiStreamError::VarintOverflow { max_bits: 64 })
        ));

        // Eleven continuation bytes never terminate within budget.
        let data = [0x80u8; 11];
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            read_unsigned(&mut cursor, VarintWidth::Bits64),
            Err(OxiStreamError::VarintOverflow { max_bits: 64 })
        ));
    }

    #[test]
    fn test_signed_zigzag_roundtrip() {
        for value in [0i64, -1, 1, 300, -300, i64::MAX, i64::MIN] {
            let mut buf = Vec::new();
            write_signed(&mut buf, value, VarintMode::Zigzag, VarintWidth::Bits64).unwrap();
            let mut cursor = Cursor::new(&buf);
            assert_eq!(
                read_signed(&mut cursor, VarintMode::Zigzag, VarintWidth::Bits64).unwrap(),
                value
            );
        }
        for value in [0i64, -1, 1, i32::MAX as i64, i32::MIN as i64] {
            let mut buf = Vec::new();
            write_signed(&mut buf, value, VarintMode::Zigzag, VarintWidth::Bits32).unwrap();
            let mut cursor = Cursor::new(&buf);
            assert_eq!(
                read_signed(&mut cursor, VarintMode::Zigzag, VarintWidth::Bits32).unwrap(),
                value
            );
        }
    }

    #[test]
    fn test_signed_zigzag_small_negatives_stay_short() {
        let mut buf = Vec::new();
        write_signed(&mut buf, -1, VarintMode::Zigzag, VarintWidth::Bits64).unwrap();
        assert_eq!(buf, [0x01]);

        buf.clear();
        write_signed(&mut buf, -64, VarintMode::Zigzag, VarintWidth::Bits64).unwrap();
        assert_eq!(buf, [0x7F]);
    }

    #[test]
    fn test_signed_seven_bit_roundtrip() {
        for value in [0i64, -1, 1, 300, -300, i32::MAX as i64, i32::MIN as i64] {
            let mut buf = Vec::new();
            write_signed(&mut buf, value, VarintMode::SevenBit, VarintWidth::Bits32).unwrap();
            let mut cursor = Cursor::new(&buf);
            assert_eq!(
                read_signed(&mut cursor, VarintMode::SevenBit, VarintWidth::Bits32).unwrap(),
                value
            );
        }
        for value in [0i64, -1, i64::MAX, i64::MIN] {
            let mut buf = Vec::new();
            write_signed(&mut buf, value, VarintMode::SevenBit, VarintWidth::Bits64).unwrap();
            let mut cursor = Cursor::new(&buf);
            assert_eq!(
                read_signed(&mut cursor, VarintMode::SevenBit, VarintWidth::Bits64).unwrap(),
                value
            );
        }
    }

    #[test]
    fn test_seven_bit_negative_is_max_width() {
        // Two's complement carries all high bits, so -1 is as long as the
        // width allows.
        let mut buf = Vec::new();
        write_signed(&mut buf, -1, VarintMode::SevenBit, VarintWidth::Bits32).unwrap();
        assert_eq!(buf, [0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);

        buf.clear();
        write_signed(&mut buf, -1, VarintMode::SevenBit, VarintWidth::Bits64).unwrap();
        assert_eq!(buf.len(), 10);
    }

    #[test]
    fn test_7bit_known_vectors() {
        let mut buf = Vec::new();
        assert_eq!(write_7bit_i32(&mut buf, 300).unwrap(), 2);
        assert_eq!(buf, [0xAC, 0x02]);
        let mut cursor = Cursor::new(&buf);
        assert_eq!(read_7bit_i32(&mut cursor).unwrap(), 300);

        for value in [0i32, 1, 127, 128, -1, i32::MAX, i32::MIN] {
            let mut buf = Vec::new();
            write_7bit_i32(&mut buf, value).unwrap();
            let mut cursor = Cursor::new(&buf);
            assert_eq!(read_7bit_i32(&mut cursor).unwrap(), value, "value {value}");
        }
        for value in [0i64, -1, 1 << 40, i64::MAX, i64::MIN] {
            let mut buf = Vec::new();
            write_7bit_i64(&mut buf, value).unwrap();
            let mut cursor = Cursor::new(&buf);
            assert_eq!(read_7bit_i64(&mut cursor).unwrap(), value, "value {value}");
        }
    }

    #[test]
    fn test_truncated_encoding_is_eof() {
        let mut cursor = Cursor::new(&[0x80u8][..]);
        let err = read_unsigned(&mut cursor, VarintWidth::Bits64).unwrap_err();
        assert!(matches!(err, OxiStreamError::Io(_)));
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(encoded_len(0), 1);
        assert_eq!(encoded_len(0x7F), 1);
        assert_eq!(encoded_len(0x80), 2);
        assert_eq!(encoded_len(u32::MAX as u64), 5);
        assert_eq!(encoded_len(u64::MAX), 10);
    }
}
