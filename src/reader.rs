//! Positioned typed reading over a seekable byte source.
//!
//! [`StreamReader`] wraps any `Read + Seek` source and adds the cursor
//! machinery binary formats with internal offsets need: absolute and
//! relative motion, alignment, a LIFO stack of saved positions for nested
//! jump-and-return traversal, and typed decoders for every primitive,
//! varint, and composite value the crate understands.
//!
//! # Stepping
//!
//! `step_in(target)` saves the current position and jumps to `target`;
//! `step_out()` returns to the most recently saved position. Steps nest to
//! any depth, which is what makes pointer-chasing formats tractable: follow
//! an offset table entry, read the pointee (which may itself follow
//! offsets), and come back without any bookkeeping at the call site.
//! [`StreamReader::at`] packages the common case: jump, read one value,
//! return.
//!
//! # Example
//!
//! ```
//! use oxistream::reader::StreamReader;
//! use std::io::Cursor;
//!
//! // Offset 0 holds a pointer to a u16 at offset 6.
//! let data = vec![0x06, 0x00, 0x00, 0x00, 0xAA, 0xBB, 0x39, 0x30];
//! let mut reader = StreamReader::new(Cursor::new(data)).unwrap();
//!
//! let target = reader.read_u32().unwrap() as u64;
//! let value = reader.read_u16_at(target).unwrap();
//! assert_eq!(value, 12345);
//! // The cursor is back where the pointer read left it.
//! assert_eq!(reader.position(), 4);
//! ```

use crate::composite::{
    Color, ColorOrder, Quaternion, Vector2, Vector2Order, Vector3, Vector3Order, Vector4,
    Vector4Order,
};
use crate::config::{ByteOrder, StreamConfig};
use crate::error::{OxiStreamError, Result};
use crate::scalar::{Decimal, Scalar, f16_to_f32};
use crate::varint;
use std::io::{self, Read, Seek, SeekFrom};

/// A positioned typed reader over a seekable byte source.
///
/// The reader mirrors the source's position so motion and alignment never
/// touch the source until a seek is actually needed, and keeps the step
/// stack that [`step_in`](Self::step_in)/[`step_out`](Self::step_out) and
/// the positioned `read_*_at` family build on. Configuration (byte order,
/// varint mode and width) is fixed at construction.
#[derive(Debug)]
pub struct StreamReader<R: Read + Seek> {
    /// Underlying byte source.
    inner: R,
    /// Accessor configuration.
    config: StreamConfig,
    /// Mirror of the source's current position.
    position: u64,
    /// Saved positions, innermost last.
    steps: Vec<u64>,
}

impl<R: Read + Seek> StreamReader<R> {
    /// Create a reader with the default configuration.
    ///
    /// The source's current position becomes the reader's starting
    /// position; it does not have to be zero.
    pub fn new(inner: R) -> Result<Self> {
        Self::with_config(inner, StreamConfig::default())
    }

    /// Create a reader with an explicit configuration.
    pub fn with_config(mut inner: R, config: StreamConfig) -> Result<Self> {
        let position = inner.stream_position()?;
        Ok(Self {
            inner,
            config,
            position,
            steps: Vec::new(),
        })
    }

    /// The accessor configuration.
    pub fn config(&self) -> StreamConfig {
        self.config
    }

    /// Get a reference to the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Get a mutable reference to the underlying source.
    ///
    /// Seeking or reading the source directly desynchronizes the mirrored
    /// position; use the reader's own motion operations instead.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume this reader and return the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Current absolute position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Number of saved positions on the step stack.
    pub fn step_depth(&self) -> usize {
        self.steps.len()
    }

    /// Total length of the source, discovered by seeking to its end and
    /// back.
    pub fn stream_len(&mut self) -> Result<u64> {
        let current = self.position;
        let len = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(current))?;
        Ok(len)
    }

    /// Bytes between the current position and the end of the source.
    pub fn remaining(&mut self) -> Result<u64> {
        Ok(self.stream_len()?.saturating_sub(self.position))
    }

    /// Set the absolute position.
    ///
    /// Positions past the end are legal to hold; the next read fails.
    /// Returns the new position.
    pub fn set_position(&mut self, position: u64) -> Result<u64> {
        let pos = self.inner.seek(SeekFrom::Start(position))?;
        self.position = pos;
        Ok(pos)
    }

    /// Move forward by `count` bytes without consuming a value. Returns the
    /// new position.
    pub fn skip(&mut self, count: u64) -> Result<u64> {
        match self.position.checked_add(count) {
            Some(target) => self.set_position(target),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to an overflowing position",
            )
            .into()),
        }
    }

    /// Move backward by `count` bytes. The count is negated internally, so
    /// call sites never juggle negative offsets. Returns the new position.
    pub fn seek_back(&mut self, count: u64) -> Result<u64> {
        match self.position.checked_sub(count) {
            Some(target) => self.set_position(target),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative position",
            )
            .into()),
        }
    }

    /// Advance to the next multiple of `alignment`, or stay put when
    /// already aligned. Returns the new position.
    ///
    /// Fails with `InvalidAlignment` for a zero boundary, without moving.
    pub fn align(&mut self, alignment: u64) -> Result<u64> {
        if alignment == 0 {
            return Err(OxiStreamError::InvalidAlignment);
        }
        let rem = self.position % alignment;
        if rem != 0 {
            self.skip(alignment - rem)
        } else {
            Ok(self.position)
        }
    }

    /// Set the position, then align. Returns the new position.
    pub fn align_from(&mut self, alignment: u64, position: u64) -> Result<u64> {
        if alignment == 0 {
            return Err(OxiStreamError::InvalidAlignment);
        }
        self.set_position(position)?;
        self.align(alignment)
    }

    /// Save the current position on the step stack, then jump to `target`.
    ///
    /// A failed jump leaves both the stack and the position unchanged.
    pub fn step_in(&mut self, target: u64) -> Result<()> {
        let saved = self.position;
        self.set_position(target)?;
        self.steps.push(saved);
        Ok(())
    }

    /// Pop the most recent saved position and return to it.
    ///
    /// Fails with `StepUnderflow` when the stack is empty; neither the
    /// stack nor the position changes on failure. Returns the restored
    /// position.
    pub fn step_out(&mut self) -> Result<u64> {
        self.step_out_many(1)
    }

    /// Pop `count` saved positions, discarding all but the last popped, and
    /// return to that one. `step_out_many(0)` is a no-op.
    ///
    /// Fails with `StepUnderflow` when `count` exceeds the depth; neither
    /// the stack nor the position changes on failure. Returns the restored
    /// position.
    pub fn step_out_many(&mut self, count: usize) -> Result<u64> {
        let depth = self.steps.len();
        if count > depth {
            return Err(OxiStreamError::step_underflow(count, depth));
        }
        if count == 0 {
            return Ok(self.position);
        }
        let target = self.steps[depth - count];
        self.set_position(target)?;
        self.steps.truncate(depth - count);
        Ok(target)
    }

    /// Return to the first saved position, discarding every intermediate
    /// one. Fails with `StepUnderflow` when the stack is empty.
    pub fn step_out_all(&mut self) -> Result<u64> {
        if self.steps.is_empty() {
            return Err(OxiStreamError::step_underflow(1, 0));
        }
        self.step_out_many(self.steps.len())
    }

    /// Empty the step stack without touching the position.
    pub fn clear_steps(&mut self) {
        self.steps.clear();
    }

    /// Run a read operation at `position` and restore the prior position
    /// afterward, on success and on failure alike.
    ///
    /// This is the building block of the `read_*_at` family. The operation
    /// may read as much as it likes and may nest further `at` calls; it
    /// must leave the step stack as it found it.
    ///
    /// # Example
    ///
    /// ```
    /// use oxistream::reader::StreamReader;
    /// use std::io::Cursor;
    ///
    /// let data = vec![0x01, 0x02, 0x03, 0x04];
    /// let mut reader = StreamReader::new(Cursor::new(data)).unwrap();
    /// let pair = reader.at(2, |r| Ok((r.read_u8()?, r.read_u8()?))).unwrap();
    /// assert_eq!(pair, (0x03, 0x04));
    /// assert_eq!(reader.position(), 0);
    /// ```
    pub fn at<T, F>(&mut self, position: u64, op: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        self.step_in(position)?;
        let result = op(self);
        let restored = self.step_out();
        let value = result?;
        restored?;
        Ok(value)
    }

    /// Read exactly `buf.len()` bytes at the current position.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        self.fill(buf)
    }

    /// Read a fixed-width scalar in the configured byte order.
    #[inline]
    pub fn read_scalar<T: Scalar>(&mut self) -> Result<T> {
        let width = size_of::<T>();
        let mut buf = [0u8; 16];
        self.fill(&mut buf[..width])?;
        let Ok(bytes) = T::Bytes::try_from(&buf[..width]) else {
            return Err(OxiStreamError::unexpected_eof(self.position, width));
        };
        Ok(match self.config.byte_order {
            ByteOrder::LittleEndian => T::from_le_bytes(bytes),
            ByteOrder::BigEndian => T::from_be_bytes(bytes),
        })
    }

    /// Read one unsigned byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_scalar()
    }

    /// Read one signed byte.
    pub fn read_i8(&mut self) -> Result<i8> {
        self.read_scalar()
    }

    /// Read an unsigned 16-bit integer.
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_scalar()
    }

    /// Read a signed 16-bit integer.
    pub fn read_i16(&mut self) -> Result<i16> {
        self.read_scalar()
    }

    /// Read an unsigned 32-bit integer.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_scalar()
    }

    /// Read a signed 32-bit integer.
    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_scalar()
    }

    /// Read an unsigned 64-bit integer.
    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_scalar()
    }

    /// Read a signed 64-bit integer.
    pub fn read_i64(&mut self) -> Result<i64> {
        self.read_scalar()
    }

    /// Read a half-precision float, widened to `f32`.
    pub fn read_f16(&mut self) -> Result<f32> {
        Ok(f16_to_f32(self.read_scalar::<u16>()?))
    }

    /// Read a single-precision float.
    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_scalar()
    }

    /// Read a double-precision float.
    pub fn read_f64(&mut self) -> Result<f64> {
        self.read_scalar()
    }

    /// Read a one-byte boolean. Any non-zero byte is `true`.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_scalar::<u8>()? != 0)
    }

    /// Read a one-byte character (Latin-1).
    pub fn read_char(&mut self) -> Result<char> {
        Ok(self.read_scalar::<u8>()? as char)
    }

    /// Read a 16-byte decimal.
    ///
    /// The four 32-bit words are little-endian regardless of the configured
    /// byte order; the word layout belongs to the decimal format itself.
    pub fn read_decimal(&mut self) -> Result<Decimal> {
        let mut buf = [0u8; 16];
        self.fill(&mut buf)?;
        let word = |i: usize| u32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]);
        Ok(Decimal::new(word(0), word(4), word(8), word(12)))
    }

    /// Read an unsigned varint under the configured width cap.
    pub fn read_unsigned_varint(&mut self) -> Result<u64> {
        let width = self.config.varint_width;
        varint::read_unsigned(self, width)
    }

    /// Read a signed varint under the configured mode and width cap.
    pub fn read_varint(&mut self) -> Result<i64> {
        let mode = self.config.varint_mode;
        let width = self.config.varint_width;
        varint::read_signed(self, mode, width)
    }

    /// Read a 7-bit encoded 32-bit integer, independent of the configured
    /// varint mode.
    pub fn read_7bit_i32(&mut self) -> Result<i32> {
        varint::read_7bit_i32(self)
    }

    /// Read a 7-bit encoded 64-bit integer, independent of the configured
    /// varint mode.
    pub fn read_7bit_i64(&mut self) -> Result<i64> {
        varint::read_7bit_i64(self)
    }

    /// Read two floats and assemble them per `order`.
    pub fn read_vector2(&mut self, order: Vector2Order) -> Result<Vector2> {
        let c = [self.read_scalar::<f32>()?, self.read_scalar()?];
        Ok(order.assemble(c))
    }

    /// Read three floats and assemble them per `order`.
    pub fn read_vector3(&mut self, order: Vector3Order) -> Result<Vector3> {
        let c = [
            self.read_scalar::<f32>()?,
            self.read_scalar()?,
            self.read_scalar()?,
        ];
        Ok(order.assemble(c))
    }

    /// Read four floats and assemble them per `order`.
    pub fn read_vector4(&mut self, order: Vector4Order) -> Result<Vector4> {
        Ok(order.assemble(self.read_component4()?))
    }

    /// Read four floats and assemble them into a quaternion per `order`.
    pub fn read_quaternion(&mut self, order: Vector4Order) -> Result<Quaternion> {
        Ok(order.assemble_quaternion(self.read_component4()?))
    }

    fn read_component4(&mut self) -> Result<[f32; 4]> {
        Ok([
            self.read_scalar()?,
            self.read_scalar()?,
            self.read_scalar()?,
            self.read_scalar()?,
        ])
    }

    /// Read a color in `order`'s channel layout. Three-channel orders
    /// consume three bytes and decode with alpha opaque.
    pub fn read_color(&mut self, order: ColorOrder) -> Result<Color> {
        let mut channels = [0u8; 4];
        self.fill(&mut channels[..order.channel_count()])?;
        Ok(order.assemble(channels))
    }

    /// Read one byte and convert it into the caller's enumeration.
    ///
    /// The conversion is total, so discriminants outside the declared
    /// members pass through unchecked; validation is the caller's concern.
    pub fn read_enum8<E: From<u8>>(&mut self) -> Result<E> {
        Ok(E::from(self.read_scalar::<u8>()?))
    }

    /// Read a 16-bit value and convert it into the caller's enumeration,
    /// unchecked.
    pub fn read_enum16<E: From<u16>>(&mut self) -> Result<E> {
        Ok(E::from(self.read_scalar::<u16>()?))
    }

    /// Read a 32-bit value and convert it into the caller's enumeration,
    /// unchecked.
    pub fn read_enum32<E: From<u32>>(&mut self) -> Result<E> {
        Ok(E::from(self.read_scalar::<u32>()?))
    }

    /// Read a 64-bit value and convert it into the caller's enumeration,
    /// unchecked.
    pub fn read_enum64<E: From<u64>>(&mut self) -> Result<E> {
        Ok(E::from(self.read_scalar::<u64>()?))
    }

    /// Read `size_of::<T>()` raw bytes and reinterpret them as `T` per its
    /// own layout. Byte order configuration does not apply; the bytes pass
    /// through untouched.
    pub fn read_struct<T: bytemuck::AnyBitPattern>(&mut self) -> Result<T> {
        let mut buf = vec![0u8; size_of::<T>()];
        self.fill(&mut buf)?;
        Ok(bytemuck::pod_read_unaligned(&buf))
    }

    /// Read a scalar at `position`, restoring the prior position.
    pub fn read_scalar_at<T: Scalar>(&mut self, position: u64) -> Result<T> {
        self.at(position, |r| r.read_scalar())
    }

    /// Read bytes at `position`, restoring the prior position.
    pub fn read_bytes_at(&mut self, position: u64, buf: &mut [u8]) -> Result<()> {
        self.at(position, |r| r.read_bytes(buf))
    }

    /// Read an unsigned byte at `position`, restoring the prior position.
    pub fn read_u8_at(&mut self, position: u64) -> Result<u8> {
        self.at(position, |r| r.read_u8())
    }

    /// Read a signed byte at `position`, restoring the prior position.
    pub fn read_i8_at(&mut self, position: u64) -> Result<i8> {
        self.at(position, |r| r.read_i8())
    }

    /// Read a u16 at `position`, restoring the prior position.
    pub fn read_u16_at(&mut self, position: u64) -> Result<u16> {
        self.at(position, |r| r.read_u16())
    }

    /// Read an i16 at `position`, restoring the prior position.
    pub fn read_i16_at(&mut self, position: u64) -> Result<i16> {
        self.at(position, |r| r.read_i16())
    }

    /// Read a u32 at `position`, restoring the prior position.
    pub fn read_u32_at(&mut self, position: u64) -> Result<u32> {
        self.at(position, |r| r.read_u32())
    }

    /// Read an i32 at `position`, restoring the prior position.
    pub fn read_i32_at(&mut self, position: u64) -> Result<i32> {
        self.at(position, |r| r.read_i32())
    }

    /// Read a u64 at `position`, restoring the prior position.
    pub fn read_u64_at(&mut self, position: u64) -> Result<u64> {
        self.at(position, |r| r.read_u64())
    }

    /// Read an i64 at `position`, restoring the prior position.
    pub fn read_i64_at(&mut self, position: u64) -> Result<i64> {
        self.at(position, |r| r.read_i64())
    }

    /// Read a half-precision float at `position`, restoring the prior
    /// position.
    pub fn read_f16_at(&mut self, position: u64) -> Result<f32> {
        self.at(position, |r| r.read_f16())
    }

    /// Read an f32 at `position`, restoring the prior position.
    pub fn read_f32_at(&mut self, position: u64) -> Result<f32> {
        self.at(position, |r| r.read_f32())
    }

    /// Read an f64 at `position`, restoring the prior position.
    pub fn read_f64_at(&mut self, position: u64) -> Result<f64> {
        self.at(position, |r| r.read_f64())
    }

    /// Read a boolean at `position`, restoring the prior position.
    pub fn read_bool_at(&mut self, position: u64) -> Result<bool> {
        self.at(position, |r| r.read_bool())
    }

    /// Read a character at `position`, restoring the prior position.
    pub fn read_char_at(&mut self, position: u64) -> Result<char> {
        self.at(position, |r| r.read_char())
    }

    /// Read a decimal at `position`, restoring the prior position.
    pub fn read_decimal_at(&mut self, position: u64) -> Result<Decimal> {
        self.at(position, |r| r.read_decimal())
    }

    /// Read an unsigned varint at `position`, restoring the prior position.
    pub fn read_unsigned_varint_at(&mut self, position: u64) -> Result<u64> {
        self.at(position, |r| r.read_unsigned_varint())
    }

    /// Read a signed varint at `position`, restoring the prior position.
    pub fn read_varint_at(&mut self, position: u64) -> Result<i64> {
        self.at(position, |r| r.read_varint())
    }

    /// Read a 7-bit encoded i32 at `position`, restoring the prior
    /// position.
    pub fn read_7bit_i32_at(&mut self, position: u64) -> Result<i32> {
        self.at(position, |r| r.read_7bit_i32())
    }

    /// Read a 7-bit encoded i64 at `position`, restoring the prior
    /// position.
    pub fn read_7bit_i64_at(&mut self, position: u64) -> Result<i64> {
        self.at(position, |r| r.read_7bit_i64())
    }

    /// Read a vector at `position`, restoring the prior position.
    pub fn read_vector2_at(&mut self, position: u64, order: Vector2Order) -> Result<Vector2> {
        self.at(position, |r| r.read_vector2(order))
    }

    /// Read a vector at `position`, restoring the prior position.
    pub fn read_vector3_at(&mut self, position: u64, order: Vector3Order) -> Result<Vector3> {
        self.at(position, |r| r.read_vector3(order))
    }

    /// Read a vector at `position`, restoring the prior position.
    pub fn read_vector4_at(&mut self, position: u64, order: Vector4Order) -> Result<Vector4> {
        self.at(position, |r| r.read_vector4(order))
    }

    /// Read a quaternion at `position`, restoring the prior position.
    pub fn read_quaternion_at(&mut self, position: u64, order: Vector4Order) -> Result<Quaternion> {
        self.at(position, |r| r.read_quaternion(order))
    }

    /// Read a color at `position`, restoring the prior position.
    pub fn read_color_at(&mut self, position: u64, order: ColorOrder) -> Result<Color> {
        self.at(position, |r| r.read_color(order))
    }

    /// Read an 8-bit enumeration at `position`, restoring the prior
    /// position.
    pub fn read_enum8_at<E: From<u8>>(&mut self, position: u64) -> Result<E> {
        self.at(position, |r| r.read_enum8())
    }

    /// Read a 16-bit enumeration at `position`, restoring the prior
    /// position.
    pub fn read_enum16_at<E: From<u16>>(&mut self, position: u64) -> Result<E> {
        self.at(position, |r| r.read_enum16())
    }

    /// Read a 32-bit enumeration at `position`, restoring the prior
    /// position.
    pub fn read_enum32_at<E: From<u32>>(&mut self, position: u64) -> Result<E> {
        self.at(position, |r| r.read_enum32())
    }

    /// Read a 64-bit enumeration at `position`, restoring the prior
    /// position.
    pub fn read_enum64_at<E: From<u64>>(&mut self, position: u64) -> Result<E> {
        self.at(position, |r| r.read_enum64())
    }

    /// Read a raw struct at `position`, restoring the prior position.
    pub fn read_struct_at<T: bytemuck::AnyBitPattern>(&mut self, position: u64) -> Result<T> {
        self.at(position, |r| r.read_struct())
    }

    /// Read exactly `buf.len()` bytes, mapping a short read to
    /// `UnexpectedEof` with the failing offset and re-syncing the mirrored
    /// position from the source.
    #[inline]
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let offset = self.position;
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.position += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                self.position = self.inner.stream_position().unwrap_or(offset);
                Err(OxiStreamError::unexpected_eof(offset, buf.len()))
            }
            Err(e) => {
                self.position = self.inner.stream_position().unwrap_or(offset);
                Err(e.into())
            }
        }
    }
}

impl<R: Read + Seek> Read for StreamReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}

impl<R: Read + Seek> Seek for StreamReader<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let new_pos = self.inner.seek(pos)?;
        self.position = new_pos;
        Ok(new_pos)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.position)
    }
}
