//! Positioned typed writing over a seekable byte sink.
//!
//! [`StreamWriter`] is the encoding counterpart of
//! [`StreamReader`](crate::reader::StreamReader): the same cursor motion,
//! step stack, and scoped positioned access, with typed encoders in place
//! of decoders. The step machinery is what makes back-patching natural:
//! reserve a length field, write the payload, then `write_u32_at` the
//! final count into the reserved slot without disturbing the append
//! position.
//!
//! # Example
//!
//! ```
//! use oxistream::writer::StreamWriter;
//! use std::io::Cursor;
//!
//! let mut writer = StreamWriter::new(Cursor::new(Vec::new())).unwrap();
//! writer.write_u32(0).unwrap(); // placeholder for the payload length
//! writer.write_bytes(b"payload").unwrap();
//! let end = writer.position();
//! writer.write_u32_at(0, (end - 4) as u32).unwrap();
//! assert_eq!(writer.position(), end);
//!
//! let buf = writer.into_inner().into_inner();
//! assert_eq!(&buf[..4], &7u32.to_le_bytes());
//! assert_eq!(&buf[4..], b"payload");
//! ```

use crate::composite::{
    Color, ColorOrder, Quaternion, Vector2, Vector2Order, Vector3, Vector3Order, Vector4,
    Vector4Order,
};
use crate::config::{ByteOrder, StreamConfig};
use crate::error::{OxiStreamError, Result};
use crate::scalar::{Decimal, Scalar, f32_to_f16};
use crate::varint;
use std::io::{self, Seek, SeekFrom, Write};

/// A positioned typed writer over a seekable byte sink.
///
/// Shares [`StreamReader`](crate::reader::StreamReader)'s cursor model:
/// a mirrored position, a step stack for jump-and-return motion, and a
/// configuration fixed at construction that selects byte order and varint
/// behavior for every typed write.
#[derive(Debug)]
pub struct StreamWriter<W: Write + Seek> {
    /// Underlying byte sink.
    inner: W,
    /// Accessor configuration.
    config: StreamConfig,
    /// Mirror of the sink's current position.
    position: u64,
    /// Saved positions, innermost last.
    steps: Vec<u64>,
}

impl<W: Write + Seek> StreamWriter<W> {
    /// Create a writer with the default configuration.
    ///
    /// The sink's current position becomes the writer's starting position.
    pub fn new(inner: W) -> Result<Self> {
        Self::with_config(inner, StreamConfig::default())
    }

    /// Create a writer with an explicit configuration.
    pub fn with_config(mut inner: W, config: StreamConfig) -> Result<Self> {
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

    /// Get a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Get a mutable reference to the underlying sink.
    ///
    /// Seeking or writing the sink directly desynchronizes the mirrored
    /// position; use the writer's own operations instead.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Consume this writer and return the underlying sink.
    pub fn into_inner(self) -> W {
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

    /// Total length of the sink, discovered by seeking to its end and back.
    pub fn stream_len(&mut self) -> Result<u64> {
        let current = self.position;
        let len = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(current))?;
        Ok(len)
    }

    /// Set the absolute position.
    ///
    /// Positions past the current end are legal; writing there extends the
    /// sink, with any gap filled by zeros. Returns the new position.
    pub fn set_position(&mut self, position: u64) -> Result<u64> {
        let pos = self.inner.seek(SeekFrom::Start(position))?;
        self.position = pos;
        Ok(pos)
    }

    /// Move forward by `count` bytes without emitting anything. Returns the
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

    /// Move backward by `count` bytes. The count is negated internally.
    /// Returns the new position.
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

    /// Pad with zero bytes up to the next multiple of `alignment`, or stay
    /// put when already aligned. Returns the new position.
    ///
    /// Padding is written rather than seeked over so the bytes up to the
    /// boundary exist on every sink. Fails with `InvalidAlignment` for a
    /// zero boundary, without writing.
    pub fn align(&mut self, alignment: u64) -> Result<u64> {
        if alignment == 0 {
            return Err(OxiStreamError::InvalidAlignment);
        }
        let rem = self.position % alignment;
        if rem != 0 {
            self.pad_zeros(alignment - rem)?;
        }
        Ok(self.position)
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

    /// Run a write operation at `position` and restore the prior position
    /// afterward, on success and on failure alike.
    ///
    /// This is the building block of the `write_*_at` patching family. The
    /// operation must leave the step stack as it found it.
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

    /// Write a slice of bytes at the current position.
    pub fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.put(buf)
    }

    /// Write a fixed-width scalar in the configured byte order.
    #[inline]
    pub fn write_scalar<T: Scalar>(&mut self, value: T) -> Result<()> {
        match self.config.byte_order {
            ByteOrder::LittleEndian => self.put(value.to_le_bytes().as_ref()),
            ByteOrder::BigEndian => self.put(value.to_be_bytes().as_ref()),
        }
    }

    /// Write one unsigned byte.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_scalar(value)
    }

    /// Write one signed byte.
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_scalar(value)
    }

    /// Write an unsigned 16-bit integer.
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write_scalar(value)
    }

    /// Write a signed 16-bit integer.
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.write_scalar(value)
    }

    /// Write an unsigned 32-bit integer.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_scalar(value)
    }

    /// Write a signed 32-bit integer.
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_scalar(value)
    }

    /// Write an unsigned 64-bit integer.
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.write_scalar(value)
    }

    /// Write a signed 64-bit integer.
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.write_scalar(value)
    }

    /// Write a float narrowed to half precision.
    ///
    /// Values outside half range become infinities; sub-half-precision
    /// detail rounds to nearest even.
    pub fn write_f16(&mut self, value: f32) -> Result<()> {
        self.write_scalar(f32_to_f16(value))
    }

    /// Write a single-precision float.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_scalar(value)
    }

    /// Write a double-precision float.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_scalar(value)
    }

    /// Write a one-byte boolean, `0x01` for true and `0x00` for false.
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_scalar(value as u8)
    }

    /// Write a one-byte character. Characters above U+00FF are truncated
    /// to their low byte.
    pub fn write_char(&mut self, value: char) -> Result<()> {
        self.write_scalar(value as u8)
    }

    /// Write a 16-byte decimal.
    ///
    /// The four 32-bit words are little-endian regardless of the configured
    /// byte order, matching [`read_decimal`](crate::reader::StreamReader::read_decimal).
    pub fn write_decimal(&mut self, value: Decimal) -> Result<()> {
        let mut buf = [0u8; 16];
        buf[0..4].copy_from_slice(&value.lo.to_le_bytes());
        buf[4..8].copy_from_slice(&value.mid.to_le_bytes());
        buf[8..12].copy_from_slice(&value.hi.to_le_bytes());
        buf[12..16].copy_from_slice(&value.flags.to_le_bytes());
        self.put(&buf)
    }

    /// Write an unsigned varint. Returns the encoded length in bytes.
    pub fn write_unsigned_varint(&mut self, value: u64) -> Result<usize> {
        varint::write_unsigned(self, value)
    }

    /// Write a signed varint under the configured mode and width. Returns
    /// the encoded length in bytes.
    pub fn write_varint(&mut self, value: i64) -> Result<usize> {
        let mode = self.config.varint_mode;
        let width = self.config.varint_width;
        varint::write_signed(self, value, mode, width)
    }

    /// Write a 7-bit encoded 32-bit integer, independent of the configured
    /// varint mode. Returns the encoded length in bytes.
    pub fn write_7bit_i32(&mut self, value: i32) -> Result<usize> {
        varint::write_7bit_i32(self, value)
    }

    /// Write a 7-bit encoded 64-bit integer, independent of the configured
    /// varint mode. Returns the encoded length in bytes.
    pub fn write_7bit_i64(&mut self, value: i64) -> Result<usize> {
        varint::write_7bit_i64(self, value)
    }

    /// Write a vector's components in `order`'s stream layout.
    pub fn write_vector2(&mut self, value: Vector2, order: Vector2Order) -> Result<()> {
        for c in order.components(value) {
            self.write_scalar(c)?;
        }
        Ok(())
    }

    /// Write a vector's components in `order`'s stream layout.
    pub fn write_vector3(&mut self, value: Vector3, order: Vector3Order) -> Result<()> {
        for c in order.components(value) {
            self.write_scalar(c)?;
        }
        Ok(())
    }

    /// Write a vector's components in `order`'s stream layout.
    pub fn write_vector4(&mut self, value: Vector4, order: Vector4Order) -> Result<()> {
        for c in order.components(value) {
            self.write_scalar(c)?;
        }
        Ok(())
    }

    /// Write a quaternion's components in `order`'s stream layout.
    pub fn write_quaternion(&mut self, value: Quaternion, order: Vector4Order) -> Result<()> {
        for c in order.quaternion_components(value) {
            self.write_scalar(c)?;
        }
        Ok(())
    }

    /// Write a color in `order`'s channel layout. Three-channel orders emit
    /// three bytes and drop the alpha channel.
    pub fn write_color(&mut self, value: Color, order: ColorOrder) -> Result<()> {
        let channels = order.components(value);
        self.put(&channels[..order.channel_count()])
    }

    /// Write an enumeration as one byte.
    pub fn write_enum8<E: Into<u8>>(&mut self, value: E) -> Result<()> {
        self.write_scalar(value.into())
    }

    /// Write an enumeration as a 16-bit value.
    pub fn write_enum16<E: Into<u16>>(&mut self, value: E) -> Result<()> {
        self.write_scalar(value.into())
    }

    /// Write an enumeration as a 32-bit value.
    pub fn write_enum32<E: Into<u32>>(&mut self, value: E) -> Result<()> {
        self.write_scalar(value.into())
    }

    /// Write an enumeration as a 64-bit value.
    pub fn write_enum64<E: Into<u64>>(&mut self, value: E) -> Result<()> {
        self.write_scalar(value.into())
    }

    /// Write `size_of::<T>()` raw bytes taken from `value`'s own layout.
    /// Byte order configuration does not apply; the bytes pass through
    /// untouched.
    pub fn write_struct<T: bytemuck::NoUninit>(&mut self, value: &T) -> Result<()> {
        self.put(bytemuck::bytes_of(value))
    }

    /// Write a scalar at `position`, restoring the prior position.
    pub fn write_scalar_at<T: Scalar>(&mut self, position: u64, value: T) -> Result<()> {
        self.at(position, |w| w.write_scalar(value))
    }

    /// Write bytes at `position`, restoring the prior position.
    pub fn write_bytes_at(&mut self, position: u64, buf: &[u8]) -> Result<()> {
        self.at(position, |w| w.write_bytes(buf))
    }

    /// Write an unsigned byte at `position`, restoring the prior position.
    pub fn write_u8_at(&mut self, position: u64, value: u8) -> Result<()> {
        self.at(position, |w| w.write_u8(value))
    }

    /// Write a signed byte at `position`, restoring the prior position.
    pub fn write_i8_at(&mut self, position: u64, value: i8) -> Result<()> {
        self.at(position, |w| w.write_i8(value))
    }

    /// Write a u16 at `position`, restoring the prior position.
    pub fn write_u16_at(&mut self, position: u64, value: u16) -> Result<()> {
        self.at(position, |w| w.write_u16(value))
    }

    /// Write an i16 at `position`, restoring the prior position.
    pub fn write_i16_at(&mut self, position: u64, value: i16) -> Result<()> {
        self.at(position, |w| w.write_i16(value))
    }

    /// Write a u32 at `position`, restoring the prior position.
    pub fn write_u32_at(&mut self, position: u64, value: u32) -> Result<()> {
        self.at(position, |w| w.write_u32(value))
    }

    /// Write an i32 at `position`, restoring the prior position.
    pub fn write_i32_at(&mut self, position: u64, value: i32) -> Result<()> {
        self.at(position, |w| w.write_i32(value))
    }

    /// Write a u64 at `position`, restoring the prior position.
    pub fn write_u64_at(&mut self, position: u64, value: u64) -> Result<()> {
        self.at(position, |w| w.write_u64(value))
    }

    /// Write an i64 at `position`, restoring the prior position.
    pub fn write_i64_at(&mut self, position: u64, value: i64) -> Result<()> {
        self.at(position, |w| w.write_i64(value))
    }

    /// Write a half-precision float at `position`, restoring the prior
    /// position.
    pub fn write_f16_at(&mut self, position: u64, value: f32) -> Result<()> {
        self.at(position, |w| w.write_f16(value))
    }

    /// Write an f32 at `position`, restoring the prior position.
    pub fn write_f32_at(&mut self, position: u64, value: f32) -> Result<()> {
        self.at(position, |w| w.write_f32(value))
    }

    /// Write an f64 at `position`, restoring the prior position.
    pub fn write_f64_at(&mut self, position: u64, value: f64) -> Result<()> {
        self.at(position, |w| w.write_f64(value))
    }

    /// Write a boolean at `position`, restoring the prior position.
    pub fn write_bool_at(&mut self, position: u64, value: bool) -> Result<()> {
        self.at(position, |w| w.write_bool(value))
    }

    /// Write a character at `position`, restoring the prior position.
    pub fn write_char_at(&mut self, position: u64, value: char) -> Result<()> {
        self.at(position, |w| w.write_char(value))
    }

    /// Write a decimal at `position`, restoring the prior position.
    pub fn write_decimal_at(&mut self, position: u64, value: Decimal) -> Result<()> {
        self.at(position, |w| w.write_decimal(value))
    }

    /// Write an unsigned varint at `position`, restoring the prior
    /// position.
    ///
    /// The encoded length depends on the value; patching over an existing
    /// varint is only safe when the lengths match.
    pub fn write_unsigned_varint_at(&mut self, position: u64, value: u64) -> Result<usize> {
        self.at(position, |w| w.write_unsigned_varint(value))
    }

    /// Write a signed varint at `position`, restoring the prior position.
    ///
    /// The encoded length depends on the value; patching over an existing
    /// varint is only safe when the lengths match.
    pub fn write_varint_at(&mut self, position: u64, value: i64) -> Result<usize> {
        self.at(position, |w| w.write_varint(value))
    }

    /// Write a 7-bit encoded i32 at `position`, restoring the prior
    /// position.
    pub fn write_7bit_i32_at(&mut self, position: u64, value: i32) -> Result<usize> {
        self.at(position, |w| w.write_7bit_i32(value))
    }

    /// Write a 7-bit encoded i64 at `position`, restoring the prior
    /// position.
    pub fn write_7bit_i64_at(&mut self, position: u64, value: i64) -> Result<usize> {
        self.at(position, |w| w.write_7bit_i64(value))
    }

    /// Write a vector at `position`, restoring the prior position.
    pub fn write_vector2_at(
        &mut self,
        position: u64,
        value: Vector2,
        order: Vector2Order,
    ) -> Result<()> {
        self.at(position, |w| w.write_vector2(value, order))
    }

    /// Write a vector at `position`, restoring the prior position.
    pub fn write_vector3_at(
        &mut self,
        position: u64,
        value: Vector3,
        order: Vector3Order,
    ) -> Result<()> {
        self.at(position, |w| w.write_vector3(value, order))
    }

    /// Write a vector at `position`, restoring the prior position.
    pub fn write_vector4_at(
        &mut self,
        position: u64,
        value: Vector4,
        order: Vector4Order,
    ) -> Result<()> {
        self.at(position, |w| w.write_vector4(value, order))
    }

    /// Write a quaternion at `position`, restoring the prior position.
    pub fn write_quaternion_at(
        &mut self,
        position: u64,
        value: Quaternion,
        order: Vector4Order,
    ) -> Result<()> {
        self.at(position, |w| w.write_quaternion(value, order))
    }

    /// Write a color at `position`, restoring the prior position.
    pub fn write_color_at(&mut self, position: u64, value: Color, order: ColorOrder) -> Result<()> {
        self.at(position, |w| w.write_color(value, order))
    }

    /// Write an 8-bit enumeration at `position`, restoring the prior
    /// position.
    pub fn write_enum8_at<E: Into<u8>>(&mut self, position: u64, value: E) -> Result<()> {
        self.at(position, |w| w.write_enum8(value))
    }

    /// Write a 16-bit enumeration at `position`, restoring the prior
    /// position.
    pub fn write_enum16_at<E: Into<u16>>(&mut self, position: u64, value: E) -> Result<()> {
        self.at(position, |w| w.write_enum16(value))
    }

    /// Write a 32-bit enumeration at `position`, restoring the prior
    /// position.
    pub fn write_enum32_at<E: Into<u32>>(&mut self, position: u64, value: E) -> Result<()> {
        self.at(position, |w| w.write_enum32(value))
    }

    /// Write a 64-bit enumeration at `position`, restoring the prior
    /// position.
    pub fn write_enum64_at<E: Into<u64>>(&mut self, position: u64, value: E) -> Result<()> {
        self.at(position, |w| w.write_enum64(value))
    }

    /// Write a raw struct at `position`, restoring the prior position.
    pub fn write_struct_at<T: bytemuck::NoUninit>(
        &mut self,
        position: u64,
        value: &T,
    ) -> Result<()> {
        self.at(position, |w| w.write_struct(value))
    }

    /// Write the whole buffer, re-syncing the mirrored position from the
    /// sink on failure.
    #[inline]
    fn put(&mut self, buf: &[u8]) -> Result<()> {
        match self.inner.write_all(buf) {
            Ok(()) => {
                self.position += buf.len() as u64;
                Ok(())
            }
            Err(e) => {
                self.position = self.inner.stream_position().unwrap_or(self.position);
                Err(e.into())
            }
        }
    }

    fn pad_zeros(&mut self, count: u64) -> Result<()> {
        const ZEROS: [u8; 64] = [0u8; 64];
        let mut left = count;
        while left > 0 {
            let chunk = left.min(ZEROS.len() as u64) as usize;
            self.put(&ZEROS[..chunk])?;
            left -= chunk as u64;
        }
        Ok(())
    }
}

impl<W: Write + Seek> Write for StreamWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write + Seek> Seek for StreamWriter<W> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let new_pos = self.inner.seek(pos)?;
        self.position = new_pos;
        Ok(new_pos)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.position)
    }
}
