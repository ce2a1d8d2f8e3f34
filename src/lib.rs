//! # OxiStream
//!
//! Positioned typed access to binary streams.
//!
//! This crate provides the building blocks for decoding and encoding
//! binary formats that are full of internal offsets:
//!
//! - [`reader`]: positioned typed reading, the step stack, scoped access
//! - [`writer`]: positioned typed writing and back-patching
//! - [`varint`]: variable-length integer codecs in two wire modes
//! - [`scalar`]: fixed-width primitives, half floats, 16-byte decimals
//! - [`composite`]: vectors, quaternions, colors and their component orders
//! - [`config`]: byte order and varint behavior selection
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! OxiStream is designed as a layered stack:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Typed codecs                                        │
//! │     scalars, varints, composites, enums, raw structs    │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Cursor                                              │
//! │     StreamReader/StreamWriter, step stack, scoped '_at' │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Byte source/sink                                    │
//! │     anything Read + Seek / Write + Seek, MmapSource     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxistream::reader::StreamReader;
//! use oxistream::writer::StreamWriter;
//! use std::io::Cursor;
//!
//! // Encode: a u16 count, then a zigzag varint.
//! let mut writer = StreamWriter::new(Cursor::new(Vec::new())).unwrap();
//! writer.write_u16(2).unwrap();
//! writer.write_varint(-300).unwrap();
//!
//! // Decode it back.
//! let buf = writer.into_inner().into_inner();
//! let mut reader = StreamReader::new(Cursor::new(buf)).unwrap();
//! assert_eq!(reader.read_u16().unwrap(), 2);
//! assert_eq!(reader.read_varint().unwrap(), -300);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod composite;
pub mod config;
pub mod error;
#[cfg(feature = "mmap")]
pub mod mmap;
pub mod reader;
pub mod scalar;
pub mod varint;
pub mod writer;

// Re-exports for convenience
pub use composite::{
    Color, ColorOrder, Quaternion, Vector2, Vector2Order, Vector3, Vector3Order, Vector4,
    Vector4Order,
};
pub use config::{ByteOrder, StreamConfig, VarintMode, VarintWidth};
pub use error::{OxiStreamError, Result};
#[cfg(feature = "mmap")]
pub use mmap::MmapSource;
pub use reader::StreamReader;
pub use scalar::{Decimal, Scalar};
pub use writer::StreamWriter;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::composite::{
        Color, ColorOrder, Quaternion, Vector2, Vector2Order, Vector3, Vector3Order, Vector4,
        Vector4Order,
    };
    pub use crate::config::{ByteOrder, StreamConfig, VarintMode, VarintWidth};
    pub use crate::error::{OxiStreamError, Result};
    #[cfg(feature = "mmap")]
    pub use crate::mmap::MmapSource;
    pub use crate::reader::StreamReader;
    pub use crate::scalar::Decimal;
    pub use crate::writer::StreamWriter;
}
