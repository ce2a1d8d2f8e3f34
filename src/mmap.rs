//! Memory-mapped byte sources.
//!
//! This module provides memory-mapped file access for reading large
//! streams. Memory mapping lets the operating system handle file I/O
//! through virtual memory, which suits the random access patterns that
//! offset-heavy formats produce: every `step_in` is a page lookup rather
//! than a syscall.
//!
//! [`MmapSource`] implements [`Read`] and [`Seek`], so it plugs directly
//! into [`StreamReader`](crate::reader::StreamReader);
//! [`MmapSource::reader`] packages the combination.
//!
//! # Example
//!
//! ```no_run
//! use oxistream::mmap::MmapSource;
//!
//! let mut reader = MmapSource::open("scene.bin").unwrap().reader().unwrap();
//! let magic = reader.read_u32().unwrap();
//! ```
//!
//! # Safety
//!
//! Memory-mapped files can be dangerous if the underlying file is modified
//! by another process while mapped. This implementation uses read-only
//! mappings to minimize risks.

use crate::config::StreamConfig;
use crate::error::Result;
use crate::reader::StreamReader;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

/// A memory-mapped read-only byte source.
///
/// Wraps a memory mapping in an [`Arc`], so clones share the mapping while
/// keeping independent positions. That makes multiple simultaneous cursors
/// over one file cheap: clone the source, hand each clone to its own
/// [`StreamReader`](crate::reader::StreamReader).
#[derive(Debug, Clone)]
pub struct MmapSource {
    /// The memory-mapped file data.
    mmap: Arc<Mmap>,
    /// Current read position.
    position: usize,
}

impl MmapSource {
    /// Open a file and map it read-only.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::OxiStreamError::Io`] if the file cannot be
    /// opened or mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_file(&file)
    }

    /// Map an already-open file read-only.
    ///
    /// The caller must ensure the file is not modified while the mapping
    /// is active.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::OxiStreamError::Io`] if memory mapping
    /// fails.
    pub fn from_file(file: &File) -> Result<Self> {
        // SAFETY: We create a read-only mapping, and the caller is responsible
        // for ensuring the file is not modified while mapped.
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self {
            mmap: Arc::new(mmap),
            position: 0,
        })
    }

    /// Wrap this source in a [`StreamReader`] with the default
    /// configuration.
    pub fn reader(self) -> Result<StreamReader<Self>> {
        StreamReader::new(self)
    }

    /// Wrap this source in a [`StreamReader`] with an explicit
    /// configuration.
    pub fn reader_with_config(self, config: StreamConfig) -> Result<StreamReader<Self>> {
        StreamReader::with_config(self, config)
    }

    /// Total length of the mapped file in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Whether the mapped file has zero length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Current read position.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes from the current position to the end of the file.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.position)
    }

    /// The entire file contents as a slice, zero-copy.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.mmap
    }

    /// The unread remainder as a slice.
    #[inline]
    pub fn remaining_slice(&self) -> &[u8] {
        if self.position >= self.len() {
            &[]
        } else {
            &self.mmap[self.position..]
        }
    }

    /// Reset the read position to the beginning.
    #[inline]
    pub fn reset(&mut self) {
        self.position = 0;
    }
}

impl Read for MmapSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.position >= self.len() {
            return Ok(0);
        }

        let to_read = buf.len().min(self.remaining());
        buf[..to_read].copy_from_slice(&self.mmap[self.position..self.position + to_read]);
        self.position += to_read;
        Ok(to_read)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        if buf.len() > self.remaining() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "read_exact: requested {} bytes but only {} available",
                    buf.len(),
                    self.remaining()
                ),
            ));
        }
        buf.copy_from_slice(&self.mmap[self.position..self.position + buf.len()]);
        self.position += buf.len();
        Ok(())
    }
}

impl Seek for MmapSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let new_pos = match pos {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::End(offset) => self.len() as i64 + offset,
            SeekFrom::Current(offset) => self.position as i64 + offset,
        };

        if new_pos < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek to negative position",
            ));
        }

        // Seeking past end is allowed, consistent with std::io::Cursor.
        self.position = new_pos as usize;
        Ok(new_pos as u64)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.position as u64)
    }
}
