//! Bounds-checked reads over a telemetry buffer.

use thiserror::Error;

/// A read extending past the end of the readable bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Read of {width} bytes at offset {offset} exceeds the {available} bytes available.")]
pub struct TruncatedRead {
    /// Absolute offset of the read.
    pub offset: usize,
    /// Number of bytes requested.
    pub width: usize,
    /// Number of bytes readable from the offset.
    pub available: usize,
}

/// A read-only view over a telemetry buffer with a read position.
///
/// Offsets are always absolute, measured from the start of the log, including
/// within a [`window`](Cursor::window). Reads never mutate the buffer, and a
/// failed read leaves the position where it was.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of a buffer.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, position: 0 }
    }

    /// Narrow the readable bytes to `start..end`, positioned at `start`.
    ///
    /// The window is clamped to the bytes readable by this cursor.
    pub fn window(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.buf.len());

        Self {
            buf: &self.buf[..end],
            position: start.min(end),
        }
    }

    /// The absolute offset of the next sequential read.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The absolute offset one past the last readable byte.
    pub fn end(&self) -> usize {
        self.buf.len()
    }

    /// Number of bytes readable from the current position.
    pub fn remaining(&self) -> usize {
        self.remaining_from(self.position)
    }

    /// Number of bytes readable from an offset.
    pub fn remaining_from(&self, offset: usize) -> usize {
        self.buf.len().saturating_sub(offset)
    }

    /// Read `len` bytes at an offset.
    pub fn read_bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], TruncatedRead> {
        offset
            .checked_add(len)
            .and_then(|end| self.buf.get(offset..end))
            .ok_or(TruncatedRead {
                offset,
                width: len,
                available: self.remaining_from(offset),
            })
    }

    /// Read an exact number of bytes at an offset.
    pub fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N], TruncatedRead> {
        let mut r = [0; N];
        r.copy_from_slice(self.read_bytes(offset, N)?);
        Ok(r)
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, TruncatedRead> {
        self.read_array(offset).map(u8::from_le_bytes)
    }

    pub fn read_u16(&self, offset: usize) -> Result<u16, TruncatedRead> {
        self.read_array(offset).map(u16::from_le_bytes)
    }

    pub fn read_u32(&self, offset: usize) -> Result<u32, TruncatedRead> {
        self.read_array(offset).map(u32::from_le_bytes)
    }

    pub fn read_u64(&self, offset: usize) -> Result<u64, TruncatedRead> {
        self.read_array(offset).map(u64::from_le_bytes)
    }

    /// Take an exact number of bytes from the current position, advancing it.
    pub fn take<const N: usize>(&mut self) -> Result<[u8; N], TruncatedRead> {
        let r = self.read_array(self.position)?;
        self.position += N;
        Ok(r)
    }

    /// Take `len` bytes from the current position, advancing it.
    pub fn take_bytes(&mut self, len: usize) -> Result<&'a [u8], TruncatedRead> {
        let r = self.read_bytes(self.position, len)?;
        self.position += len;
        Ok(r)
    }
}
