//! Bounded binary writer.
//!
//! [`ByteWriter`] is the write-side counterpart of [`BinaryReader`](crate::BinaryReader):
//! an append-only little-endian writer over a buffer whose final size is known
//! up front. Any write that would run past that size is rejected, and
//! [`ByteWriter::finish`] refuses to hand out a buffer with unwritten bytes.

use byteorder::{LittleEndian, WriteBytesExt};

use crate::{Error, Result};

/// An append-only writer with a fixed upper bound.
///
/// # Example
///
/// ```
/// use ntsp_common::ByteWriter;
///
/// let mut writer = ByteWriter::with_bound(6);
/// writer.write_u32(0x04030201).unwrap();
/// writer.write_u16(0x0605).unwrap();
/// assert!(writer.write_bytes(&[7]).is_err());
///
/// assert_eq!(writer.finish().unwrap(), [1, 2, 3, 4, 5, 6]);
/// ```
#[derive(Debug, Clone)]
pub struct ByteWriter {
    buffer: Vec<u8>,
    bound: usize,
}

impl ByteWriter {
    /// Create a writer that accepts exactly `bound` bytes.
    pub fn with_bound(bound: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(bound),
            bound,
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    /// Number of bytes that may still be written.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.bound - self.buffer.len()
    }

    #[inline]
    fn reserve(&self, needed: usize) -> Result<()> {
        if needed > self.remaining() {
            return Err(Error::WriteOverflow {
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Write a little-endian u16.
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.reserve(2)?;
        self.buffer.write_u16::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write a little-endian u32.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.reserve(4)?;
        self.buffer.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write a little-endian u64.
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.reserve(8)?;
        self.buffer.write_u64::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve(bytes.len())?;
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    /// Write a string followed by a null terminator.
    pub fn write_cstring(&mut self, s: &str) -> Result<()> {
        self.reserve(s.len() + 1)?;
        self.buffer.extend_from_slice(s.as_bytes());
        self.buffer.push(0);
        Ok(())
    }

    /// Return the buffer, which must be filled up to its bound.
    pub fn finish(self) -> Result<Vec<u8>> {
        if self.buffer.len() != self.bound {
            return Err(Error::IncompleteWrite {
                expected: self.bound,
                written: self.buffer.len(),
            });
        }
        Ok(self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_little_endian() {
        let mut writer = ByteWriter::with_bound(14);
        writer.write_u16(0x0201).unwrap();
        writer.write_u32(0x06050403).unwrap();
        writer.write_u64(0x0E0D0C0B0A090807).unwrap();

        let bytes = writer.finish().unwrap();
        assert_eq!(bytes, (1..=14).collect::<Vec<u8>>());
    }

    #[test]
    fn test_write_cstring() {
        let mut writer = ByteWriter::with_bound(6);
        writer.write_cstring("abc").unwrap();
        writer.write_cstring("").unwrap();
        assert_eq!(writer.position(), 5);
        writer.write_bytes(&[0]).unwrap();

        assert_eq!(writer.finish().unwrap(), b"abc\0\0\0");
    }

    #[test]
    fn test_overflow_rejected() {
        let mut writer = ByteWriter::with_bound(3);
        let err = writer.write_u32(1).unwrap_err();
        assert!(matches!(err, Error::WriteOverflow { needed: 4, available: 3 }));

        // A rejected write leaves the buffer untouched.
        assert_eq!(writer.position(), 0);
        assert!(writer.write_cstring("abc").is_err());
        writer.write_bytes(&[1, 2, 3]).unwrap();
        assert_eq!(writer.remaining(), 0);
    }

    #[test]
    fn test_finish_requires_full_buffer() {
        let mut writer = ByteWriter::with_bound(4);
        writer.write_u16(7).unwrap();
        assert!(matches!(
            writer.finish(),
            Err(Error::IncompleteWrite { expected: 4, written: 2 })
        ));
    }
}
