//! Binary parsing utilities for the WMF word stream.
//!
//! WMF files are little-endian streams of 16-bit words. This module provides
//! primitive reads over byte slices plus [`WordReader`], a cursor that tracks
//! its offset and reports truncation as a typed error instead of panicking.

use zerocopy::{FromBytes, I16, I32, LE, U16, U32};

use crate::error::{Error, Result};

/// Read a little-endian u16 from a byte slice at the given offset.
#[inline]
pub fn read_u16_le(data: &[u8], offset: usize) -> Option<u16> {
    data.get(offset..offset + 2)
        .and_then(|b| U16::<LE>::read_from_bytes(b).ok())
        .map(|v| v.get())
}

/// Read a little-endian i16 from a byte slice at the given offset.
#[inline]
pub fn read_i16_le(data: &[u8], offset: usize) -> Option<i16> {
    data.get(offset..offset + 2)
        .and_then(|b| I16::<LE>::read_from_bytes(b).ok())
        .map(|v| v.get())
}

/// Read a little-endian u32 from a byte slice at the given offset.
#[inline]
pub fn read_u32_le(data: &[u8], offset: usize) -> Option<u32> {
    data.get(offset..offset + 4)
        .and_then(|b| U32::<LE>::read_from_bytes(b).ok())
        .map(|v| v.get())
}

/// Read a little-endian i32 from a byte slice at the given offset.
#[inline]
pub fn read_i32_le(data: &[u8], offset: usize) -> Option<i32> {
    data.get(offset..offset + 4)
        .and_then(|b| I32::<LE>::read_from_bytes(b).ok())
        .map(|v| v.get())
}

/// Cursor over a WMF byte stream.
///
/// All multi-byte reads are little-endian. Reading past the end yields
/// [`Error::Truncated`] with the absolute offset, so a failure deep inside a
/// record points at the byte that was missing.
#[derive(Debug, Clone)]
pub struct WordReader<'a> {
    data: &'a [u8],
    pos: usize,
    /// Offset of `data[0]` in the overall input, for error reporting.
    base: usize,
}

impl<'a> WordReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0, base: 0 }
    }

    fn truncated(&self, needed: usize) -> Error {
        Error::Truncated {
            offset: self.base + self.pos,
            needed,
            available: self.data.len() - self.pos,
        }
    }

    /// Bytes not yet consumed.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Absolute offset of the next byte in the overall input.
    #[inline]
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let b = *self.data.get(self.pos).ok_or_else(|| self.truncated(1))?;
        self.pos += 1;
        Ok(b)
    }

    /// Read one 16-bit word, sign-extended.
    pub fn read_i16(&mut self) -> Result<i16> {
        let v = read_i16_le(self.data, self.pos).ok_or_else(|| self.truncated(2))?;
        self.pos += 2;
        Ok(v)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let v = read_u16_le(self.data, self.pos).ok_or_else(|| self.truncated(2))?;
        self.pos += 2;
        Ok(v)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let v = read_i32_le(self.data, self.pos).ok_or_else(|| self.truncated(4))?;
        self.pos += 4;
        Ok(v)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let v = read_u32_le(self.data, self.pos).ok_or_else(|| self.truncated(4))?;
        self.pos += 4;
        Ok(v)
    }

    /// Borrow `len` raw bytes and advance past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let bytes = self
            .data
            .get(self.pos..self.pos + len)
            .ok_or_else(|| self.truncated(len))?;
        self.pos += len;
        Ok(bytes)
    }

    pub fn skip(&mut self, len: usize) -> Result<()> {
        if self.remaining() < len {
            return Err(self.truncated(len));
        }
        self.pos += len;
        Ok(())
    }

    /// Split off a sub-reader covering the next `len` bytes, advancing this
    /// reader past them. Record bodies are parsed through sub-readers so a
    /// handler can never consume beyond its record's declared size.
    pub fn sub_reader(&mut self, len: usize) -> Result<WordReader<'a>> {
        let base = self.base + self.pos;
        let bytes = self.read_bytes(len)?;
        Ok(WordReader { data: bytes, pos: 0, base })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_reads() {
        let data = [0x34, 0x12, 0xFF, 0xFF];
        assert_eq!(read_u16_le(&data, 0), Some(0x1234));
        assert_eq!(read_i16_le(&data, 2), Some(-1));
        assert_eq!(read_u32_le(&data, 0), Some(0xFFFF_1234));
        assert_eq!(read_u16_le(&data, 3), None);
    }

    #[test]
    fn reader_tracks_offsets() {
        let data = [1u8, 0, 2, 0, 3, 0];
        let mut r = WordReader::new(&data);
        assert_eq!(r.read_i16().unwrap(), 1);
        let mut sub = r.sub_reader(2).unwrap();
        assert_eq!(sub.offset(), 2);
        assert_eq!(sub.read_i16().unwrap(), 2);
        assert!(sub.read_i16().is_err());
        assert_eq!(r.read_i16().unwrap(), 3);
    }

    #[test]
    fn truncation_is_an_error() {
        let mut r = WordReader::new(&[0x01]);
        match r.read_i16() {
            Err(Error::Truncated { offset: 0, needed: 2, available: 1 }) => {},
            other => panic!("unexpected: {:?}", other),
        }
    }
}
