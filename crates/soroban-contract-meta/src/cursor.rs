//! Positional byte cursor with XDR alignment rules.
//!
//! [`XdrCursor`] reads from a borrowed, immutable buffer and never copies:
//! [`XdrCursor::read_opaque`] returns a view into the source bytes. Two read
//! families coexist on the same cursor:
//!
//! - XDR reads (`read_i32`/`read_u32`/`read_i64`/`read_u64`, the float
//!   reads, `read_opaque`) are big-endian and keep the cursor on the XDR
//!   4-byte grid; `read_opaque` consumes zero padding up to the next
//!   multiple of four of the requested size.
//! - Container-format reads (`read_u8`, `read_var_u32`, `read_raw`) are raw
//!   primitives for the WASM section table and never consume padding.
//!
//! A failed read reports an error without moving the position, so callers
//! observe no partial mutation.

use crate::error::DecodeError;

/// Cursor over an immutable byte buffer.
#[derive(Clone, Debug)]
pub struct XdrCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> XdrCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Current position from the start of the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// True when the position is exactly at the end of the buffer.
    pub fn is_exhausted(&self) -> bool {
        self.offset == self.bytes.len()
    }

    /// Fails with [`DecodeError::TrailingData`] unless the buffer has been
    /// consumed in full.
    pub fn ensure_exhausted(&self) -> Result<(), DecodeError> {
        if self.is_exhausted() {
            Ok(())
        } else {
            Err(DecodeError::TrailingData {
                offset: self.offset,
                remaining: self.remaining(),
            })
        }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(DecodeError::BufferOverrun {
                offset: self.offset,
                requested: len,
                available: self.bytes.len() - self.offset,
            })?;
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    /// Read `len` bytes with no alignment handling. Container-format
    /// primitive, used for section bodies and names.
    pub fn read_raw(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.take(len)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    /// Read `len` bytes of opaque data, then consume the zero padding that
    /// keeps the stream on the 4-byte grid. Any non-zero padding byte fails
    /// the read, position unchanged.
    pub fn read_opaque(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let pad = (4 - len % 4) % 4;
        let total = len
            .checked_add(pad)
            .filter(|&total| total <= self.remaining())
            .ok_or(DecodeError::BufferOverrun {
                offset: self.offset,
                requested: len.saturating_add(pad),
                available: self.remaining(),
            })?;
        for i in 0..pad {
            if self.bytes[self.offset + len + i] != 0 {
                return Err(DecodeError::MalformedPadding {
                    offset: self.offset + len + i,
                });
            }
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += total;
        Ok(slice)
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        let b = self.take(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        let b = self.take(8)?;
        Ok(i64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        let b = self.take(8)?;
        Ok(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        let b = self.take(4)?;
        Ok(f32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        let b = self.take(8)?;
        Ok(f64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Read an unsigned LEB128 integer: 7 payload bits per byte, high bit as
    /// continuation flag, least significant group first. Never padded.
    pub fn read_var_u32(&mut self) -> Result<u32, DecodeError> {
        let start = self.offset;
        let mut result: u64 = 0;
        let mut shift = 0u32;
        let mut pos = self.offset;
        loop {
            let byte = *self
                .bytes
                .get(pos)
                .ok_or(DecodeError::BufferOverrun {
                    offset: start,
                    requested: pos - start + 1,
                    available: self.bytes.len() - start,
                })?;
            pos += 1;
            if shift >= 35 {
                return Err(DecodeError::VarintOverflow { offset: start });
            }
            result |= u64::from(byte & 0x7f) << shift;
            shift += 7;
            if byte & 0x80 == 0 {
                break;
            }
        }
        let value =
            u32::try_from(result).map_err(|_| DecodeError::VarintOverflow { offset: start })?;
        self.offset = pos;
        Ok(value)
    }
}
