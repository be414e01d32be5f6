//! # Binary Cursor
//!
//! Bounds-checked sequential readers and writers over fixed byte buffers.
//!
//! Every frame in the protocol is built into, or parsed from, a
//! caller-owned fixed-size buffer. `Reader` and `Writer` wrap such a
//! buffer with a cursor that advances on each typed access and refuses to
//! move past the end. `seek` gives the absolute repositioning needed to
//! patch the length and CRC header fields after the payload is written.
//!
//! All multi-byte accessors use the wire's little-endian byte order; raw
//! byte ranges (magic string, MAC bytes) are copied verbatim.

use crate::error::{DsuServerError, Result};

/// Sequential little-endian reader over a borrowed byte buffer
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Wrap a buffer with the cursor at position 0
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total buffer capacity
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes remaining between the cursor and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Move the cursor to an absolute position
    ///
    /// # Errors
    ///
    /// Returns `SeekOutOfBounds` if `pos` exceeds the buffer length.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.buf.len() {
            return Err(DsuServerError::SeekOutOfBounds {
                target: pos,
                capacity: self.buf.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Borrow `len` raw bytes and advance the cursor past them
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(DsuServerError::TruncatedFrame {
                offset: self.pos,
                needed: len,
                available: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Read a single byte
    pub fn get_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read a little-endian u16
    pub fn get_u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    /// Read a little-endian u32
    pub fn get_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a little-endian i32
    pub fn get_i32(&mut self) -> Result<i32> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a little-endian u64
    pub fn get_u64(&mut self) -> Result<u64> {
        let b = self.take(8)?;
        Ok(u64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Read a little-endian f32
    pub fn get_f32(&mut self) -> Result<f32> {
        let b = self.take(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Copy `out.len()` raw bytes into `out`, verbatim
    pub fn get_bytes(&mut self, out: &mut [u8]) -> Result<()> {
        let slice = self.take(out.len())?;
        out.copy_from_slice(slice);
        Ok(())
    }
}

/// Sequential little-endian writer over a borrowed byte buffer.
///
/// Capacity is fixed at construction; there is no implicit growth.
#[derive(Debug)]
pub struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    /// Wrap a buffer with the cursor at position 0
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total buffer capacity
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Move the cursor to an absolute position
    ///
    /// Used to patch previously-written fields (payload length, CRC) once
    /// the rest of the frame is known.
    ///
    /// # Errors
    ///
    /// Returns `SeekOutOfBounds` if `pos` exceeds the buffer length.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.buf.len() {
            return Err(DsuServerError::SeekOutOfBounds {
                target: pos,
                capacity: self.buf.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Reserve `len` bytes at the cursor and advance past them
    fn claim(&mut self, len: usize) -> Result<&mut [u8]> {
        if self.buf.len() - self.pos < len {
            return Err(DsuServerError::CursorOverflow {
                offset: self.pos,
                needed: len,
                capacity: self.buf.len(),
            });
        }
        let slice = &mut self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Write a single byte
    pub fn put_u8(&mut self, value: u8) -> Result<()> {
        self.claim(1)?[0] = value;
        Ok(())
    }

    /// Write a little-endian u16
    pub fn put_u16(&mut self, value: u16) -> Result<()> {
        self.claim(2)?.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Write a little-endian u32
    pub fn put_u32(&mut self, value: u32) -> Result<()> {
        self.claim(4)?.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Write a little-endian u64
    pub fn put_u64(&mut self, value: u64) -> Result<()> {
        self.claim(8)?.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Write a little-endian f32
    pub fn put_f32(&mut self, value: f32) -> Result<()> {
        self.claim(4)?.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Write raw bytes verbatim
    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.claim(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Everything written so far, from the start of the buffer to the cursor
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// Mutable view of everything written so far
    pub fn written_mut(&mut self) -> &mut [u8] {
        &mut self.buf[..self.pos]
    }
}
