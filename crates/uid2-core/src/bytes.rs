//! Big-endian reader/writer over contiguous byte buffers.
//!
//! Every integer on the UID2 wire is big-endian; the reader hands out
//! borrowed subslices so nested envelope interiors can be passed to the
//! cipher layer without copying.

use thiserror::Error;

/// A read ran past the end of the buffer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("read past end of buffer")]
pub struct ReadError;

/// Cursor over a borrowed buffer, reading big-endian fields.
#[derive(Debug, Clone)]
pub struct BigEndianReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BigEndianReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        let byte = *self.buf.get(self.pos).ok_or(ReadError)?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_i32(&mut self) -> Result<i32, ReadError> {
        let bytes = self.read_bytes(4)?;
        Ok(i32::from_be_bytes(
            bytes.try_into().expect("slice is exactly 4 bytes"),
        ))
    }

    pub fn read_i64(&mut self) -> Result<i64, ReadError> {
        let bytes = self.read_bytes(8)?;
        Ok(i64::from_be_bytes(
            bytes.try_into().expect("slice is exactly 8 bytes"),
        ))
    }

    /// Borrow exactly `n` bytes and advance the cursor.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ReadError> {
        let end = self.pos.checked_add(n).ok_or(ReadError)?;
        let slice = self.buf.get(self.pos..end).ok_or(ReadError)?;
        self.pos = end;
        Ok(slice)
    }

    /// Borrow everything from the cursor to the end of the buffer.
    pub fn remaining(&mut self) -> &'a [u8] {
        let slice = &self.buf[self.pos..];
        self.pos = self.buf.len();
        slice
    }
}

/// Growable buffer writing big-endian fields; mirrors the reader.
#[derive(Debug, Default)]
pub struct BigEndianWriter {
    buf: Vec<u8>,
}

impl BigEndianWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}
