use byteorder::{ByteOrder, NativeEndian};
use bytes::Bytes;

use crate::codec::types::Opcode;
use crate::codec::width;
use crate::internal::error::{Error, Result};

/// Read position over a caller-owned byte slice.
///
/// Every read is bounds-checked against the end of the slice before any
/// indexing happens. When the input is a `Bytes`, string payloads are sliced
/// out of it instead of copied.
#[derive(Debug)]
pub struct Cursor<'a> {
    data: &'a [u8],
    owner: Option<&'a Bytes>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Cursor { data, owner: None, pos: 0 }
    }

    pub fn from_bytes(data: &'a Bytes) -> Self {
        Cursor { data: data.as_ref(), owner: Some(data), pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Fails unless at least `needed` bytes remain.
    pub fn require(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(Error::TruncatedInput {
                offset: self.pos,
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Returns the next byte without consuming it.
    pub fn peek(&self) -> Result<u8> {
        self.require(1)?;
        Ok(self.data[self.pos])
    }

    /// Consumes an opcode that carries no payload.
    pub fn expect(&mut self, opcode: Opcode, expected: &'static str) -> Result<()> {
        let byte = self.peek()?;
        if byte != opcode as u8 {
            return Err(Error::InvalidOpcode { opcode: byte, offset: self.pos, expected });
        }
        self.pos += 1;
        Ok(())
    }

    /// Reads an adaptive-width integer.
    pub fn read_int(&mut self) -> Result<i64> {
        let (value, len) = width::decode_int(&self.data[self.pos..], self.pos)?;
        self.pos += len;
        Ok(value)
    }

    /// Reads an adaptive-width count that must not be negative.
    pub fn read_count(&mut self, what: &'static str) -> Result<usize> {
        let value = self.read_int()?;
        usize::try_from(value).map_err(|_| Error::InvalidLength { what, value })
    }

    /// Reads a REAL opcode and its 8-byte payload.
    pub fn read_real(&mut self) -> Result<f64> {
        self.require(9)?;
        let value = NativeEndian::read_f64(&self.data[self.pos + 1..self.pos + 9]);
        self.pos += 9;
        Ok(value)
    }

    /// Reads a STRING opcode, its length and payload.
    pub fn read_string(&mut self) -> Result<Bytes> {
        self.expect(Opcode::String, "string")?;
        let len = self.read_count("string")?;
        self.require(len)?;
        let start = self.pos;
        self.pos += len;
        Ok(match self.owner {
            Some(owner) => owner.slice(start..self.pos),
            None => Bytes::copy_from_slice(&self.data[start..self.pos]),
        })
    }
}
