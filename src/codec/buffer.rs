use byteorder::{ByteOrder, NativeEndian};
use bytes::BufMut;

use crate::codec::header::{EMPTY_HEADER, HEADER_LEN, LENGTH_OFFSET};
use crate::internal::error::{Error, Result};

/// Capacity a fresh encode buffer starts with.
pub const INITIAL_CAPACITY: usize = 8192;

/// Append-only byte sink used while encoding.
///
/// Capacity grows to the next power of two that fits the pending append, and
/// allocation failure is reported as `Error::OutOfMemory` instead of aborting.
#[derive(Debug)]
pub struct EncodeBuffer {
    buf: Vec<u8>,
}

impl EncodeBuffer {
    /// Allocates a buffer and reserves the placeholder PDU header.
    pub fn new(initial_capacity: usize) -> Result<Self> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(initial_capacity)
            .map_err(|_| Error::OutOfMemory { requested: initial_capacity })?;
        let mut buffer = EncodeBuffer { buf };
        buffer.append(&EMPTY_HEADER)?;
        Ok(buffer)
    }

    /// Appends `data`, growing the allocation if needed.
    pub fn append(&mut self, data: &[u8]) -> Result<()> {
        let needed = self
            .buf
            .len()
            .checked_add(data.len())
            .ok_or(Error::OutOfMemory { requested: usize::MAX })?;
        if needed > self.buf.capacity() {
            let target = needed
                .checked_next_power_of_two()
                .ok_or(Error::OutOfMemory { requested: needed })?;
            self.buf
                .try_reserve_exact(target - self.buf.len())
                .map_err(|_| Error::OutOfMemory { requested: target })?;
        }
        self.buf.put_slice(data);
        Ok(())
    }

    /// Total bytes written, header included.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Bytes written after the header.
    pub fn payload_len(&self) -> usize {
        self.buf.len() - HEADER_LEN
    }

    /// Patches the header length field and hands back the encoded PDU.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let len = self.payload_len();
        let field = i32::try_from(len).map_err(|_| Error::PayloadTooLarge { len })?;
        NativeEndian::write_i32(&mut self.buf[LENGTH_OFFSET..HEADER_LEN], field);
        Ok(self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_reserves_header() {
        let buffer = EncodeBuffer::new(INITIAL_CAPACITY).unwrap();
        assert_eq!(buffer.len(), HEADER_LEN);
        assert_eq!(buffer.payload_len(), 0);
        assert!(buffer.capacity() >= INITIAL_CAPACITY);
    }

    #[test]
    fn test_append_grows_to_power_of_two() {
        let mut buffer = EncodeBuffer::new(16).unwrap();
        buffer.append(&[0xaa; 9]).unwrap();
        assert_eq!(buffer.len(), 16);

        buffer.append(&[0xbb; 1]).unwrap();
        assert_eq!(buffer.len(), 17);
        assert!(buffer.capacity() >= 32);

        buffer.append(&[0xcc; 100]).unwrap();
        assert_eq!(buffer.len(), 117);
        assert!(buffer.capacity() >= 128);
    }

    #[test]
    fn test_finish_patches_length() {
        let mut buffer = EncodeBuffer::new(INITIAL_CAPACITY).unwrap();
        buffer.append(&[0x0a, 0x0a, 0x0a]).unwrap();
        let out = buffer.finish().unwrap();

        assert_eq!(&out[..3], &[0x00, 0x01, 0x05]);
        assert_eq!(&out[3..7], &3i32.to_ne_bytes());
        assert_eq!(&out[7..], &[0x0a, 0x0a, 0x0a]);
    }

    #[test]
    fn test_out_of_memory_is_an_error() {
        let result = EncodeBuffer::new(usize::MAX);
        assert!(matches!(result, Err(Error::OutOfMemory { .. })));
    }
}
