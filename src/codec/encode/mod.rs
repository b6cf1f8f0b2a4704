// Encode module for the BSER data format

pub mod basic;
pub mod complex;
pub mod dynamic;

use std::any::Any;

use crate::codec::buffer::EncodeBuffer;
use crate::codec::config::CodecConfig;
use crate::codec::types::Value;
use crate::internal::error::{Error, Result};

/// Types that can be written as a BSER value.
///
/// Host adapters implement this for their own types by calling the
/// `write_*` methods on [`Encoder`].
pub trait Encode {
    fn encode(&self, encoder: &mut Encoder) -> Result<()>;
}

/// Serializes values into a single BSER PDU.
///
/// The encoder owns its buffer; a failed encode drops it, so callers never
/// observe partially written output.
#[derive(Debug)]
pub struct Encoder {
    buf: EncodeBuffer,
    depth: usize,
    max_depth: usize,
}

impl Encoder {
    /// Creates an encoder with the placeholder header already written.
    pub fn new(config: &CodecConfig) -> Result<Self> {
        Ok(Encoder {
            buf: EncodeBuffer::new(config.initial_capacity)?,
            depth: 0,
            max_depth: config.max_depth,
        })
    }

    /// Patches the payload length into the header and returns the PDU.
    pub fn finish(self) -> Result<Vec<u8>> {
        self.buf.finish()
    }

    /// Bytes written after the header so far.
    pub fn payload_len(&self) -> usize {
        self.buf.payload_len()
    }

    pub(crate) fn append(&mut self, data: &[u8]) -> Result<()> {
        self.buf.append(data)
    }

    /// Runs `f` one container level deeper.
    pub(crate) fn nested<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if self.depth >= self.max_depth {
            return Err(Error::NestingTooDeep { limit: self.max_depth });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

impl Encode for Value {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        match self {
            Value::Null => encoder.write_null(),
            Value::Bool(v) => encoder.write_bool(*v),
            Value::Int(v) => encoder.write_int(*v),
            Value::Real(v) => encoder.write_real(*v),
            Value::Bytes(v) => encoder.write_string(v),
            Value::Array(items) => encoder.write_array(items),
            Value::Object(fields) => encoder.write_object(fields),
        }
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        (**self).encode(encoder)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        (**self).encode(encoder)
    }
}

/// Encodes `value` into a complete BSER PDU using the default configuration.
pub fn dumps<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    dumps_with_config(value, &CodecConfig::default())
}

/// Encodes `value` into a complete BSER PDU.
pub fn dumps_with_config<T: Encode + ?Sized>(value: &T, config: &CodecConfig) -> Result<Vec<u8>> {
    let mut encoder = Encoder::new(config)?;
    value.encode(&mut encoder)?;
    let out = encoder.finish()?;
    log::trace!("bser: encoded {} byte pdu", out.len());
    Ok(out)
}

/// Encodes a dynamically typed value.
///
/// Only the shapes listed in [`dynamic`] are accepted; anything else fails
/// with `Error::UnsupportedValue`.
///
/// A `Vec<u8>` passed here is written as a byte string, matching how host
/// bindings hand over raw buffers. Through [`dumps`] the same vector goes
/// through the generic `Vec<T>` impl and becomes an array of integers; wrap
/// it in `Bytes` there to get a string.
pub fn dumps_any(value: &dyn Any) -> Result<Vec<u8>> {
    let mut encoder = Encoder::new(&CodecConfig::default())?;
    encoder.write_any(value)?;
    encoder.finish()
}
