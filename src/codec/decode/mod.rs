// Decode module for the BSER data format

pub mod cursor;
pub mod decoder_state_machine;
pub mod template;

use bytes::Bytes;

use crate::codec::config::CodecConfig;
use crate::codec::header;
use crate::codec::types::Value;
use crate::internal::error::{Error, Result};
use cursor::Cursor;
use decoder_state_machine::DecodeContext;

/// Upper bound on elements reserved up front for a decoded container.
/// Declared counts come from the input, so containers grow past this only as
/// their elements actually arrive.
const PREALLOC_LIMIT: usize = 1024;

/// Decodes a complete BSER PDU using the default configuration.
///
/// String payloads are copied out of `data`; see [`loads_bytes`] for a
/// zero-copy variant.
pub fn loads(data: &[u8]) -> Result<Value> {
    loads_with_config(data, &CodecConfig::default())
}

pub fn loads_with_config(data: &[u8], config: &CodecConfig) -> Result<Value> {
    decode_pdu(Cursor::new(data), data, config)
}

/// Decodes a complete BSER PDU, slicing string payloads out of `data`
/// without copying.
pub fn loads_bytes(data: &Bytes) -> Result<Value> {
    loads_bytes_with_config(data, &CodecConfig::default())
}

pub fn loads_bytes_with_config(data: &Bytes, config: &CodecConfig) -> Result<Value> {
    decode_pdu(Cursor::from_bytes(data), data, config)
}

fn decode_pdu(mut cursor: Cursor<'_>, data: &[u8], config: &CodecConfig) -> Result<Value> {
    let result = header::read_header(data).and_then(|(declared, consumed)| {
        let actual = data.len() - consumed;
        if usize::try_from(declared).ok() != Some(actual) {
            return Err(Error::LengthMismatch { declared, actual });
        }
        cursor.advance(consumed);

        // Bytes after the value but inside the declared payload are ignored.
        DecodeContext::new(cursor, config.max_depth).decode_value()
    });

    match &result {
        Ok(_) => log::trace!("bser: decoded {} byte pdu", data.len()),
        Err(err) => log::debug!("bser: failed to decode {} byte pdu: {}", data.len(), err),
    }
    result
}
