// BSER PDU header: magic, version, int32 payload length

use crate::codec::width;
use crate::internal::error::{Error, Result};

/// Magic and version bytes that open every PDU.
pub const MAGIC: [u8; 2] = [0x00, 0x01];

/// Header written by the encoder before the payload length is known.
/// The length field always uses the int32 form.
pub const EMPTY_HEADER: [u8; 7] = [0x00, 0x01, 0x05, 0x00, 0x00, 0x00, 0x00];

/// Size of the header the encoder writes.
pub const HEADER_LEN: usize = EMPTY_HEADER.len();

/// Offset of the 4-byte length payload inside `EMPTY_HEADER`.
pub const LENGTH_OFFSET: usize = 3;

/// Validates the magic/version prefix and reads the payload length.
///
/// Returns the declared payload length and the number of header bytes
/// consumed. Only the header is inspected, so `data` may be a prefix of a
/// message whose body has not arrived yet.
pub fn read_header(data: &[u8]) -> Result<(i64, usize)> {
    if data.len() < MAGIC.len() {
        return Err(Error::TruncatedInput {
            offset: 0,
            needed: MAGIC.len(),
            available: data.len(),
        });
    }
    if data[..MAGIC.len()] != MAGIC {
        return Err(Error::InvalidHeader {
            found: data[..MAGIC.len()].to_vec(),
        });
    }

    let (declared, len_bytes) = width::decode_int(&data[MAGIC.len()..], MAGIC.len())?;
    if declared < 0 {
        return Err(Error::InvalidLength {
            what: "payload",
            value: declared,
        });
    }
    Ok((declared, MAGIC.len() + len_bytes))
}
