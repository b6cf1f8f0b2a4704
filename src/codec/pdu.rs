use crate::codec::header;
use crate::internal::error::{Error, Result};

/// Returns the total size in bytes (header included) of the PDU that
/// starts at `data`.
///
/// Only the header is read, so `data` may hold just the first few bytes of a
/// message. A stream consumer reads until it has this many bytes and then
/// hands the buffer to `loads`. Fails with `TruncatedInput` when even the
/// header is incomplete (see `Error::is_incomplete`).
pub fn pdu_len(data: &[u8]) -> Result<usize> {
    let (declared, consumed) = header::read_header(data)?;
    usize::try_from(declared)
        .ok()
        .and_then(|len| len.checked_add(consumed))
        .ok_or(Error::InvalidLength { what: "payload", value: declared })
}
