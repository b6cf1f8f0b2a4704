// Lossy text transcoding.
//
// Text headed for the wire is converted to UTF-8 and anything that cannot be
// encoded is dropped silently. This matches what existing peers produce and is
// never an error path.

use bytes::Bytes;

/// Keeps the valid UTF-8 runs of `data` and drops every invalid sequence.
pub fn utf8_lossy_drop(data: &[u8]) -> Bytes {
    if std::str::from_utf8(data).is_ok() {
        return Bytes::copy_from_slice(data);
    }
    let mut out = Vec::with_capacity(data.len());
    for chunk in data.utf8_chunks() {
        out.extend_from_slice(chunk.valid().as_bytes());
    }
    Bytes::from(out)
}

/// Transcodes UTF-16 to UTF-8, dropping unpaired surrogates.
pub fn utf16_lossy_drop(units: &[u16]) -> Bytes {
    let text: String = char::decode_utf16(units.iter().copied())
        .filter_map(|c| c.ok())
        .collect();
    Bytes::from(text)
}
