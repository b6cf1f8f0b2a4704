use byteorder::{ByteOrder, NativeEndian};

use crate::codec::types::Opcode;
use crate::internal::error::{Error, Result};

/// Longest encoded integer: opcode byte plus an 8-byte payload.
pub const MAX_INT_ENCODED_LEN: usize = 9;

/// The four wire widths an integer can take.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum IntWidth {
    W1,
    W2,
    W4,
    W8,
}

impl IntWidth {
    /// Returns the smallest width whose sign extension gives back `value`.
    pub fn choose(value: i64) -> Self {
        if value == value as i8 as i64 {
            IntWidth::W1
        } else if value == value as i16 as i64 {
            IntWidth::W2
        } else if value == value as i32 as i64 {
            IntWidth::W4
        } else {
            IntWidth::W8
        }
    }

    /// Payload size in bytes, excluding the opcode.
    pub fn size(self) -> usize {
        match self {
            IntWidth::W1 => 1,
            IntWidth::W2 => 2,
            IntWidth::W4 => 4,
            IntWidth::W8 => 8,
        }
    }

    pub fn opcode(self) -> Opcode {
        match self {
            IntWidth::W1 => Opcode::Int8,
            IntWidth::W2 => Opcode::Int16,
            IntWidth::W4 => Opcode::Int32,
            IntWidth::W8 => Opcode::Int64,
        }
    }

    pub fn from_opcode(byte: u8) -> Option<Self> {
        match Opcode::from_byte(byte)? {
            Opcode::Int8 => Some(IntWidth::W1),
            Opcode::Int16 => Some(IntWidth::W2),
            Opcode::Int32 => Some(IntWidth::W4),
            Opcode::Int64 => Some(IntWidth::W8),
            _ => None,
        }
    }
}

/// Pure width selection, in bytes: 1, 2, 4 or 8.
pub fn choose_width(value: i64) -> usize {
    IntWidth::choose(value).size()
}

/// Encodes `value` as opcode + narrowest payload in native byte order.
/// Returns a scratch array and the number of bytes of it that are used.
pub fn encode_int(value: i64) -> ([u8; MAX_INT_ENCODED_LEN], usize) {
    let width = IntWidth::choose(value);
    let mut buf = [0u8; MAX_INT_ENCODED_LEN];
    buf[0] = width.opcode() as u8;
    match width {
        IntWidth::W1 => buf[1] = value as i8 as u8,
        IntWidth::W2 => NativeEndian::write_i16(&mut buf[1..3], value as i16),
        IntWidth::W4 => NativeEndian::write_i32(&mut buf[1..5], value as i32),
        IntWidth::W8 => NativeEndian::write_i64(&mut buf[1..9], value),
    }
    (buf, 1 + width.size())
}

/// Decodes an integer (opcode + payload) from the start of `data`.
/// Returns the sign-extended value and the number of bytes read.
///
/// `offset` is the position of `data` within the whole message and is only
/// used for error reporting.
pub fn decode_int(data: &[u8], offset: usize) -> Result<(i64, usize)> {
    let opcode = *data.first().ok_or(Error::TruncatedInput {
        offset,
        needed: 1,
        available: 0,
    })?;
    let width = IntWidth::from_opcode(opcode).ok_or(Error::InvalidOpcode {
        opcode,
        offset,
        expected: "int",
    })?;

    let needed = 1 + width.size();
    if data.len() < needed {
        return Err(Error::TruncatedInput {
            offset,
            needed,
            available: data.len(),
        });
    }

    let payload = &data[1..needed];
    let value = match width {
        IntWidth::W1 => payload[0] as i8 as i64,
        IntWidth::W2 => NativeEndian::read_i16(payload) as i64,
        IntWidth::W4 => NativeEndian::read_i32(payload) as i64,
        IntWidth::W8 => NativeEndian::read_i64(payload),
    };
    Ok((value, needed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_width_boundaries() {
        assert_eq!(choose_width(0), 1);
        assert_eq!(choose_width(127), 1);
        assert_eq!(choose_width(-128), 1);
        assert_eq!(choose_width(-1), 1);
        assert_eq!(choose_width(128), 2);
        assert_eq!(choose_width(-129), 2);
        assert_eq!(choose_width(32767), 2);
        assert_eq!(choose_width(32768), 4);
        assert_eq!(choose_width(-32769), 4);
        assert_eq!(choose_width(2147483647), 4);
        assert_eq!(choose_width(2147483648), 8);
        assert_eq!(choose_width(i64::MIN), 8);
        assert_eq!(choose_width(i64::MAX), 8);
    }

    #[test]
    fn test_encode_int() {
        let (buf, len) = encode_int(-1);
        assert_eq!(&buf[..len], &[0x03, 0xff]);

        let (buf, len) = encode_int(300);
        assert_eq!(buf[0], 0x04);
        assert_eq!(&buf[1..len], &300i16.to_ne_bytes());

        let (buf, len) = encode_int(70000);
        assert_eq!(buf[0], 0x05);
        assert_eq!(&buf[1..len], &70000i32.to_ne_bytes());

        let (buf, len) = encode_int(i64::MIN);
        assert_eq!(buf[0], 0x06);
        assert_eq!(&buf[1..len], &i64::MIN.to_ne_bytes());
    }

    #[test]
    fn test_decode_int() {
        for value in [0, -1, 127, -128, 128, 32767, -32768, 65536, i32::MIN as i64, i64::MAX] {
            let (buf, len) = encode_int(value);
            assert_eq!(decode_int(&buf[..len], 0).unwrap(), (value, len));
        }

        // Sign extension of a non-minimal encoding.
        let mut data = vec![0x05];
        data.extend_from_slice(&(-2i32).to_ne_bytes());
        assert_eq!(decode_int(&data, 0).unwrap(), (-2, 5));
    }

    #[test]
    fn test_decode_int_errors() {
        let result = decode_int(&[], 4);
        assert!(matches!(result, Err(Error::TruncatedInput { offset: 4, needed: 1, available: 0 })));

        let result = decode_int(&[0x05, 0x01, 0x02], 0);
        assert!(matches!(result, Err(Error::TruncatedInput { needed: 5, available: 3, .. })));

        let result = decode_int(&[0x02, 0x01], 9);
        assert!(matches!(
            result,
            Err(Error::InvalidOpcode { opcode: 0x02, offset: 9, expected: "int" })
        ));
    }
}
