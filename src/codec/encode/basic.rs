use byteorder::{ByteOrder, NativeEndian};
use bytes::Bytes;

use super::{Encode, Encoder};
use crate::codec::types::Opcode;
use crate::codec::width;
use crate::internal::error::{Error, Result};

impl Encoder {
    pub fn write_null(&mut self) -> Result<()> {
        self.append(&[Opcode::Null as u8])
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        let opcode = if value { Opcode::True } else { Opcode::False };
        self.append(&[opcode as u8])
    }

    /// Writes an integer in the narrowest of the four widths.
    pub fn write_int(&mut self, value: i64) -> Result<()> {
        let (buf, len) = width::encode_int(value);
        self.append(&buf[..len])
    }

    pub fn write_real(&mut self, value: f64) -> Result<()> {
        let mut buf = [0u8; 9];
        buf[0] = Opcode::Real as u8;
        NativeEndian::write_f64(&mut buf[1..], value);
        self.append(&buf)
    }

    /// Writes a byte string: opcode, adaptive length, raw bytes.
    pub fn write_string(&mut self, data: &[u8]) -> Result<()> {
        let len = i64::try_from(data.len())
            .map_err(|_| Error::IntegerOutOfRange(format!("string length {}", data.len())))?;
        self.append(&[Opcode::String as u8])?;
        self.write_int(len)?;
        self.append(data)
    }
}

impl Encode for bool {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_bool(*self)
    }
}

impl Encode for () {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_null()
    }
}

macro_rules! impl_encode_int {
    ($($ty:ty),*) => {
        $(
            impl Encode for $ty {
                fn encode(&self, encoder: &mut Encoder) -> Result<()> {
                    encoder.write_int(i64::from(*self))
                }
            }
        )*
    };
}

macro_rules! impl_encode_wide_int {
    ($($ty:ty),*) => {
        $(
            impl Encode for $ty {
                fn encode(&self, encoder: &mut Encoder) -> Result<()> {
                    let value = i64::try_from(*self)
                        .map_err(|_| Error::IntegerOutOfRange(self.to_string()))?;
                    encoder.write_int(value)
                }
            }
        )*
    };
}

impl_encode_int!(i8, i16, i32, i64, u8, u16, u32);
impl_encode_wide_int!(u64, usize, isize, i128, u128);

impl Encode for f64 {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_real(*self)
    }
}

impl Encode for f32 {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_real(f64::from(*self))
    }
}

impl Encode for str {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_string(self.as_bytes())
    }
}

impl Encode for String {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_string(self.as_bytes())
    }
}

impl Encode for Bytes {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_string(self)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        match self {
            Some(v) => v.encode(encoder),
            None => encoder.write_null(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::codec::encode::dumps;
    use crate::internal::error::Error;

    fn payload<T: super::Encode + ?Sized>(value: &T) -> Vec<u8> {
        dumps(value).unwrap()[7..].to_vec()
    }

    #[test]
    fn test_minimal_width_integers() {
        // opcode + payload
        assert_eq!(payload(&127i64).len(), 2);
        assert_eq!(payload(&128i64).len(), 3);
        assert_eq!(payload(&32767i64).len(), 3);
        assert_eq!(payload(&32768i64).len(), 5);
        assert_eq!(payload(&2147483647i64).len(), 5);
        assert_eq!(payload(&2147483648i64).len(), 9);
        assert_eq!(payload(&-1i64).len(), 2);

        assert_eq!(payload(&127i64)[0], 0x03);
        assert_eq!(payload(&128i64)[0], 0x04);
        assert_eq!(payload(&32768i64)[0], 0x05);
        assert_eq!(payload(&2147483648i64)[0], 0x06);
        assert_eq!(payload(&-1i64), vec![0x03, 0xff]);
    }

    #[test]
    fn test_unsigned_out_of_range() {
        assert_eq!(payload(&(i64::MAX as u64))[0], 0x06);
        let result = dumps(&u64::MAX);
        assert!(matches!(result, Err(Error::IntegerOutOfRange(_))));
    }

    #[test]
    fn test_strings() {
        assert_eq!(payload("abc"), vec![0x02, 0x03, 0x03, b'a', b'b', b'c']);
        assert_eq!(payload(&String::new()), vec![0x02, 0x03, 0x00]);

        let long = "x".repeat(200);
        let encoded = payload(long.as_str());
        assert_eq!(&encoded[..2], &[0x02, 0x04]);
        assert_eq!(&encoded[2..4], &200i16.to_ne_bytes());
        assert_eq!(encoded.len(), 4 + 200);
    }

    #[test]
    fn test_option_and_unit() {
        assert_eq!(payload(&None::<i32>), vec![0x0a]);
        assert_eq!(payload(&Some(5i32)), vec![0x03, 0x05]);
        assert_eq!(payload(&()), vec![0x0a]);
        assert_eq!(payload(&2.0f32)[0], 0x07);
    }
}
