use bytes::Bytes;
use indexmap::IndexMap;

use crate::codec::text;

/// Key-ordered mapping used for BSER objects.
///
/// Insertion order is kept; inserting an existing key replaces the value in
/// place, which gives decoded objects last-write-wins semantics.
pub type Object = IndexMap<Bytes, Value>;

/// A single BSER value.
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    Bytes(Bytes),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    /// Returns the opcode this value is introduced by on the wire.
    ///
    /// Integers report the opcode of their narrowest encoding.
    pub fn opcode(&self) -> Opcode {
        match self {
            Value::Null => Opcode::Null,
            Value::Bool(true) => Opcode::True,
            Value::Bool(false) => Opcode::False,
            Value::Int(v) => crate::codec::width::IntWidth::choose(*v).opcode(),
            Value::Real(_) => Opcode::Real,
            Value::Bytes(_) => Opcode::String,
            Value::Array(_) => Opcode::Array,
            Value::Object(_) => Opcode::Object,
        }
    }

    /// Builds a byte-string value from text, dropping any bytes that are not
    /// valid UTF-8.
    pub fn text_lossy(data: &[u8]) -> Self {
        Value::Bytes(text::utf8_lossy_drop(data))
    }

    /// Builds a byte-string value from UTF-16 text, dropping unpaired
    /// surrogates.
    pub fn from_utf16_lossy(units: &[u16]) -> Self {
        Value::Bytes(text::utf16_lossy_drop(units))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the payload as `&str` if it is a byte string holding valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Looks up `key` when this value is an object.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(key.as_ref()))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Real(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Bytes(Bytes::copy_from_slice(v.as_bytes()))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Bytes(Bytes::from(v))
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl<K: AsRef<[u8]>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Object(
            iter.into_iter()
                .map(|(k, v)| (Bytes::copy_from_slice(k.as_ref()), v))
                .collect(),
        )
    }
}

/// The BSER opcode table.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Opcode {
    Array = 0x00,
    Object = 0x01,
    String = 0x02,
    Int8 = 0x03,
    Int16 = 0x04,
    Int32 = 0x05,
    Int64 = 0x06,
    Real = 0x07,
    True = 0x08,
    False = 0x09,
    Null = 0x0a,
    Template = 0x0b,
    Skip = 0x0c,
}

impl Opcode {
    /// Converts a byte into an Opcode.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Opcode::Array),
            0x01 => Some(Opcode::Object),
            0x02 => Some(Opcode::String),
            0x03 => Some(Opcode::Int8),
            0x04 => Some(Opcode::Int16),
            0x05 => Some(Opcode::Int32),
            0x06 => Some(Opcode::Int64),
            0x07 => Some(Opcode::Real),
            0x08 => Some(Opcode::True),
            0x09 => Some(Opcode::False),
            0x0a => Some(Opcode::Null),
            0x0b => Some(Opcode::Template),
            0x0c => Some(Opcode::Skip),
            _ => None,
        }
    }
}
