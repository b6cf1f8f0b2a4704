// Encoding of dynamically typed values.
//
// Host bindings hand the codec values whose type is only known at runtime.
// The accepted shapes are:
//
//   Value, Box<dyn Any>, (), bool, every primitive integer, f32, f64,
//   String, &'static str, Bytes, Vec<u8> (byte string),
//   Option<Box<dyn Any>>, Vec<Box<dyn Any>>,
//   HashMap / BTreeMap / IndexMap<String, Box<dyn Any>>
//
// Anything else is rejected with `Error::UnsupportedValue`; no coercion is
// attempted.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;
use indexmap::IndexMap;

use super::{Encode, Encoder};
use crate::codec::types::Value;
use crate::internal::error::{Error, Result};

type AnyBox = Box<dyn Any>;

/// Wrapper that lets dynamic elements flow through `write_array`/`write_object`.
struct Dyn<'a>(&'a dyn Any);

impl Encode for Dyn<'_> {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_any(self.0)
    }
}

macro_rules! try_encode_as {
    ($encoder:expr, $value:expr, $($ty:ty),*) => {
        $(
            if let Some(v) = $value.downcast_ref::<$ty>() {
                return v.encode($encoder);
            }
        )*
    };
}

impl Encoder {
    /// Encodes a value whose concrete type is only known at runtime.
    pub fn write_any(&mut self, value: &dyn Any) -> Result<()> {
        try_encode_as!(
            self, value, Value, (), bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64,
            u128, usize, f32, f64, String, &'static str, Bytes
        );

        if let Some(v) = value.downcast_ref::<AnyBox>() {
            return self.write_any(&**v);
        }
        if let Some(v) = value.downcast_ref::<Vec<u8>>() {
            return self.write_string(v);
        }
        if let Some(v) = value.downcast_ref::<Option<AnyBox>>() {
            return match v {
                Some(inner) => self.write_any(&**inner),
                None => self.write_null(),
            };
        }
        if let Some(v) = value.downcast_ref::<Vec<AnyBox>>() {
            return self.write_array(v.iter().map(|item| Dyn(&**item)));
        }
        if let Some(v) = value.downcast_ref::<HashMap<String, AnyBox>>() {
            return self.write_object(v.iter().map(|(k, item)| (k, Dyn(&**item))));
        }
        if let Some(v) = value.downcast_ref::<BTreeMap<String, AnyBox>>() {
            return self.write_object(v.iter().map(|(k, item)| (k, Dyn(&**item))));
        }
        if let Some(v) = value.downcast_ref::<IndexMap<String, AnyBox>>() {
            return self.write_object(v.iter().map(|(k, item)| (k, Dyn(&**item))));
        }

        Err(Error::UnsupportedValue(format!("{:?}", value.type_id())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode::loads;
    use crate::codec::encode::{dumps, dumps_any};

    #[test]
    fn test_dynamic_scalars_match_static() {
        assert_eq!(dumps_any(&42i64).unwrap(), dumps(&42i64).unwrap());
        assert_eq!(dumps_any(&String::from("hi")).unwrap(), dumps("hi").unwrap());
        assert_eq!(dumps_any(&"hi").unwrap(), dumps("hi").unwrap());
        assert_eq!(dumps_any(&Value::Null).unwrap(), dumps(&()).unwrap());
        assert_eq!(dumps_any(&vec![1u8, 2u8]).unwrap(), dumps(&Bytes::from_static(&[1, 2])).unwrap());
    }

    #[test]
    fn test_dynamic_containers() {
        let mut fields: BTreeMap<String, AnyBox> = BTreeMap::new();
        fields.insert("name".to_string(), Box::new(String::from("root")));
        fields.insert("size".to_string(), Box::new(4096u32));
        fields.insert("parent".to_string(), Box::new(None::<AnyBox>));
        let items: Vec<AnyBox> = vec![Box::new(true), Box::new(fields)];

        let decoded = loads(&dumps_any(&items).unwrap()).unwrap();
        let array = decoded.as_array().unwrap();
        assert_eq!(array[0], Value::Bool(true));
        assert_eq!(array[1].get("name").and_then(Value::as_str), Some("root"));
        assert_eq!(array[1].get("size"), Some(&Value::Int(4096)));
        assert_eq!(array[1].get("parent"), Some(&Value::Null));
    }

    #[test]
    fn test_unsupported_value() {
        struct Handle;

        let result = dumps_any(&Handle);
        assert!(matches!(result, Err(Error::UnsupportedValue(_))));

        // Nested unsupported values fail the whole call.
        let items: Vec<AnyBox> = vec![Box::new(1i32), Box::new(Handle)];
        assert!(matches!(dumps_any(&items), Err(Error::UnsupportedValue(_))));
    }
}
