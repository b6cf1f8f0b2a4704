use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use indexmap::IndexMap;

use super::{Encode, Encoder};
use crate::codec::types::Opcode;
use crate::internal::error::{Error, Result};

fn count_to_i64(len: usize) -> Result<i64> {
    i64::try_from(len).map_err(|_| Error::IntegerOutOfRange(format!("container length {}", len)))
}

impl Encoder {
    /// Writes an array: opcode, adaptive element count, then each element.
    pub fn write_array<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        I::Item: Encode,
    {
        let items = items.into_iter();
        let count = count_to_i64(items.len())?;
        self.nested(|encoder| {
            encoder.append(&[Opcode::Array as u8])?;
            encoder.write_int(count)?;
            for item in items {
                item.encode(encoder)?;
            }
            Ok(())
        })
    }

    /// Writes an object: opcode, adaptive pair count, then each key as a
    /// string followed by its value. Pairs are written in iteration order.
    pub fn write_object<I, K, V>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: ExactSizeIterator,
        K: AsRef<[u8]>,
        V: Encode,
    {
        let fields = fields.into_iter();
        let count = count_to_i64(fields.len())?;
        self.nested(|encoder| {
            encoder.append(&[Opcode::Object as u8])?;
            encoder.write_int(count)?;
            for (key, value) in fields {
                encoder.write_string(key.as_ref())?;
                value.encode(encoder)?;
            }
            Ok(())
        })
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_array(self)
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_array(self)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_array(self)
    }
}

impl<K: AsRef<[u8]>, V: Encode, S: BuildHasher> Encode for HashMap<K, V, S> {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_object(self)
    }
}

impl<K: AsRef<[u8]>, V: Encode> Encode for BTreeMap<K, V> {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_object(self)
    }
}

impl<K: AsRef<[u8]>, V: Encode, S> Encode for IndexMap<K, V, S> {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.write_object(self)
    }
}
