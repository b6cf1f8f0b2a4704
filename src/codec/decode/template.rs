// Template arrays: a shared key list followed by per-row value slots.
//
// Layout after the TEMPLATE opcode:
//   ARRAY <count> STRING... (the template keys)
//   <int> (number of rows)
//   per row, per key: SKIP or an encoded value

use bytes::Bytes;

use super::cursor::Cursor;
use super::PREALLOC_LIMIT;
use crate::codec::types::{Object, Opcode, Value};
use crate::internal::error::{Error, Result};

/// Decoding progress through one template array.
#[derive(Debug)]
pub struct TemplateFrame {
    keys: Vec<Bytes>,
    rows: Vec<Value>,
    rows_left: usize,
    row: Option<Object>,
    slot: usize,
}

impl TemplateFrame {
    /// Reads the key list and row count. The cursor must sit just past the
    /// TEMPLATE opcode.
    pub fn begin(cursor: &mut Cursor<'_>) -> Result<Self> {
        let next = cursor.peek()?;
        if next != Opcode::Array as u8 {
            return Err(Error::MalformedTemplate { found: next });
        }
        cursor.advance(1);

        let key_count = cursor.read_count("template key array")?;
        cursor.require(key_count)?;
        let mut keys = Vec::with_capacity(key_count.min(PREALLOC_LIMIT));
        for _ in 0..key_count {
            keys.push(cursor.read_string()?);
        }

        let rows_left = cursor.read_count("template")?;
        let rows = if keys.is_empty() {
            // Keyless rows occupy no input, so the whole result is reserved
            // here and an impossible count fails as an allocation error.
            let mut rows = Vec::new();
            rows.try_reserve_exact(rows_left)
                .map_err(|_| Error::OutOfMemory {
                    requested: rows_left.saturating_mul(std::mem::size_of::<Value>()),
                })?;
            rows
        } else {
            // Every row needs at least one byte per key.
            cursor.require(rows_left.saturating_mul(keys.len()))?;
            Vec::with_capacity(rows_left.min(PREALLOC_LIMIT))
        };

        Ok(TemplateFrame {
            keys,
            rows,
            rows_left,
            row: None,
            slot: 0,
        })
    }

    /// Moves past skip markers and finished rows.
    ///
    /// Returns `true` when the next bytes hold the value for the current
    /// slot, `false` once every row has been read.
    pub fn next_slot(&mut self, cursor: &mut Cursor<'_>) -> Result<bool> {
        loop {
            if self.row.is_none() {
                if self.rows_left == 0 {
                    return Ok(false);
                }
                self.rows_left -= 1;
                self.slot = 0;
                self.row = Some(Object::with_capacity(self.keys.len()));
            } else if self.slot == self.keys.len() {
                if let Some(row) = self.row.take() {
                    self.rows.push(Value::Object(row));
                }
            } else if cursor.peek()? == Opcode::Skip as u8 {
                cursor.advance(1);
                self.slot += 1;
            } else {
                return Ok(true);
            }
        }
    }

    /// Stores the value decoded for the current slot.
    pub fn accept(&mut self, value: Value) {
        if let Some(row) = self.row.as_mut() {
            row.insert(self.keys[self.slot].clone(), value);
        }
        self.slot += 1;
    }

    pub fn finish(self) -> Value {
        Value::Array(self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_header(keys: &[&str], rows: u8) -> Vec<u8> {
        let mut data = vec![0x00, 0x03, keys.len() as u8];
        for key in keys {
            data.extend_from_slice(&[0x02, 0x03, key.len() as u8]);
            data.extend_from_slice(key.as_bytes());
        }
        data.extend_from_slice(&[0x03, rows]);
        data
    }

    #[test]
    fn test_begin_reads_keys_and_count() {
        let mut data = template_header(&["a", "bc"], 1);
        data.extend_from_slice(&[0x0c, 0x0c]);
        let mut cursor = Cursor::new(&data);
        let frame = TemplateFrame::begin(&mut cursor).unwrap();

        assert_eq!(frame.keys, vec![Bytes::from_static(b"a"), Bytes::from_static(b"bc")]);
        assert_eq!(frame.rows_left, 1);
        assert_eq!(cursor.remaining(), 2);
    }

    #[test]
    fn test_begin_requires_array() {
        let data = [0x02, 0x03, 0x01, b'a'];
        let mut cursor = Cursor::new(&data);
        assert!(matches!(
            TemplateFrame::begin(&mut cursor),
            Err(Error::MalformedTemplate { found: 0x02 })
        ));
    }

    #[test]
    fn test_slots_and_skips() {
        let mut data = template_header(&["a", "b"], 2);
        data.extend_from_slice(&[0x03, 0x01, 0x0c, 0x0c, 0x03, 0x02]);
        let mut cursor = Cursor::new(&data);
        let mut frame = TemplateFrame::begin(&mut cursor).unwrap();

        assert!(frame.next_slot(&mut cursor).unwrap());
        frame.accept(Value::Int(cursor.read_int().unwrap()));
        assert!(frame.next_slot(&mut cursor).unwrap());
        frame.accept(Value::Int(cursor.read_int().unwrap()));
        assert!(!frame.next_slot(&mut cursor).unwrap());

        let rows = frame.finish();
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("a"), Some(&Value::Int(1)));
        assert_eq!(rows[0].get("b"), None);
        assert_eq!(rows[1].get("a"), None);
        assert_eq!(rows[1].get("b"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_truncated_rows() {
        let mut data = template_header(&["a"], 3);
        data.extend_from_slice(&[0x0c]);
        let mut cursor = Cursor::new(&data);
        assert!(matches!(
            TemplateFrame::begin(&mut cursor),
            Err(Error::TruncatedInput { needed: 3, available: 1, .. })
        ));
    }

    #[test]
    fn test_keyless_rows_read_no_input() {
        let data = template_header(&[], 3);
        let mut cursor = Cursor::new(&data);
        let mut frame = TemplateFrame::begin(&mut cursor).unwrap();

        assert!(!frame.next_slot(&mut cursor).unwrap());
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(frame.finish(), Value::Array(vec![Value::Object(Object::new()); 3]));
    }

    #[test]
    fn test_keyless_impossible_row_count() {
        let mut data = vec![0x00, 0x03, 0x00, 0x06];
        data.extend_from_slice(&i64::MAX.to_ne_bytes());
        let mut cursor = Cursor::new(&data);
        assert!(matches!(
            TemplateFrame::begin(&mut cursor),
            Err(Error::OutOfMemory { .. })
        ));
    }

    #[test]
    fn test_row_reservation_is_capped() {
        let mut data = vec![0x00, 0x03, 0x01, 0x02, 0x03, 0x01, b'a', 0x04];
        data.extend_from_slice(&5000i16.to_ne_bytes());
        data.resize(data.len() + 5000, 0x0c);
        let mut cursor = Cursor::new(&data);
        let frame = TemplateFrame::begin(&mut cursor).unwrap();

        assert_eq!(frame.rows_left, 5000);
        assert!(frame.rows.capacity() < 5000);
    }
}
