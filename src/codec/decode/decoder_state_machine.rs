// State machine for decoding nested values without recursion.
//
// Containers are tracked on an explicit frame stack, so hostile input can
// only grow a heap vector (bounded by `max_depth`), never the call stack.

use bytes::Bytes;

use super::cursor::Cursor;
use super::template::TemplateFrame;
use super::PREALLOC_LIMIT;
use crate::codec::types::{Object, Opcode, Value};
use crate::internal::error::{Error, Result};

/// What the frame on top of the stack wants next.
#[derive(Debug, PartialEq)]
enum Step {
    /// Decode one value and hand it to the frame.
    Value,
    /// The frame holds a complete container.
    Done,
}

/// A container being decoded.
#[derive(Debug)]
enum Frame {
    Array {
        items: Vec<Value>,
        remaining: usize,
    },
    Object {
        fields: Object,
        remaining: usize,
        key: Option<Bytes>,
    },
    Template(TemplateFrame),
}

impl Frame {
    fn step(&mut self, cursor: &mut Cursor<'_>) -> Result<Step> {
        match self {
            Frame::Array { remaining, .. } => {
                if *remaining == 0 {
                    return Ok(Step::Done);
                }
                *remaining -= 1;
                Ok(Step::Value)
            }
            Frame::Object { remaining, key, .. } => {
                if *remaining == 0 {
                    return Ok(Step::Done);
                }
                *key = Some(cursor.read_string()?);
                *remaining -= 1;
                Ok(Step::Value)
            }
            Frame::Template(template) => {
                if template.next_slot(cursor)? {
                    Ok(Step::Value)
                } else {
                    Ok(Step::Done)
                }
            }
        }
    }

    fn accept(&mut self, value: Value) {
        match self {
            Frame::Array { items, .. } => items.push(value),
            Frame::Object { fields, key, .. } => {
                // Duplicate keys overwrite: the last one in the stream wins.
                if let Some(key) = key.take() {
                    fields.insert(key, value);
                }
            }
            Frame::Template(template) => template.accept(value),
        }
    }

    fn finish(self) -> Value {
        match self {
            Frame::Array { items, .. } => Value::Array(items),
            Frame::Object { fields, .. } => Value::Object(fields),
            Frame::Template(template) => template.finish(),
        }
    }
}

/// Decoding context for one value.
#[derive(Debug)]
pub struct DecodeContext<'a> {
    cursor: Cursor<'a>,
    stack: Vec<Frame>,
    max_depth: usize,
}

impl<'a> DecodeContext<'a> {
    pub fn new(cursor: Cursor<'a>, max_depth: usize) -> Self {
        DecodeContext {
            cursor,
            stack: Vec::new(),
            max_depth,
        }
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// Decodes the value at the cursor, including everything nested in it.
    pub fn decode_value(&mut self) -> Result<Value> {
        loop {
            let step = match self.stack.last_mut() {
                Some(frame) => frame.step(&mut self.cursor)?,
                None => Step::Value,
            };

            let completed = match step {
                Step::Value => match self.open_value()? {
                    Some(value) => value,
                    None => continue,
                },
                Step::Done => {
                    let Some(frame) = self.stack.pop() else {
                        unreachable!("a finished frame is always on the stack")
                    };
                    log::trace!(
                        "bser: close frame at offset {}, depth {}",
                        self.cursor.position(),
                        self.stack.len()
                    );
                    frame.finish()
                }
            };

            match self.stack.last_mut() {
                Some(parent) => parent.accept(completed),
                None => return Ok(completed),
            }
        }
    }

    /// Reads a scalar, or opens a container frame and returns `None`.
    fn open_value(&mut self) -> Result<Option<Value>> {
        let offset = self.cursor.position();
        let byte = self.cursor.peek()?;
        let opcode = Opcode::from_byte(byte).ok_or(Error::InvalidOpcode {
            opcode: byte,
            offset,
            expected: "value",
        })?;

        let value = match opcode {
            Opcode::Int8 | Opcode::Int16 | Opcode::Int32 | Opcode::Int64 => {
                Value::Int(self.cursor.read_int()?)
            }
            Opcode::Real => Value::Real(self.cursor.read_real()?),
            Opcode::True => {
                self.cursor.advance(1);
                Value::Bool(true)
            }
            Opcode::False => {
                self.cursor.advance(1);
                Value::Bool(false)
            }
            Opcode::Null => {
                self.cursor.advance(1);
                Value::Null
            }
            Opcode::String => Value::Bytes(self.cursor.read_string()?),
            Opcode::Array => {
                self.cursor.advance(1);
                let count = self.read_container_count("array")?;
                self.push(opcode, Frame::Array {
                    items: Vec::with_capacity(count.min(PREALLOC_LIMIT)),
                    remaining: count,
                })?;
                return Ok(None);
            }
            Opcode::Object => {
                self.cursor.advance(1);
                let count = self.read_container_count("object")?;
                self.push(opcode, Frame::Object {
                    fields: Object::with_capacity(count.min(PREALLOC_LIMIT)),
                    remaining: count,
                    key: None,
                })?;
                return Ok(None);
            }
            Opcode::Template => {
                self.cursor.advance(1);
                let template = TemplateFrame::begin(&mut self.cursor)?;
                self.push(opcode, Frame::Template(template))?;
                return Ok(None);
            }
            Opcode::Skip => {
                return Err(Error::InvalidOpcode {
                    opcode: byte,
                    offset,
                    expected: "value",
                });
            }
        };
        Ok(Some(value))
    }

    /// Reads an element count; every element takes at least one byte, so a
    /// count above the remaining input can never be satisfied.
    fn read_container_count(&mut self, what: &'static str) -> Result<usize> {
        let count = self.cursor.read_count(what)?;
        self.cursor.require(count)?;
        Ok(count)
    }

    fn push(&mut self, opcode: Opcode, frame: Frame) -> Result<()> {
        if self.stack.len() >= self.max_depth {
            return Err(Error::NestingTooDeep { limit: self.max_depth });
        }
        self.stack.push(frame);
        log::trace!(
            "bser: open {:?} frame at offset {}, depth {}",
            opcode,
            self.cursor.position(),
            self.stack.len()
        );
        Ok(())
    }
}
