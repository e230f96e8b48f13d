//! Structural serializer
//!
//! Walks a [`Value`] depth-first, writing one type tag per value. Strings are
//! interned into the string database and written as references unless the
//! options ask for plain text. Composites that are structurally equal to one
//! already written become back-references unless the options ask for plain
//! objects.

use std::collections::BTreeMap;

use ahash::AHashMap;
use tinypack_format::constants::*;
use tinypack_format::varint::{write_uleb128, write_zigzag_i64};
use tinypack_format::{Limits, Result, StringDatabase, Value};

use crate::leaf::{encode_leaf, SharedCodec};
use crate::options::SerializeOptions;

/// Output of one [`serialize`] call
#[derive(Debug, Clone)]
pub struct Serialized {
    /// Encoded value
    pub bytes: Vec<u8>,
    /// Strings extracted while encoding, seeded from the options if given
    pub string_database: StringDatabase,
}

/// Serialize `value`, returning its bytes and the string database it produced
pub fn serialize(value: &Value, opts: &SerializeOptions) -> Result<Serialized> {
    let mut writer = ValueWriter::new(opts);
    writer.write_value(value, 0)?;

    Ok(Serialized {
        bytes: writer.buf,
        string_database: writer.strings,
    })
}

/// Serialize a string database as an array of inline strings
pub fn serialize_strings(db: &StringDatabase, opts: &SerializeOptions) -> Result<Vec<u8>> {
    let value = Value::Array(db.iter().map(Value::from).collect());
    let plain = SerializeOptions {
        plain_text: true,
        ..opts.clone()
    };
    serialize(&value, &plain).map(|out| out.bytes)
}

/// Structural identity of a value
///
/// Composites are described by the ids of their children, so equal subtrees
/// get equal ids without re-encoding anything below them.
#[derive(Debug, PartialEq, Eq, Hash)]
enum Shape {
    Scalar(Vec<u8>),
    Str(String),
    Leaf(u64, Vec<u8>),
    Array(Vec<u64>),
    Object(Vec<(u64, u64)>),
}

struct ValueWriter<'a> {
    codecs: &'a [SharedCodec],
    plain_text: bool,
    plain_object: bool,
    max_depth: usize,
    buf: Vec<u8>,
    strings: StringDatabase,
    /// Id of every distinct shape seen so far
    shapes: AHashMap<Shape, u64>,
    /// Object table index of each composite shape written inline
    objects: AHashMap<u64, u64>,
}

impl<'a> ValueWriter<'a> {
    fn new(opts: &'a SerializeOptions) -> Self {
        Self {
            codecs: &opts.serializers,
            plain_text: opts.plain_text,
            plain_object: opts.plain_object,
            max_depth: opts.max_depth,
            buf: Vec::new(),
            strings: opts.string_database.clone().unwrap_or_default(),
            shapes: AHashMap::new(),
            objects: AHashMap::new(),
        }
    }

    /// Write one value; returns its shape id unless composites are written plain
    fn write_value(&mut self, value: &Value, depth: usize) -> Result<Option<u64>> {
        let start = self.buf.len();
        match value {
            Value::Undefined => self.buf.push(TAG_UNDEFINED),
            Value::Null => self.buf.push(TAG_NULL),
            Value::Bool(false) => self.buf.push(TAG_FALSE),
            Value::Bool(true) => self.buf.push(TAG_TRUE),
            Value::Int(i) => {
                self.buf.push(TAG_INT);
                write_zigzag_i64(&mut self.buf, *i);
            }
            Value::Float(f) => {
                self.buf.push(TAG_FLOAT);
                self.buf.extend_from_slice(&f.to_le_bytes());
            }
            Value::String(s) => return Ok(self.write_str(s)),
            Value::Array(items) => return self.write_array(items, depth + 1),
            Value::Object(map) => return self.write_object(map, depth + 1),
            Value::Bytes(_) | Value::Leaf(_) => {
                let (id, payload) = encode_leaf(self.codecs, value)?;
                self.buf.push(TAG_LEAF);
                write_uleb128(&mut self.buf, id);
                write_uleb128(&mut self.buf, payload.len() as u64);
                self.buf.extend_from_slice(&payload);
                return Ok(self.track(|| Shape::Leaf(id, payload)));
            }
        }

        if self.plain_object {
            return Ok(None);
        }
        let shape = Shape::Scalar(self.buf[start..].to_vec());
        Ok(Some(self.shape_id(shape)))
    }

    fn write_str(&mut self, s: &str) -> Option<u64> {
        if self.plain_text {
            self.buf.push(TAG_STRING);
            write_uleb128(&mut self.buf, s.len() as u64);
            self.buf.extend_from_slice(s.as_bytes());
        } else {
            let idx = self.strings.intern(s);
            self.buf.push(TAG_STRING_REF);
            write_uleb128(&mut self.buf, idx);
        }
        self.track(|| Shape::Str(s.to_owned()))
    }

    fn write_array(&mut self, items: &[Value], depth: usize) -> Result<Option<u64>> {
        Limits::check("Nesting depth", depth, self.max_depth)?;
        let start = self.buf.len();
        self.buf.push(TAG_ARRAY);
        write_uleb128(&mut self.buf, items.len() as u64);

        let mut children = Vec::with_capacity(items.len());
        for item in items {
            children.push(self.write_value(item, depth)?);
        }

        let shape = children.into_iter().collect::<Option<_>>().map(Shape::Array);
        Ok(self.finish_composite(start, shape))
    }

    fn write_object(&mut self, map: &BTreeMap<String, Value>, depth: usize) -> Result<Option<u64>> {
        Limits::check("Nesting depth", depth, self.max_depth)?;
        let start = self.buf.len();
        self.buf.push(TAG_OBJECT);
        write_uleb128(&mut self.buf, map.len() as u64);

        let mut children = Vec::with_capacity(map.len());
        for (k, v) in map {
            let key = self.write_str(k);
            let value = self.write_value(v, depth)?;
            children.push(key.zip(value));
        }

        let shape = children.into_iter().collect::<Option<_>>().map(Shape::Object);
        Ok(self.finish_composite(start, shape))
    }

    /// Replace the composite written from `start` with a back-reference if an
    /// equal one was already written, otherwise give it the next table index
    fn finish_composite(&mut self, start: usize, shape: Option<Shape>) -> Option<u64> {
        let id = self.shape_id(shape?);

        // A repeat's children were all seen before, so rewinding drops no new
        // strings or table entries.
        if let Some(&idx) = self.objects.get(&id) {
            self.buf.truncate(start);
            self.buf.push(TAG_OBJECT_REF);
            write_uleb128(&mut self.buf, idx);
        } else {
            // Indices follow completion order; the reader records composites the same way.
            let idx = self.objects.len() as u64;
            self.objects.insert(id, idx);
        }
        Some(id)
    }

    fn track(&mut self, shape: impl FnOnce() -> Shape) -> Option<u64> {
        if self.plain_object {
            return None;
        }
        Some(self.shape_id(shape()))
    }

    fn shape_id(&mut self, shape: Shape) -> u64 {
        let next = self.shapes.len() as u64;
        *self.shapes.entry(shape).or_insert(next)
    }
}
