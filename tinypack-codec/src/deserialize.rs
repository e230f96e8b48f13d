//! Structural deserializer

use std::collections::BTreeMap;
use std::ops::Range;

use tinypack_format::constants::FLOAT_BODY_LEN;
use tinypack_format::varint::{decode_uleb128, decode_zigzag_i64};
use tinypack_format::{Limits, PackError, Result, TypeTag, Value};

use crate::leaf::decode_leaf;
use crate::options::DeserializeOptions;

/// Deserialize one value; trailing bytes are an error
pub fn deserialize(bytes: &[u8], opts: &DeserializeOptions) -> Result<Value> {
    let mut reader = ValueReader::new(bytes, opts);
    let value = reader.read_value(0)?;

    if reader.pos != bytes.len() {
        return Err(PackError::CorruptPayload(format!(
            "{} trailing bytes after value",
            bytes.len() - reader.pos
        )));
    }

    Ok(value)
}

/// Deserialize a payload that must hold an array of strings
pub fn deserialize_strings(bytes: &[u8], opts: &DeserializeOptions) -> Result<Vec<String>> {
    match deserialize(bytes, opts)? {
        Value::Array(items) => {
            Limits::check(
                "String database size",
                items.len(),
                opts.limits.max_database_strings,
            )?;
            items.into_iter().map(String::try_from).collect()
        }
        other => Err(PackError::TypeMismatch {
            expected: "array of strings",
            found: other.kind(),
        }),
    }
}

struct ValueReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    opts: &'a DeserializeOptions,
    /// Byte range of every inline composite, in completion order
    objects: Vec<Range<usize>>,
    /// False while expanding a back-reference
    recording: bool,
    values_read: usize,
    /// Bytes re-read for back-references so far, and the cap on that count
    replayed: usize,
    replay_budget: usize,
}

impl<'a> ValueReader<'a> {
    fn new(bytes: &'a [u8], opts: &'a DeserializeOptions) -> Self {
        Self {
            bytes,
            pos: 0,
            opts,
            objects: Vec::new(),
            recording: true,
            values_read: 0,
            replayed: 0,
            replay_budget: opts.limits.expansion_budget(bytes.len()),
        }
    }

    fn limits(&self) -> &Limits {
        &self.opts.limits
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn read_u8(&mut self) -> Result<u8> {
        let byte = *self.bytes.get(self.pos).ok_or(PackError::UnexpectedEof)?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_uleb(&mut self) -> Result<u64> {
        let (value, width) = decode_uleb128(&self.bytes[self.pos..])?;
        self.pos += width;
        Ok(value)
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(PackError::UnexpectedEof);
        }
        let bytes: &'a [u8] = self.bytes;
        let slice = &bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Read a length prefix, bounded by `max` and by what is left of the input
    fn read_len(&mut self, what: &str, max: usize) -> Result<usize> {
        let raw = self.read_uleb()?;
        let len = usize::try_from(raw)
            .map_err(|_| PackError::LimitExceeded(format!("{} {} overflows usize", what, raw)))?;
        Limits::check(what, len, max)?;
        // Every element or byte occupies at least one input byte.
        if len > self.remaining() {
            return Err(PackError::UnexpectedEof);
        }
        Ok(len)
    }

    fn read_value(&mut self, depth: usize) -> Result<Value> {
        self.values_read += 1;
        Limits::check(
            "Decoded value count",
            self.values_read,
            self.limits().max_total_values,
        )?;

        let start = self.pos;
        let tag = TypeTag::from_u8(self.read_u8()?)?;

        let value = match tag {
            TypeTag::Undefined => Value::Undefined,
            TypeTag::Null => Value::Null,
            TypeTag::False => Value::Bool(false),
            TypeTag::True => Value::Bool(true),
            TypeTag::Int => {
                let (i, width) = decode_zigzag_i64(&self.bytes[self.pos..])?;
                self.pos += width;
                Value::Int(i)
            }
            TypeTag::Float => {
                let body = self.read_slice(FLOAT_BODY_LEN)?;
                let mut raw = [0u8; FLOAT_BODY_LEN];
                raw.copy_from_slice(body);
                Value::Float(f64::from_le_bytes(raw))
            }
            TypeTag::String | TypeTag::StringRef => Value::String(self.read_string_body(tag)?),
            TypeTag::Array | TypeTag::Object => {
                Limits::check("Nesting depth", depth + 1, self.limits().max_depth)?;
                let value = if tag == TypeTag::Array {
                    self.read_array(depth + 1)?
                } else {
                    self.read_object(depth + 1)?
                };
                if self.recording {
                    self.objects.push(start..self.pos);
                }
                value
            }
            TypeTag::Leaf => {
                let id = self.read_uleb()?;
                let len = self.read_len("Leaf payload length", self.limits().max_bytes_len)?;
                let payload = self.read_slice(len)?;
                decode_leaf(&self.opts.deserializers, id, payload)?
            }
            TypeTag::ObjectRef => {
                let idx = self.read_uleb()?;
                self.expand_object_ref(idx, depth)?
            }
        };

        Ok(value)
    }

    fn read_string_body(&mut self, tag: TypeTag) -> Result<String> {
        if tag == TypeTag::String {
            let len = self.read_len("String length", self.limits().max_string_len)?;
            let raw = self.read_slice(len)?;
            return std::str::from_utf8(raw)
                .map(str::to_owned)
                .map_err(|_| PackError::InvalidUtf8);
        }

        let idx = self.read_uleb()?;
        let db = self
            .opts
            .string_database
            .as_ref()
            .ok_or(PackError::MissingStringDatabase)?;
        db.get(idx)
            .map(str::to_owned)
            .ok_or(PackError::StringIndexOutOfRange(idx))
    }

    fn read_array(&mut self, depth: usize) -> Result<Value> {
        let count = self.read_len("Array length", self.limits().max_collection_len)?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(self.read_value(depth)?);
        }
        Ok(Value::Array(items))
    }

    fn read_object(&mut self, depth: usize) -> Result<Value> {
        let count = self.read_len("Object length", self.limits().max_collection_len)?;
        let mut map = BTreeMap::new();
        for _ in 0..count {
            let key_tag = TypeTag::from_u8(self.read_u8()?)?;
            if !key_tag.is_string() {
                return Err(PackError::CorruptPayload(format!(
                    "object key encoded as {:?}",
                    key_tag
                )));
            }
            let key = self.read_string_body(key_tag)?;
            let value = self.read_value(depth)?;
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }

    /// Re-read the bytes of an earlier composite without recording it again
    fn expand_object_ref(&mut self, idx: u64, depth: usize) -> Result<Value> {
        let range = usize::try_from(idx)
            .ok()
            .and_then(|i| self.objects.get(i))
            .cloned()
            .ok_or(PackError::ObjectIndexOutOfRange(idx))?;

        self.replayed = self.replayed.saturating_add(range.len());
        Limits::check(
            "Back-reference expansion bytes",
            self.replayed,
            self.replay_budget,
        )?;

        let resume = self.pos;
        let was_recording = self.recording;
        self.pos = range.start;
        self.recording = false;

        let value = self.read_value(depth);

        self.pos = resume;
        self.recording = was_recording;
        value
    }
}
