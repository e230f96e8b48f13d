//! Envelope shape at the top level of a packed payload
//!
//! A packed payload deserializes either to the value itself or to a
//! two-element array of byte buffers `[database, payload]`. [`Envelope`]
//! names those two cases so the rest of the crate never inspects the shape
//! by hand.

use bytes::Bytes;
use tinypack_format::Value;

/// Top-level form of a packed payload
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// The value, with no string database
    Bare(Value),
    /// A string database payload and a value payload that references it
    Framed {
        /// Serialized string database
        database: Bytes,
        /// Serialized value
        payload: Bytes,
    },
}

impl Envelope {
    /// Framed envelope from the two serialized passes
    pub fn framed(database: Vec<u8>, payload: Vec<u8>) -> Self {
        Envelope::Framed {
            database: Bytes::from(database),
            payload: Bytes::from(payload),
        }
    }

    /// Classify a deserialized top-level value
    pub fn inspect(value: Value) -> Self {
        let items = match value {
            Value::Array(items) => items,
            other => return Envelope::Bare(other),
        };

        match <[Value; 2]>::try_from(items) {
            Ok([Value::Bytes(database), Value::Bytes(payload)]) => {
                Envelope::Framed { database, payload }
            }
            Ok(pair) => Envelope::Bare(Value::Array(pair.into())),
            Err(items) => Envelope::Bare(Value::Array(items)),
        }
    }

    /// True when `value` would be read back as a framed envelope
    pub fn has_framed_shape(value: &Value) -> bool {
        matches!(value.as_array(), Some([a, b]) if a.is_bytes() && b.is_bytes())
    }

    /// Value to hand to the serializer
    pub fn into_value(self) -> Value {
        match self {
            Envelope::Bare(value) => value,
            Envelope::Framed { database, payload } => {
                Value::Array(vec![Value::Bytes(database), Value::Bytes(payload)])
            }
        }
    }
}
