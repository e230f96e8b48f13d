//! In-memory value model
//!
//! `Value` covers everything the structural codec frames natively (scalars,
//! strings, arrays, objects) plus two kinds it never frames on its own:
//! raw byte buffers and caller-defined leaves. Both of those are written by
//! a leaf codec.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use crate::error::PackError;

/// A caller-defined leaf type carried inside a [`Value`]
///
/// Leaves are opaque to the structural codec; a leaf codec registered in the
/// serialize/deserialize options turns them into bytes and back.
pub trait LeafValue: Any + fmt::Debug + Send + Sync {
    /// Stable name used in diagnostics
    fn type_name(&self) -> &str;

    /// Upcast for downcasting to the concrete type
    fn as_any(&self) -> &dyn Any;

    /// Structural equality against another leaf
    fn leaf_eq(&self, other: &dyn LeafValue) -> bool;
}

/// Shared handle to a [`LeafValue`]
#[derive(Clone)]
pub struct Leaf(Arc<dyn LeafValue>);

impl Leaf {
    /// Wrap a leaf value
    pub fn new<T: LeafValue>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Name reported by the wrapped leaf
    pub fn type_name(&self) -> &str {
        self.0.type_name()
    }

    /// Borrow the wrapped leaf as `T` if it is one
    pub fn downcast_ref<T: LeafValue>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Borrow the wrapped leaf as a trait object
    pub fn get(&self) -> &dyn LeafValue {
        self.0.as_ref()
    }
}

impl fmt::Debug for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl PartialEq for Leaf {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.leaf_eq(other.0.as_ref())
    }
}

/// Any value tinypack can pack
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent value, distinct from `Null`
    #[default]
    Undefined,
    /// Null
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Double-precision float
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Raw byte buffer
    Bytes(Bytes),
    /// Ordered sequence
    Array(Vec<Value>),
    /// String-keyed map
    Object(BTreeMap<String, Value>),
    /// Caller-defined leaf
    Leaf(Leaf),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Leaf(a), Value::Leaf(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Build an object from key/value pairs
    pub fn object<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build an array from items
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    /// Short name of this value's kind
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Leaf(_) => "leaf",
        }
    }

    /// True for `Undefined`
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// True for `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for a raw byte buffer
    pub fn is_bytes(&self) -> bool {
        matches!(self, Value::Bytes(_))
    }

    /// Boolean payload
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer payload
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric payload, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// String payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Byte buffer payload
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Array items
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Object entries
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Leaf handle
    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Value::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Borrow a leaf as its concrete type
    pub fn downcast_leaf<T: LeafValue>(&self) -> Option<&T> {
        self.as_leaf().and_then(Leaf::downcast_ref::<T>)
    }

    /// Member lookup on objects
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Number of string occurrences anywhere in the value, object keys included
    pub fn string_count(&self) -> usize {
        match self {
            Value::String(_) => 1,
            Value::Array(items) => items.iter().map(Value::string_count).sum(),
            Value::Object(map) => map.values().map(|v| 1 + v.string_count()).sum(),
            _ => 0,
        }
    }

    /// Parse JSON text into a value
    pub fn from_json_str(text: &str) -> Result<Self, PackError> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Ok(Value::from(json))
    }

    /// Render the value as JSON text; byte buffers and leaves have no JSON form
    pub fn to_json_string(&self) -> Result<String, PackError> {
        let json = serde_json::Value::try_from(self.clone())?;
        Ok(serde_json::to_string(&json)?)
    }

    fn mismatch(expected: &'static str, found: &Value) -> PackError {
        PackError::TypeMismatch {
            expected,
            found: found.kind(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(b))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Object(map)
    }
}

impl From<Leaf> for Value {
    fn from(leaf: Leaf) -> Self {
        Value::Leaf(leaf)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<Value> for serde_json::Value {
    type Error = PackError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::Number(i.into()),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .ok_or(PackError::TypeMismatch {
                    expected: "finite float",
                    found: "float",
                })?,
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(items) => serde_json::Value::Array(
                items
                    .into_iter()
                    .map(serde_json::Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| serde_json::Value::try_from(v).map(|v| (k, v)))
                    .collect::<Result<_, _>>()?,
            ),
            other @ (Value::Bytes(_) | Value::Leaf(_)) => {
                return Err(Value::mismatch("JSON-representable value", &other))
            }
        })
    }
}

impl TryFrom<Value> for String {
    type Error = PackError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(Value::mismatch("string", &other)),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = PackError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(Value::mismatch("int", &other)),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = PackError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value
            .as_f64()
            .ok_or_else(|| Value::mismatch("number", &value))
    }
}

impl TryFrom<Value> for bool {
    type Error = PackError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(Value::mismatch("bool", &other)),
        }
    }
}

impl TryFrom<Value> for Bytes {
    type Error = PackError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bytes(b) => Ok(b),
            other => Err(Value::mismatch("bytes", &other)),
        }
    }
}

impl TryFrom<Value> for Vec<u8> {
    type Error = PackError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Bytes::try_from(value).map(|b| b.to_vec())
    }
}

impl TryFrom<Value> for Vec<Value> {
    type Error = PackError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(items) => Ok(items),
            other => Err(Value::mismatch("array", &other)),
        }
    }
}

impl TryFrom<Value> for BTreeMap<String, Value> {
    type Error = PackError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(map),
            other => Err(Value::mismatch("object", &other)),
        }
    }
}
