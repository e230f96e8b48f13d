//! tinypack Test Utilities
//!
//! Shared fixtures, builders and proptest strategies for the tinypack crates.

use std::any::Any;
use std::collections::BTreeMap;

use bytes::Bytes;
use proptest::prelude::*;
use tinypack_format::{LeafValue, Value};

/// Builder for object values with common field patterns
#[derive(Debug, Default)]
pub struct ObjectBuilder {
    fields: BTreeMap<String, Value>,
}

impl ObjectBuilder {
    /// Create a new object builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string field
    pub fn string(mut self, key: &str, value: &str) -> Self {
        self.fields.insert(key.to_string(), Value::from(value));
        self
    }

    /// Add an integer field
    pub fn int(mut self, key: &str, value: i64) -> Self {
        self.fields.insert(key.to_string(), Value::Int(value));
        self
    }

    /// Add a float field
    pub fn float(mut self, key: &str, value: f64) -> Self {
        self.fields.insert(key.to_string(), Value::Float(value));
        self
    }

    /// Add a boolean field
    pub fn bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), Value::Bool(value));
        self
    }

    /// Add a null field
    pub fn null(mut self, key: &str) -> Self {
        self.fields.insert(key.to_string(), Value::Null);
        self
    }

    /// Add a byte buffer field
    pub fn bytes(mut self, key: &str, value: &[u8]) -> Self {
        self.fields
            .insert(key.to_string(), Value::Bytes(Bytes::copy_from_slice(value)));
        self
    }

    /// Add an arbitrary field
    pub fn value(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Build the object
    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Caller-defined leaf used to exercise custom leaf codecs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp(pub i64);

impl LeafValue for Timestamp {
    fn type_name(&self) -> &str {
        "Timestamp"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn leaf_eq(&self, other: &dyn LeafValue) -> bool {
        other.as_any().downcast_ref::<Self>() == Some(self)
    }
}

/// Nested document with repeated strings
pub fn sample_document() -> Value {
    let address = ObjectBuilder::new()
        .string("city", "Lisbon")
        .string("country", "PT")
        .build();

    ObjectBuilder::new()
        .string("name", "test")
        .value("nested", ObjectBuilder::new().int("number", 42).build())
        .value(
            "tags",
            Value::array(["alpha", "beta", "alpha", "gamma", "beta"]),
        )
        .value("home", address.clone())
        .value("work", address)
        .float("score", 0.75)
        .bool("active", true)
        .null("deleted_at")
        .build()
}

/// Values that contain no string anywhere, keys included
pub fn string_free_values() -> Vec<Value> {
    vec![
        Value::Undefined,
        Value::Null,
        Value::Bool(false),
        Value::Int(-7),
        Value::Float(f64::INFINITY),
        Value::array([1, 2, 3, 4]),
        Value::Array(vec![Value::array([1, 2]), Value::array([1, 2])]),
        Value::Bytes(Bytes::from_static(b"\x00\x01\x02")),
        Value::Object(BTreeMap::new()),
    ]
}

/// Strategy for scalar values (no composites, no leaves)
pub fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Undefined),
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<f64>().prop_map(Value::Float),
        "[a-z]{0,8}".prop_map(Value::String),
        "\\PC{0,6}".prop_map(Value::String),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Value::from),
    ]
}

/// Strategy for arbitrary nested values built from [`arb_scalar`]
pub fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..6).prop_map(Value::Object),
        ]
    })
}

/// Strategy for nested values with no strings anywhere
pub fn arb_string_free_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 32, 5, |inner| {
        prop::collection::vec(inner, 0..5).prop_map(Value::Array)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_builder() {
        let value = ObjectBuilder::new()
            .string("name", "alice")
            .int("age", 30)
            .bool("active", true)
            .null("email")
            .bytes("raw", &[1, 2])
            .build();

        assert_eq!(value.get("name").and_then(Value::as_str), Some("alice"));
        assert_eq!(value.get("age").and_then(Value::as_i64), Some(30));
        assert!(value.get("email").map_or(false, Value::is_null));
        assert!(value.get("raw").map_or(false, Value::is_bytes));
    }

    #[test]
    fn test_string_free_fixtures() {
        for value in string_free_values() {
            assert_eq!(value.string_count(), 0, "{value:?}");
        }
        assert!(sample_document().string_count() > 0);
    }
}
