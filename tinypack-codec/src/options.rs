//! Serialize and deserialize option records

use std::sync::Arc;

use tinypack_format::{Limits, StringDatabase};

use crate::leaf::{LeafCodec, SharedCodec};

/// Options for [`serialize`](crate::serialize)
#[derive(Debug, Clone)]
pub struct SerializeOptions {
    /// Leaf codecs, asked in order
    pub serializers: Vec<SharedCodec>,
    /// Database to extend instead of starting from an empty one
    pub string_database: Option<StringDatabase>,
    /// Write strings inline instead of interning them
    pub plain_text: bool,
    /// Write every composite in full instead of back-referencing repeats
    pub plain_object: bool,
    /// Maximum nesting depth of arrays and objects (default: the decode limit)
    pub max_depth: usize,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            serializers: Vec::new(),
            string_database: None,
            plain_text: false,
            plain_object: false,
            max_depth: Limits::default().max_depth,
        }
    }
}

impl SerializeOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a leaf codec
    pub fn with_serializer<C: LeafCodec + 'static>(mut self, codec: C) -> Self {
        self.serializers.push(Arc::new(codec));
        self
    }

    /// Seed the string database
    pub fn with_string_database(mut self, db: StringDatabase) -> Self {
        self.string_database = Some(db);
        self
    }

    /// Toggle inline strings
    pub fn with_plain_text(mut self, plain_text: bool) -> Self {
        self.plain_text = plain_text;
        self
    }

    /// Toggle back-references for repeated composites
    pub fn with_plain_object(mut self, plain_object: bool) -> Self {
        self.plain_object = plain_object;
        self
    }

    /// Cap the nesting depth of written values
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Options for [`deserialize`](crate::deserialize)
#[derive(Debug, Clone, Default)]
pub struct DeserializeOptions {
    /// Leaf codecs, matched by id in order
    pub deserializers: Vec<SharedCodec>,
    /// Database that string references resolve against
    pub string_database: Option<StringDatabase>,
    /// Safety limits
    pub limits: Limits,
}

impl DeserializeOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a leaf codec
    pub fn with_deserializer<C: LeafCodec + 'static>(mut self, codec: C) -> Self {
        self.deserializers.push(Arc::new(codec));
        self
    }

    /// Resolve string references against `db`
    pub fn with_string_database(mut self, db: StringDatabase) -> Self {
        self.string_database = Some(db);
        self
    }

    /// Replace the safety limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}
