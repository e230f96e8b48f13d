//! Pack and unpack option records
//!
//! Caller-facing options mirror the codec's serialize/deserialize options and
//! add the transform hooks. The effective codec options are derived by pure
//! merge functions: the caller's codec list comes first with the built-in byte
//! buffer codec appended, then the caller's remaining fields are carried over.

use std::sync::Arc;

use tinypack_codec::{
    with_bytes_codec, DeserializeOptions, LeafCodec, SerializeOptions, SharedCodec,
};
use tinypack_format::{Limits, Result, StringDatabase, Value};

use crate::hooks::Hook;

/// Options for [`pack`](crate::pack)
#[derive(Debug, Clone)]
pub struct PackOptions {
    /// Caller leaf codecs, asked before the built-in byte buffer codec
    pub serializers: Vec<SharedCodec>,
    /// String database to extend instead of starting empty
    pub string_database: Option<StringDatabase>,
    /// Write strings inline instead of interning them
    pub plain_text: bool,
    /// Write repeated composites in full instead of back-referencing them
    pub plain_object: bool,
    /// Maximum nesting depth of the packed value (default: the decode limit)
    pub max_depth: usize,
    /// Transform applied to the whole value before serialization
    pub encoder: Option<Hook>,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            serializers: Vec::new(),
            string_database: None,
            plain_text: false,
            plain_object: false,
            max_depth: Limits::default().max_depth,
            encoder: None,
        }
    }
}

impl PackOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a leaf codec
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

    /// Cap the nesting depth of the packed value
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the encoder hook
    pub fn with_encoder<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.encoder = Some(Hook::new(f));
        self
    }

    /// Serialize options for every pass of one `pack` call
    pub fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions {
            serializers: with_bytes_codec(&self.serializers),
            string_database: self.string_database.clone(),
            plain_text: self.plain_text,
            plain_object: self.plain_object,
            max_depth: self.max_depth,
        }
    }
}

/// Options for [`unpack`](crate::unpack)
#[derive(Debug, Clone, Default)]
pub struct UnpackOptions {
    /// Caller leaf codecs, matched before the built-in byte buffer codec
    pub deserializers: Vec<SharedCodec>,
    /// Database for string references in bare payloads
    ///
    /// Framed payloads always resolve against the database they carry.
    pub string_database: Option<StringDatabase>,
    /// Safety limits
    pub limits: Limits,
    /// Transform applied to the whole value after deserialization
    pub decoder: Option<Hook>,
}

impl UnpackOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a leaf codec
    pub fn with_deserializer<C: LeafCodec + 'static>(mut self, codec: C) -> Self {
        self.deserializers.push(Arc::new(codec));
        self
    }

    /// Supply a string database for bare payloads
    pub fn with_string_database(mut self, db: StringDatabase) -> Self {
        self.string_database = Some(db);
        self
    }

    /// Replace the safety limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the decoder hook
    pub fn with_decoder<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.decoder = Some(Hook::new(f));
        self
    }

    /// Deserialize options for the outer pass and the database pass
    pub fn deserialize_options(&self) -> DeserializeOptions {
        DeserializeOptions {
            deserializers: with_bytes_codec(&self.deserializers),
            string_database: self.string_database.clone(),
            limits: self.limits.clone(),
        }
    }
}
