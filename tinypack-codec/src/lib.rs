//! tinypack Codec - Structural serializer and leaf codec registry
//!
//! This crate walks a [`Value`] into bytes and back:
//!
//! - Structural serialization with string extraction into a [`StringDatabase`]
//! - Shared-subtree back-references (object table)
//! - Pluggable leaf codecs for values the walker does not frame natively
//! - Limit-checked deserialization of untrusted payloads

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod deserialize;
pub mod leaf;
pub mod options;
pub mod serialize;

// Re-export commonly used types
pub use tinypack_format::{
    Leaf, LeafValue, Limits, PackError, Result, StringDatabase, TypeTag, Value,
};

// Re-export our own types
pub use deserialize::{deserialize, deserialize_strings};
pub use leaf::{with_bytes_codec, BytesCodec, FnLeafCodec, LeafCodec, SharedCodec};
pub use options::{DeserializeOptions, SerializeOptions};
pub use serialize::{serialize, serialize_strings, Serialized};
