//! Error types for tinypack

use std::convert::Infallible;

use thiserror::Error;

/// tinypack error types
#[derive(Debug, Error)]
pub enum PackError {
    /// Encountered unexpected end of input.
    #[error("Unexpected end of input")]
    UnexpectedEof,
    /// Payload is structurally invalid.
    #[error("Corrupt payload: {0}")]
    CorruptPayload(String),
    /// Payload contains a type tag this decoder does not know.
    #[error("Unknown type tag: {0}")]
    UnknownTypeTag(u8),
    /// Inline string bytes are not valid UTF-8.
    #[error("Invalid UTF-8 in string payload")]
    InvalidUtf8,
    /// A string reference points past the end of the string database.
    #[error("String database index out of range: {0}")]
    StringIndexOutOfRange(u64),
    /// A back-reference points at a composite that was never decoded.
    #[error("Object table index out of range: {0}")]
    ObjectIndexOutOfRange(u64),
    /// A string reference was found but no string database is in context.
    #[error("String reference without a string database")]
    MissingStringDatabase,
    /// No registered leaf codec claims the value.
    #[error("Unserializable value: {0}")]
    Unserializable(String),
    /// Payload names a leaf codec id that no deserializer handles.
    #[error("Unknown leaf codec id: {0}")]
    UnknownLeafCodec(u64),
    /// A leaf codec rejected its input.
    #[error("Leaf codec '{codec}' failed: {message}")]
    LeafCodec {
        /// Name of the failing codec
        codec: String,
        /// Codec-specific failure description
        message: String,
    },
    /// Value could not be interpreted as the expected type.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Expected value kind
        expected: &'static str,
        /// Actual value kind
        found: &'static str,
    },
    /// A configured safety limit was exceeded.
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
    /// An encoder or decoder hook reported a failure.
    #[error("Transform hook failed: {0}")]
    Hook(String),
    /// JSON conversion failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<Infallible> for PackError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PackError>;
