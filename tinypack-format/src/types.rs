//! Type tag enumeration

use crate::constants::*;
use crate::error::PackError;

/// Leading byte of every encoded value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TypeTag {
    /// Absent value marker
    Undefined = TAG_UNDEFINED,
    /// Null
    Null = TAG_NULL,
    /// Boolean false
    False = TAG_FALSE,
    /// Boolean true
    True = TAG_TRUE,
    /// Signed integer
    Int = TAG_INT,
    /// Double-precision float
    Float = TAG_FLOAT,
    /// Inline string
    String = TAG_STRING,
    /// String database reference
    StringRef = TAG_STRING_REF,
    /// Array
    Array = TAG_ARRAY,
    /// Object
    Object = TAG_OBJECT,
    /// Leaf codec payload
    Leaf = TAG_LEAF,
    /// Object table back-reference
    ObjectRef = TAG_OBJECT_REF,
}

impl TypeTag {
    /// Convert from u8
    pub fn from_u8(val: u8) -> Result<Self, PackError> {
        match val {
            TAG_UNDEFINED => Ok(TypeTag::Undefined),
            TAG_NULL => Ok(TypeTag::Null),
            TAG_FALSE => Ok(TypeTag::False),
            TAG_TRUE => Ok(TypeTag::True),
            TAG_INT => Ok(TypeTag::Int),
            TAG_FLOAT => Ok(TypeTag::Float),
            TAG_STRING => Ok(TypeTag::String),
            TAG_STRING_REF => Ok(TypeTag::StringRef),
            TAG_ARRAY => Ok(TypeTag::Array),
            TAG_OBJECT => Ok(TypeTag::Object),
            TAG_LEAF => Ok(TypeTag::Leaf),
            TAG_OBJECT_REF => Ok(TypeTag::ObjectRef),
            other => Err(PackError::UnknownTypeTag(other)),
        }
    }

    /// Whether this tag can stand in for an object key
    pub fn is_string(self) -> bool {
        matches!(self, TypeTag::String | TypeTag::StringRef)
    }
}
