//! Constants for the tinypack wire format

/// Type tag for the `undefined` marker.
pub const TAG_UNDEFINED: u8 = 0;
/// Type tag for `null`.
pub const TAG_NULL: u8 = 1;
/// Type tag for boolean `false`.
pub const TAG_FALSE: u8 = 2;
/// Type tag for boolean `true`.
pub const TAG_TRUE: u8 = 3;
/// Type tag for a ZigZag-encoded signed integer.
pub const TAG_INT: u8 = 4;
/// Type tag for a little-endian IEEE 754 double.
pub const TAG_FLOAT: u8 = 5;
/// Type tag for a length-prefixed inline UTF-8 string.
pub const TAG_STRING: u8 = 6;
/// Type tag for a reference into the string database.
pub const TAG_STRING_REF: u8 = 7;
/// Type tag for an array (count-prefixed items).
pub const TAG_ARRAY: u8 = 8;
/// Type tag for an object (count-prefixed key/value pairs).
pub const TAG_OBJECT: u8 = 9;
/// Type tag for a leaf payload produced by a leaf codec.
pub const TAG_LEAF: u8 = 10;
/// Type tag for a back-reference to an earlier composite.
pub const TAG_OBJECT_REF: u8 = 11;

/// Codec id reserved for the built-in raw byte buffer codec.
pub const BYTES_CODEC_ID: u64 = 1;

/// Size in bytes of an encoded float body.
pub const FLOAT_BODY_LEN: usize = 8;
