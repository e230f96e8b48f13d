//! tinypack Format - Core primitives for the tinypack envelope
//!
//! This crate provides the building blocks shared by the structural codec and
//! the pack/unpack envelope, with no codec logic of its own. It includes:
//!
//! - Wire constants and type tags
//! - Variable-length integer encoding (ULEB128/ZigZag)
//! - The in-memory `Value` model and leaf extension trait
//! - The deduplicating string database
//! - Error types
//! - Decode safety limits

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod error;
pub mod limits;
pub mod string_db;
pub mod types;
pub mod value;
pub mod varint;

// Re-export commonly used types
pub use error::{PackError, Result};
pub use limits::Limits;
pub use string_db::StringDatabase;
pub use types::TypeTag;
pub use value::{Leaf, LeafValue, Value};
