//! Decode safety limits

use crate::error::{PackError, Result};

/// Safety limits applied while decoding untrusted payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting depth of arrays and objects (default: 512)
    pub max_depth: usize,
    /// Maximum entries in one array or object (default: 1,048,576)
    pub max_collection_len: usize,
    /// Maximum byte length of one inline string (default: 16 MiB)
    pub max_string_len: usize,
    /// Maximum byte length of one leaf payload (default: 64 MiB)
    pub max_bytes_len: usize,
    /// Maximum strings in a decoded string database (default: 1,048,576)
    pub max_database_strings: usize,
    /// Maximum values materialized by one decode, back-references
    /// expanded (default: 16,777,216)
    pub max_total_values: usize,
    /// Maximum bytes re-read while expanding back-references, as a multiple
    /// of the input length (default: 1024)
    pub max_expansion_ratio: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 512,
            max_collection_len: 1 << 20,
            max_string_len: 16 * 1024 * 1024,
            max_bytes_len: 64 * 1024 * 1024,
            max_database_strings: 1 << 20,
            max_total_values: 1 << 24,
            max_expansion_ratio: 1024,
        }
    }
}

impl Limits {
    /// Limits that accept anything the input length allows
    pub fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
            max_collection_len: usize::MAX,
            max_string_len: usize::MAX,
            max_bytes_len: usize::MAX,
            max_database_strings: usize::MAX,
            max_total_values: usize::MAX,
            max_expansion_ratio: usize::MAX,
        }
    }

    /// Bytes a back-reference may replay in total for an input of `input_len`
    pub fn expansion_budget(&self, input_len: usize) -> usize {
        input_len.saturating_mul(self.max_expansion_ratio)
    }

    /// Fail with `LimitExceeded` when `actual` is above `max`
    pub fn check(what: &str, actual: usize, max: usize) -> Result<()> {
        if actual > max {
            return Err(PackError::LimitExceeded(format!(
                "{} {} exceeds limit {}",
                what, actual, max
            )));
        }
        Ok(())
    }
}
