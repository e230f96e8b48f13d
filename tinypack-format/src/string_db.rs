//! Deduplicating string database
//!
//! Strings encountered while serializing a value are interned here and
//! referenced by their index. Indices are assigned in first-seen order and
//! never change once handed out.

use ahash::AHashMap;

/// Ordered, deduplicated table of strings addressed by index
#[derive(Debug, Clone, Default)]
pub struct StringDatabase {
    strings: Vec<String>,
    index: AHashMap<String, u64>,
}

impl StringDatabase {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a database from an ordered sequence; repeats keep their first index
    pub fn from_strings<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut db = Self::new();
        for s in strings {
            db.intern_owned(s.into());
        }
        db
    }

    /// True when no string has been interned
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Number of distinct strings
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Return the index of `s`, appending it first if unseen
    pub fn intern(&mut self, s: &str) -> u64 {
        if let Some(&idx) = self.index.get(s) {
            return idx;
        }
        self.push_new(s.to_owned())
    }

    fn intern_owned(&mut self, s: String) -> u64 {
        if let Some(&idx) = self.index.get(s.as_str()) {
            return idx;
        }
        self.push_new(s)
    }

    fn push_new(&mut self, s: String) -> u64 {
        let idx = self.strings.len() as u64;
        self.index.insert(s.clone(), idx);
        self.strings.push(s);
        idx
    }

    /// Look up a string by index
    pub fn get(&self, idx: u64) -> Option<&str> {
        usize::try_from(idx)
            .ok()
            .and_then(|i| self.strings.get(i))
            .map(String::as_str)
    }

    /// Index of `s` if present
    pub fn index_of(&self, s: &str) -> Option<u64> {
        self.index.get(s).copied()
    }

    /// Iterate strings in index order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }

    /// Strings in index order
    pub fn as_slice(&self) -> &[String] {
        &self.strings
    }

    /// Consume the database, returning its strings in index order
    pub fn into_strings(self) -> Vec<String> {
        self.strings
    }
}

impl PartialEq for StringDatabase {
    fn eq(&self, other: &Self) -> bool {
        self.strings == other.strings
    }
}

impl Eq for StringDatabase {}

impl<S: Into<String>> FromIterator<S> for StringDatabase {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_strings(iter)
    }
}
