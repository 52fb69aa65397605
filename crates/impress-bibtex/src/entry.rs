//! BibTeX entry data structures

use serde::{Deserialize, Serialize};

/// A single BibTeX field (key-value pair)
///
/// The key keeps the spelling used in the source file so that an entry can
/// be written back out the way it was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibTeXField {
    pub key: String,
    pub value: String,
}

/// A parsed BibTeX entry
///
/// `entry_type` is the tag exactly as written after `@` (`article`,
/// `InProceedings`, ...). Fields are kept in source order, one per key
/// (keys compare case-insensitively).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibTeXEntry {
    pub entry_type: String,
    pub cite_key: String,
    pub fields: Vec<BibTeXField>,
}

impl BibTeXEntry {
    /// Create a new entry with no fields
    pub fn new(entry_type: impl Into<String>, cite_key: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into(),
            cite_key: cite_key.into(),
            fields: Vec::new(),
        }
    }

    /// Set a field, keeping insertion order
    ///
    /// A key already present (in any case) keeps its position and spelling
    /// and takes the new value.
    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self
            .fields
            .iter_mut()
            .find(|f| f.key.eq_ignore_ascii_case(&key))
        {
            Some(field) => field.value = value,
            None => self.fields.push(BibTeXField { key, value }),
        }
    }

    /// Builder-style variant of [`add_field`](Self::add_field)
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_field(key, value);
        self
    }

    /// Get a field value by key (case-insensitive)
    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key.eq_ignore_ascii_case(key))
            .map(|f| f.value.as_str())
    }

    /// Get a field value by key, treating an empty value as absent
    ///
    /// A field written as `url = {}` counts as missing.
    pub fn non_empty_field(&self, key: &str) -> Option<&str> {
        self.get_field(key).filter(|v| !v.is_empty())
    }
}
