//! The form cache document: control id → last committed value.
//!
//! Values are either text (selects, textareas, text-like inputs) or flags
//! (checkboxes and radios). A `null` in a stored cookie is accepted and
//! restores as a cleared control. Empty text, `false` and `null` are all
//! treated as "no value": merging one removes the key, so the serialized
//! document only ever carries meaningful entries.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// A single cached control value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Checked state of a checkbox or radio.
    Flag(bool),
    /// Value string of a select, textarea or text-like input.
    Text(String),
    /// Explicit absence.
    Null,
}

impl FieldValue {
    /// Whether this value is persisted at all.
    ///
    /// Empty text, `false` and `Null` normalize to absent.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Text(text) => !text.is_empty(),
            Self::Null => false,
        }
    }

    /// The value as a control's value string.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Flag(flag) => flag.to_string(),
            Self::Text(text) => text.clone(),
            Self::Null => String::new(),
        }
    }

    /// The value as a checked state: `true` or the string `"true"`.
    #[must_use]
    pub fn as_checked(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Text(text) => text == "true",
            Self::Null => false,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Flat map of control id to cached value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormDocument {
    entries: BTreeMap<String, FieldValue>,
}

impl FormDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a serialized document. Blank input is the empty document.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::MalformedDocument`] if `raw` is not a JSON object
    /// of string, boolean or null values.
    pub fn from_json(raw: &str) -> Result<Self, CacheError> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_json::from_str(raw).map_err(CacheError::MalformedDocument)
    }

    /// Serialize the whole document.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Encode`] if serialization fails.
    pub fn to_json(&self) -> Result<String, CacheError> {
        serde_json::to_string(self).map_err(CacheError::Encode)
    }

    /// Merge one control reading. Absent readings remove the key.
    ///
    /// Returns `false` without touching the document when `id` is empty.
    pub fn merge(&mut self, id: &str, value: Option<FieldValue>) -> bool {
        if id.is_empty() {
            return false;
        }
        match value.filter(FieldValue::is_present) {
            Some(value) => {
                self.entries.insert(id.to_owned(), value);
            }
            None => {
                self.entries.remove(id);
            }
        }
        true
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Look up the cached value of a control.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FieldValue> {
        self.entries.get(id)
    }

    /// Iterate entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(id, value)| (id.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
