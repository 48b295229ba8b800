//! The version payload model.
//!
//! A version snapshot carries either plain text (possibly HTML markup) or a
//! structured key-value document. Documents are ordered maps over
//! `serde_json::Value`, which is a closed tagged union
//! (null | bool | number | string | array | object) — the structured diff
//! engine can match on it exhaustively.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An ordered key-value document.
pub type Document = BTreeMap<String, Value>;

/// The data payload of a content version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionData {
    /// Free-form text (plain or HTML).
    Text(String),
    /// A structured key-value document.
    Document(Document),
}

impl VersionData {
    /// Build a document payload from key-value pairs.
    pub fn document_from_pairs(pairs: &[(&str, Value)]) -> Self {
        Self::Document(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    /// Returns the payload as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Document(_) => None,
        }
    }

    /// View the payload as a document.
    ///
    /// Text payloads are exposed as a single-field document under the
    /// `"body"` key so field-level operations (structured diff, field
    /// merges) work uniformly over both payload shapes.
    pub fn to_document(&self) -> Document {
        match self {
            Self::Document(doc) => doc.clone(),
            Self::Text(s) => {
                let mut doc = Document::new();
                doc.insert("body".to_string(), Value::String(s.clone()));
                doc
            }
        }
    }

    /// Approximate payload size in bytes (serialized length for documents).
    pub fn size_bytes(&self) -> usize {
        match self {
            Self::Text(s) => s.len(),
            Self::Document(doc) => serde_json::to_vec(doc).map(|v| v.len()).unwrap_or(0),
        }
    }

    /// Returns `true` if the payload is empty (empty text or empty document).
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Document(doc) => doc.is_empty(),
        }
    }
}

impl From<&str> for VersionData {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for VersionData {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Document> for VersionData {
    fn from(doc: Document) -> Self {
        Self::Document(doc)
    }
}
