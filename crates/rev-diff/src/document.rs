//! Field-level diff for key-value documents.
//!
//! Compares two [`Document`]s key by key: keys present on only one side are
//! additions or removals, keys present on both with different values are
//! modifications. Object values recurse into a nested diff; arrays recurse
//! with the index as the key; string values additionally carry a word-level
//! [`TextDiff`] so the UI can highlight the change inside the field.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use rev_types::Document;

use crate::text::{diff_text, Granularity, TextDiff};

/// Whether a field was added, removed, or changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// The key exists only in the new document.
    Added,
    /// The key exists only in the old document.
    Removed,
    /// The key exists in both documents with different values.
    Modified,
}

impl ChangeKind {
    fn invert(self) -> Self {
        match self {
            Self::Added => Self::Removed,
            Self::Removed => Self::Added,
            Self::Modified => Self::Modified,
        }
    }
}

/// The change recorded for a single field.
///
/// For scalar modifications `old` and `new` hold both values. When `nested`
/// is present (object or array values) the scalar slots are `None`; the
/// nested diff carries the detail. String modifications also populate `text`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Added, removed, or modified.
    pub kind: ChangeKind,
    /// The old value, when meaningful at this level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<Value>,
    /// The new value, when meaningful at this level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<Value>,
    /// Recursive diff for object and array values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested: Option<Box<DocumentDiff>>,
    /// Word-level text diff for string-to-string modifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextDiff>,
}

/// Field-level diff between two documents. Keys map to the change recorded
/// for that field; unchanged fields do not appear.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentDiff {
    /// Changed fields, keyed by field name.
    pub changes: BTreeMap<String, FieldChange>,
}

impl DocumentDiff {
    /// Returns `true` if the documents were identical.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changed fields at this level.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Field names added in the new document, at this level.
    pub fn additions(&self) -> Vec<&str> {
        self.fields_of_kind(ChangeKind::Added)
    }

    /// Field names removed from the old document, at this level.
    pub fn removals(&self) -> Vec<&str> {
        self.fields_of_kind(ChangeKind::Removed)
    }

    /// Field names modified between the documents, at this level.
    pub fn modifications(&self) -> Vec<&str> {
        self.fields_of_kind(ChangeKind::Modified)
    }

    fn fields_of_kind(&self, kind: ChangeKind) -> Vec<&str> {
        self.changes
            .iter()
            .filter(|(_, c)| c.kind == kind)
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// The reverse diff: additions become removals and vice versa, old and
    /// new values swap, nested diffs and text diffs invert recursively.
    pub fn invert(&self) -> DocumentDiff {
        let changes = self
            .changes
            .iter()
            .map(|(key, change)| {
                (
                    key.clone(),
                    FieldChange {
                        kind: change.kind.invert(),
                        old: change.new.clone(),
                        new: change.old.clone(),
                        nested: change.nested.as_ref().map(|n| Box::new(n.invert())),
                        text: change.text.as_ref().map(TextDiff::invert),
                    },
                )
            })
            .collect();
        DocumentDiff { changes }
    }
}

/// Diff two documents field by field.
///
/// Pure and total: any pair of documents (including empty ones) produces a
/// valid result, and `diff_documents(d, d)` is always empty.
pub fn diff_documents(old: &Document, new: &Document) -> DocumentDiff {
    let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();

    let mut changes = BTreeMap::new();
    for key in keys {
        match (old.get(key), new.get(key)) {
            (None, Some(added)) => {
                changes.insert(
                    key.clone(),
                    FieldChange {
                        kind: ChangeKind::Added,
                        old: None,
                        new: Some(added.clone()),
                        nested: None,
                        text: None,
                    },
                );
            }
            (Some(removed), None) => {
                changes.insert(
                    key.clone(),
                    FieldChange {
                        kind: ChangeKind::Removed,
                        old: Some(removed.clone()),
                        new: None,
                        nested: None,
                        text: None,
                    },
                );
            }
            (Some(before), Some(after)) if before != after => {
                changes.insert(key.clone(), modified_field(before, after));
            }
            _ => {}
        }
    }
    DocumentDiff { changes }
}

fn modified_field(before: &Value, after: &Value) -> FieldChange {
    match (before, after) {
        (Value::Object(a), Value::Object(b)) => {
            let nested = diff_documents(
                &a.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                &b.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            );
            FieldChange {
                kind: ChangeKind::Modified,
                old: None,
                new: None,
                nested: Some(Box::new(nested)),
                text: None,
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            let nested = diff_documents(&indexed(a), &indexed(b));
            FieldChange {
                kind: ChangeKind::Modified,
                old: None,
                new: None,
                nested: Some(Box::new(nested)),
                text: None,
            }
        }
        (Value::String(a), Value::String(b)) => FieldChange {
            kind: ChangeKind::Modified,
            old: Some(before.clone()),
            new: Some(after.clone()),
            nested: None,
            text: Some(diff_text(a, b, Granularity::Word)),
        },
        _ => FieldChange {
            kind: ChangeKind::Modified,
            old: Some(before.clone()),
            new: Some(after.clone()),
            nested: None,
            text: None,
        },
    }
}

/// Array elements as a document keyed by index, so array diffs reuse the
/// key-level machinery.
fn indexed(values: &[Value]) -> Document {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (i.to_string(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rev_types::VersionData;
    use serde_json::json;

    fn doc(pairs: &[(&str, Value)]) -> Document {
        VersionData::document_from_pairs(pairs)
            .to_document()
    }

    #[test]
    fn identical_documents_yield_empty_diff() {
        let d = doc(&[("title", json!("hi")), ("count", json!(3))]);
        assert!(diff_documents(&d, &d).is_empty());
    }

    #[test]
    fn added_and_removed_keys() {
        let old = doc(&[("title", json!("hi")), ("legacy", json!(true))]);
        let new = doc(&[("title", json!("hi")), ("summary", json!("new field"))]);
        let diff = diff_documents(&old, &new);

        assert_eq!(diff.len(), 2);
        assert_eq!(diff.additions(), vec!["summary"]);
        assert_eq!(diff.removals(), vec!["legacy"]);
        assert_eq!(
            diff.changes["summary"].new,
            Some(json!("new field"))
        );
        assert_eq!(diff.changes["legacy"].old, Some(json!(true)));
    }

    #[test]
    fn scalar_modification_keeps_both_values() {
        let old = doc(&[("count", json!(1))]);
        let new = doc(&[("count", json!(2))]);
        let diff = diff_documents(&old, &new);

        let change = &diff.changes["count"];
        assert_eq!(change.kind, ChangeKind::Modified);
        assert_eq!(change.old, Some(json!(1)));
        assert_eq!(change.new, Some(json!(2)));
        assert!(change.nested.is_none());
    }

    #[test]
    fn string_modification_carries_text_diff() {
        let old = doc(&[("body", json!("hello world"))]);
        let new = doc(&[("body", json!("hello there world"))]);
        let diff = diff_documents(&old, &new);

        let text = diff.changes["body"].text.as_ref().expect("text diff");
        assert!(text.has_changes());
        assert_eq!(text.reconstruct_old(), "hello world");
        assert_eq!(text.reconstruct_new(), "hello there world");
    }

    #[test]
    fn object_values_recurse() {
        let old = doc(&[("meta", json!({"author": "ana", "tags": "a"}))]);
        let new = doc(&[("meta", json!({"author": "ben", "tags": "a"}))]);
        let diff = diff_documents(&old, &new);

        let change = &diff.changes["meta"];
        assert_eq!(change.kind, ChangeKind::Modified);
        assert!(change.old.is_none() && change.new.is_none());
        let nested = change.nested.as_ref().expect("nested diff");
        assert_eq!(nested.modifications(), vec!["author"]);
        assert_eq!(nested.changes["author"].old, Some(json!("ana")));
    }

    #[test]
    fn array_values_recurse_by_index() {
        let old = doc(&[("tags", json!(["a", "b"]))]);
        let new = doc(&[("tags", json!(["a", "c", "d"]))]);
        let diff = diff_documents(&old, &new);

        let nested = diff.changes["tags"].nested.as_ref().expect("nested diff");
        assert_eq!(nested.modifications(), vec!["1"]);
        assert_eq!(nested.additions(), vec!["2"]);
    }

    #[test]
    fn null_and_missing_are_distinct() {
        let old = doc(&[("field", json!(null))]);
        let new = doc(&[]);
        let diff = diff_documents(&old, &new);
        assert_eq!(diff.removals(), vec!["field"]);

        let modified = diff_documents(
            &doc(&[("field", json!(null))]),
            &doc(&[("field", json!(""))]),
        );
        assert_eq!(modified.modifications(), vec!["field"]);
    }

    #[test]
    fn invert_swaps_additions_and_removals() {
        let old = doc(&[("a", json!(1)), ("s", json!("x y"))]);
        let new = doc(&[("b", json!(2)), ("s", json!("x z"))]);
        let diff = diff_documents(&old, &new);
        let inverted = diff.invert();

        assert_eq!(inverted.additions(), vec!["a"]);
        assert_eq!(inverted.removals(), vec!["b"]);
        assert_eq!(inverted.changes["s"].old, Some(json!("x z")));
        assert_eq!(inverted.changes["s"].new, Some(json!("x y")));
        // Inverting back restores the forward diff.
        assert_eq!(inverted.invert(), diff);
    }
}
