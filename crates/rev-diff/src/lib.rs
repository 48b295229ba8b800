//! Diff engines for the content revision core.
//!
//! Computes fine-grained diffs between version payloads, producing structured
//! change sets for text (character, word, or line granularity) and for
//! key-value documents (recursive field-level changes).
//!
//! Diffing is pure and total: it never fails for any pair of inputs,
//! including empty ones. Rendering ([`render`]) is a presentation concern
//! layered over one canonical result and never affects stats or similarity.
//!
//! # Key Types
//!
//! - [`TextDiff`] / [`DiffOp`] / [`SemanticGroup`] — text-level diff
//! - [`DocumentDiff`] / [`FieldChange`] — field-level document diff
//! - [`PayloadDiff`] — either of the above, for a version payload pair

pub mod document;
pub mod render;
pub mod text;

pub use document::{diff_documents, ChangeKind, DocumentDiff, FieldChange};
pub use render::{
    escape_html, looks_like_markup, render_grouped, render_html, render_html_auto,
    render_side_by_side, RowKind, SideBySideRow,
};
pub use text::{
    diff_text, diff_text_with, DiffOp, DiffStats, Granularity, OpKind, SemanticGroup, TextDiff,
    TextDiffOptions,
};

use serde::{Deserialize, Serialize};

use rev_types::VersionData;

/// The diff between two version payloads.
///
/// Two text payloads produce a [`TextDiff`]; any other combination is
/// compared field-by-field as documents (text payloads surface as a
/// single-field `body` document on the structured side).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PayloadDiff {
    /// Text-to-text comparison.
    Text(TextDiff),
    /// Field-level document comparison.
    Document(DocumentDiff),
}

impl PayloadDiff {
    /// Returns `true` if the payloads were identical.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(d) => !d.has_changes(),
            Self::Document(d) => d.is_empty(),
        }
    }

    /// The reverse diff: insertions and deletions (additions and removals)
    /// swapped. `diff(a, b).invert()` describes `diff(b, a)`.
    pub fn invert(&self) -> Self {
        match self {
            Self::Text(d) => Self::Text(d.invert()),
            Self::Document(d) => Self::Document(d.invert()),
        }
    }
}

/// Diff two version payloads at the given text granularity.
pub fn diff_payloads(old: &VersionData, new: &VersionData, granularity: Granularity) -> PayloadDiff {
    match (old, new) {
        (VersionData::Text(a), VersionData::Text(b)) => {
            PayloadDiff::Text(diff_text(a, b, granularity))
        }
        _ => PayloadDiff::Document(diff_documents(&old.to_document(), &new.to_document())),
    }
}
