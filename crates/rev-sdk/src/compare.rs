//! The comparison read model.

use serde::{Deserialize, Serialize};

use rev_diff::{
    escape_html, render_grouped, render_html_auto, render_side_by_side, ChangeKind, DiffStats,
    Granularity, PayloadDiff, SideBySideRow,
};
use rev_types::VersionId;

/// The result of comparing two versions: one canonical diff plus derived
/// rendering views.
///
/// All views walk the same stored diff; none recomputes anything, so stats
/// and similarity are identical no matter which view a caller renders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// The older side of the comparison.
    pub from: VersionId,
    /// The newer side of the comparison.
    pub to: VersionId,
    /// Granularity the text diff was computed at.
    pub granularity: Granularity,
    /// The canonical diff.
    pub diff: PayloadDiff,
}

impl Comparison {
    /// Returns `true` if the versions carried identical data.
    pub fn is_unchanged(&self) -> bool {
        self.diff.is_empty()
    }

    /// Similarity score `[0, 100]` for text comparisons.
    pub fn similarity(&self) -> Option<f64> {
        match &self.diff {
            PayloadDiff::Text(t) => Some(t.similarity),
            PayloadDiff::Document(_) => None,
        }
    }

    /// Character and word stats for text comparisons.
    pub fn stats(&self) -> Option<&DiffStats> {
        match &self.diff {
            PayloadDiff::Text(t) => Some(&t.stats),
            PayloadDiff::Document(_) => None,
        }
    }

    /// Inline HTML rendering.
    ///
    /// Text diffs sniff their inputs for markup. Document diffs render one
    /// block per changed field, with inline text diffs where available.
    pub fn html(&self) -> String {
        match &self.diff {
            PayloadDiff::Text(t) => render_html_auto(t),
            PayloadDiff::Document(d) => {
                let mut out = String::new();
                for (field, change) in &d.changes {
                    let kind = match change.kind {
                        ChangeKind::Added => "added",
                        ChangeKind::Removed => "removed",
                        ChangeKind::Modified => "modified",
                    };
                    out.push_str(&format!(
                        "<div class=\"field-diff field-{kind}\" data-field=\"{}\">",
                        escape_html(field)
                    ));
                    if let Some(text) = &change.text {
                        out.push_str(&render_html_auto(text));
                    } else {
                        if let Some(old) = &change.old {
                            out.push_str(&format!("<del>{}</del>", escape_html(&old.to_string())));
                        }
                        if let Some(new) = &change.new {
                            out.push_str(&format!("<ins>{}</ins>", escape_html(&new.to_string())));
                        }
                    }
                    out.push_str("</div>");
                }
                out
            }
        }
    }

    /// Inline HTML with formatting-only change regions left unmarked.
    /// `None` for document comparisons.
    pub fn grouped_html(&self) -> Option<String> {
        match &self.diff {
            PayloadDiff::Text(t) => Some(render_grouped(t)),
            PayloadDiff::Document(_) => None,
        }
    }

    /// Side-by-side rows. `None` for document comparisons.
    pub fn side_by_side(&self) -> Option<Vec<SideBySideRow>> {
        match &self.diff {
            PayloadDiff::Text(t) => Some(render_side_by_side(t)),
            PayloadDiff::Document(_) => None,
        }
    }
}
