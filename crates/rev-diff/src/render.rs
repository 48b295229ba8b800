//! Presentation layers over a [`TextDiff`].
//!
//! Rendering never recomputes anything: every renderer walks the one
//! canonical edit script, so stats and similarity are identical no matter
//! which view the caller picks. Plain text is HTML-escaped before wrapping;
//! inputs that already look like markup are passed through raw with only the
//! change wrappers added.

use crate::text::{OpKind, TextDiff};

/// Heuristic markup detection: the string contains something shaped like a
/// tag (`<` followed by a letter or `/`, closed by `>`).
pub fn looks_like_markup(s: &str) -> bool {
    let mut chars = s.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '<' {
            continue;
        }
        match chars.peek() {
            Some((_, next)) if next.is_ascii_alphabetic() || *next == '/' => {
                if s[i + 1..].contains('>') {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// Escape `&`, angle brackets, and quotes for safe HTML interpolation.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render an inline HTML view of the diff.
///
/// With `markup = false`, text is escaped and wrapped in classed spans.
/// With `markup = true`, equal text passes through untouched and only
/// inserts and deletes get `<ins>`/`<del>` wrappers, so already-valid HTML
/// stays valid.
pub fn render_html(diff: &TextDiff, markup: bool) -> String {
    let mut out = String::new();
    for op in &diff.ops {
        if markup {
            match op.kind {
                OpKind::Equal => out.push_str(&op.text),
                OpKind::Insert => {
                    out.push_str("<ins>");
                    out.push_str(&op.text);
                    out.push_str("</ins>");
                }
                OpKind::Delete => {
                    out.push_str("<del>");
                    out.push_str(&op.text);
                    out.push_str("</del>");
                }
            }
        } else {
            let escaped = escape_html(&op.text);
            match op.kind {
                OpKind::Equal => {
                    out.push_str("<span class=\"diff-equal\">");
                    out.push_str(&escaped);
                    out.push_str("</span>");
                }
                OpKind::Insert => {
                    out.push_str("<span class=\"diff-insert\">");
                    out.push_str(&escaped);
                    out.push_str("</span>");
                }
                OpKind::Delete => {
                    out.push_str("<span class=\"diff-delete\">");
                    out.push_str(&escaped);
                    out.push_str("</span>");
                }
            }
        }
    }
    out
}

/// Render inline HTML, picking the markup mode by sniffing both inputs.
pub fn render_html_auto(diff: &TextDiff) -> String {
    let markup =
        looks_like_markup(&diff.reconstruct_old()) || looks_like_markup(&diff.reconstruct_new());
    render_html(diff, markup)
}

/// Classification of a side-by-side row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    /// Present on both sides.
    Unchanged,
    /// Present only on the right (new) side.
    Added,
    /// Present only on the left (old) side.
    Removed,
}

/// One row in a side-by-side view. `left` is the old side, `right` the new.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SideBySideRow {
    /// Old-side cell, `None` for added rows.
    pub left: Option<String>,
    /// New-side cell, `None` for removed rows.
    pub right: Option<String>,
    /// Row classification.
    pub kind: RowKind,
}

/// Render the diff as side-by-side rows.
///
/// Equal text lands in both columns, deletions only on the left, insertions
/// only on the right. Line-granularity diffs split equal runs per line so
/// the columns stay aligned.
pub fn render_side_by_side(diff: &TextDiff) -> Vec<SideBySideRow> {
    let mut rows = Vec::new();
    for op in &diff.ops {
        match op.kind {
            OpKind::Equal => {
                for piece in split_lines_inclusive(&op.text) {
                    rows.push(SideBySideRow {
                        left: Some(piece.clone()),
                        right: Some(piece),
                        kind: RowKind::Unchanged,
                    });
                }
            }
            OpKind::Delete => {
                for piece in split_lines_inclusive(&op.text) {
                    rows.push(SideBySideRow {
                        left: Some(piece),
                        right: None,
                        kind: RowKind::Removed,
                    });
                }
            }
            OpKind::Insert => {
                for piece in split_lines_inclusive(&op.text) {
                    rows.push(SideBySideRow {
                        left: None,
                        right: Some(piece),
                        kind: RowKind::Added,
                    });
                }
            }
        }
    }
    rows
}

fn split_lines_inclusive(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut pieces = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        current.push(c);
        if c == '\n' {
            pieces.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Render inline HTML with formatting-only change regions left unmarked.
///
/// Semantic groups that touch real content get the usual `<ins>`/`<del>`
/// treatment; groups consisting entirely of whitespace and punctuation are
/// emitted as their new-side text with no wrappers, so markup reflows do not
/// drown out the edits a reviewer cares about.
pub fn render_grouped(diff: &TextDiff) -> String {
    let mut out = String::new();
    let mut run: Vec<&crate::text::DiffOp> = Vec::new();

    let flush = |run: &mut Vec<&crate::text::DiffOp>, out: &mut String| {
        if run.is_empty() {
            return;
        }
        let formatting_only = run
            .iter()
            .all(|op| op.text.chars().all(|c| !c.is_alphanumeric()));
        for op in run.drain(..) {
            if formatting_only {
                // Keep the new-side text, silently.
                if op.kind != OpKind::Delete {
                    out.push_str(&escape_html(&op.text));
                }
            } else {
                match op.kind {
                    OpKind::Insert => {
                        out.push_str("<ins>");
                        out.push_str(&escape_html(&op.text));
                        out.push_str("</ins>");
                    }
                    OpKind::Delete => {
                        out.push_str("<del>");
                        out.push_str(&escape_html(&op.text));
                        out.push_str("</del>");
                    }
                    OpKind::Equal => unreachable!("equal ops are flushed separately"),
                }
            }
        }
    };

    for op in &diff.ops {
        if op.kind == OpKind::Equal {
            flush(&mut run, &mut out);
            out.push_str(&escape_html(&op.text));
        } else {
            run.push(op);
        }
    }
    flush(&mut run, &mut out);
    out
}
