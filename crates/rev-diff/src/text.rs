//! Text-level diff: minimal edit scripts over two strings.
//!
//! Uses the `similar` crate (Myers O(ND) diff) at character, word, or line
//! granularity, then post-processes the raw edit script:
//!
//! - adjacent same-kind operations are merged into runs;
//! - single edits pinned between equal runs are slid to natural whitespace
//!   and punctuation boundaries, so a one-word insertion does not show up as
//!   a ragged cluster of single-character edits;
//! - runs of edits are grouped into [`SemanticGroup`]s tagged as content vs
//!   formatting changes, for noise filtering in rendering and risk scoring.
//!
//! Similarity is `2 * equal_chars / (len_old + len_new) * 100`, defined as
//! 100 when both inputs are empty. Word-level stats come from a second diff
//! over whitespace-tokenized sequences.

use serde::{Deserialize, Serialize};
use similar::{capture_diff_slices, Algorithm, ChangeTag};

/// Token unit the diff is computed over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Character by character.
    Character,
    /// Whitespace-delimited words (whitespace runs are their own tokens).
    #[default]
    Word,
    /// Line by line.
    Line,
}

/// The kind of a diff operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    /// Text present in both inputs.
    Equal,
    /// Text present only in the new input.
    Insert,
    /// Text present only in the old input.
    Delete,
}

impl OpKind {
    /// The kind this op takes in the reverse diff.
    pub fn invert(&self) -> Self {
        match self {
            Self::Equal => Self::Equal,
            Self::Insert => Self::Delete,
            Self::Delete => Self::Insert,
        }
    }
}

/// One operation in the edit script.
///
/// `position` is a character offset: into the new text for `Equal` and
/// `Insert` ops, into the old text for `Delete` ops.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOp {
    /// Operation kind.
    pub kind: OpKind,
    /// The text this operation covers.
    pub text: String,
    /// Character offset where the operation applies (see type docs).
    pub position: usize,
}

/// Character and word counts for a diff.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    /// Characters present only in the new text.
    pub chars_added: usize,
    /// Characters present only in the old text.
    pub chars_removed: usize,
    /// Characters common to both texts.
    pub chars_unchanged: usize,
    /// Words present only in the new text.
    pub words_added: usize,
    /// Words present only in the old text.
    pub words_removed: usize,
    /// Words common to both texts.
    pub words_unchanged: usize,
}

/// A run of consecutive edit operations, tagged for noise filtering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticGroup {
    /// The consecutive non-equal operations forming this change region.
    pub ops: Vec<DiffOp>,
    /// The group touches real content (a run of three or more word
    /// characters somewhere in its text).
    pub is_content_change: bool,
    /// The group consists entirely of whitespace and punctuation.
    pub is_formatting_change: bool,
}

/// The result of diffing two strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextDiff {
    /// Token unit the edit script was computed over.
    pub granularity: Granularity,
    /// The edit script, in order. Concatenating `Equal` + `Delete` text
    /// reconstructs the old input; `Equal` + `Insert` reconstructs the new.
    pub ops: Vec<DiffOp>,
    /// Character and word counts.
    pub stats: DiffStats,
    /// Similarity score in `[0, 100]`. 100 for identical inputs (including
    /// empty/empty).
    pub similarity: f64,
}

impl TextDiff {
    /// Returns `true` if the inputs differed.
    pub fn has_changes(&self) -> bool {
        self.ops.iter().any(|op| op.kind != OpKind::Equal)
    }

    /// Rebuild the old input from the edit script.
    pub fn reconstruct_old(&self) -> String {
        self.ops
            .iter()
            .filter(|op| op.kind != OpKind::Insert)
            .map(|op| op.text.as_str())
            .collect()
    }

    /// Rebuild the new input from the edit script.
    pub fn reconstruct_new(&self) -> String {
        self.ops
            .iter()
            .filter(|op| op.kind != OpKind::Delete)
            .map(|op| op.text.as_str())
            .collect()
    }

    /// The reverse diff: insert and delete kinds swapped, positions
    /// recomputed for the swapped direction, add/remove stats exchanged.
    ///
    /// `diff(a, b).invert()` is a valid diff from `b` to `a`, so reversed
    /// comparisons never need a second computation.
    pub fn invert(&self) -> TextDiff {
        let runs: Vec<(OpKind, String)> = self
            .ops
            .iter()
            .map(|op| (op.kind.invert(), op.text.clone()))
            .collect();
        TextDiff {
            granularity: self.granularity,
            ops: assign_positions(runs),
            stats: DiffStats {
                chars_added: self.stats.chars_removed,
                chars_removed: self.stats.chars_added,
                chars_unchanged: self.stats.chars_unchanged,
                words_added: self.stats.words_removed,
                words_removed: self.stats.words_added,
                words_unchanged: self.stats.words_unchanged,
            },
            similarity: self.similarity,
        }
    }

    /// Group consecutive edit operations into change regions.
    ///
    /// Equal runs separate groups and are not part of any group.
    pub fn semantic_groups(&self) -> Vec<SemanticGroup> {
        let mut groups = Vec::new();
        let mut current: Vec<DiffOp> = Vec::new();

        for op in &self.ops {
            if op.kind == OpKind::Equal {
                if !current.is_empty() {
                    groups.push(make_group(std::mem::take(&mut current)));
                }
            } else {
                current.push(op.clone());
            }
        }
        if !current.is_empty() {
            groups.push(make_group(current));
        }
        groups
    }
}

fn make_group(ops: Vec<DiffOp>) -> SemanticGroup {
    let is_content_change = ops.iter().any(|op| has_word_run(&op.text, 3));
    let is_formatting_change = ops
        .iter()
        .all(|op| op.text.chars().all(|c| !c.is_alphanumeric()));
    SemanticGroup {
        ops,
        is_content_change,
        is_formatting_change,
    }
}

/// Does `text` contain a run of at least `min` consecutive word characters?
fn has_word_run(text: &str, min: usize) -> bool {
    let mut run = 0usize;
    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            run += 1;
            if run >= min {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Options for [`diff_text_with`].
#[derive(Clone, Copy, Debug)]
pub struct TextDiffOptions {
    /// Token unit for the edit script.
    pub granularity: Granularity,
    /// Inputs longer than this (in bytes) skip the minimal-edit computation
    /// and degrade to a whole-string replace. Large documents belong in a
    /// background job, not an inline O(ND) pass.
    pub max_len: usize,
}

impl Default for TextDiffOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::Word,
            max_len: 1024 * 1024,
        }
    }
}

/// Diff two strings at the given granularity with default limits.
pub fn diff_text(old: &str, new: &str, granularity: Granularity) -> TextDiff {
    diff_text_with(
        old,
        new,
        TextDiffOptions {
            granularity,
            ..TextDiffOptions::default()
        },
    )
}

/// Diff two strings with explicit options.
///
/// Never fails: any two strings (including empty ones) produce a valid
/// result whose edit script reconstructs both inputs exactly.
pub fn diff_text_with(old: &str, new: &str, options: TextDiffOptions) -> TextDiff {
    let len_old = old.chars().count();
    let len_new = new.chars().count();

    if old == new {
        let ops = if old.is_empty() {
            Vec::new()
        } else {
            vec![DiffOp {
                kind: OpKind::Equal,
                text: old.to_string(),
                position: 0,
            }]
        };
        let word_count = old.split_whitespace().count();
        return TextDiff {
            granularity: options.granularity,
            ops,
            stats: DiffStats {
                chars_unchanged: len_old,
                words_unchanged: word_count,
                ..DiffStats::default()
            },
            similarity: 100.0,
        };
    }

    let mut runs = if old.len() > options.max_len || new.len() > options.max_len {
        // Degraded whole-string replace for oversized inputs.
        let mut runs = Vec::new();
        if !old.is_empty() {
            runs.push((OpKind::Delete, old.to_string()));
        }
        if !new.is_empty() {
            runs.push((OpKind::Insert, new.to_string()));
        }
        runs
    } else {
        let runs = match options.granularity {
            Granularity::Character => coalesce(&similar::TextDiff::from_chars(old, new)),
            Granularity::Word => coalesce(&similar::TextDiff::from_words(old, new)),
            Granularity::Line => coalesce(&similar::TextDiff::from_lines(old, new)),
        };
        runs
    };

    // Line diffs already sit on line boundaries; sliding would move edits
    // across lines.
    if !matches!(options.granularity, Granularity::Line) {
        slide_to_boundaries(&mut runs);
    }
    merge_adjacent(&mut runs);

    let ops = assign_positions(runs);
    let mut stats = char_stats(&ops);
    let (words_added, words_removed, words_unchanged) = word_stats(old, new);
    stats.words_added = words_added;
    stats.words_removed = words_removed;
    stats.words_unchanged = words_unchanged;

    let similarity = if len_old + len_new == 0 {
        100.0
    } else {
        2.0 * stats.chars_unchanged as f64 / (len_old + len_new) as f64 * 100.0
    };

    TextDiff {
        granularity: options.granularity,
        ops,
        stats,
        similarity,
    }
}

/// Collect the raw change stream into coalesced same-kind runs.
fn coalesce<'a>(diff: &similar::TextDiff<'a, 'a, 'a, str>) -> Vec<(OpKind, String)> {
    let mut runs: Vec<(OpKind, String)> = Vec::new();
    for change in diff.iter_all_changes() {
        let kind = match change.tag() {
            ChangeTag::Equal => OpKind::Equal,
            ChangeTag::Insert => OpKind::Insert,
            ChangeTag::Delete => OpKind::Delete,
        };
        match runs.last_mut() {
            Some((k, text)) if *k == kind => text.push_str(change.value()),
            _ => runs.push((kind, change.value().to_string())),
        }
    }
    runs
}

/// Merge adjacent same-kind runs and drop empty ones.
fn merge_adjacent(runs: &mut Vec<(OpKind, String)>) {
    let mut merged: Vec<(OpKind, String)> = Vec::with_capacity(runs.len());
    for (kind, text) in runs.drain(..) {
        if text.is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some((k, t)) if *k == kind => t.push_str(&text),
            _ => merged.push((kind, text)),
        }
    }
    *runs = merged;
}

/// Slide single edits pinned between two equal runs toward natural
/// boundaries (line breaks, whitespace, punctuation).
///
/// An edit can shift left while the preceding equal run ends with the same
/// character the edit ends with, and right while the edit starts with the
/// same character the following equal run starts with; both rotations leave
/// the reconstructed texts untouched. Among reachable alignments the
/// best-scoring boundary wins, latest on ties so edits settle at the start
/// of the token they replace.
fn slide_to_boundaries(runs: &mut [(OpKind, String)]) {
    let mut i = 1;
    while i + 1 < runs.len() {
        if runs[i - 1].0 == OpKind::Equal
            && runs[i + 1].0 == OpKind::Equal
            && runs[i].0 != OpKind::Equal
        {
            let mut eq1 = runs[i - 1].1.clone();
            let mut edit = runs[i].1.clone();
            let mut eq2 = runs[i + 1].1.clone();

            // Shift the edit as far left as it can go.
            while let (Some(last_eq), Some(last_edit)) =
                (eq1.chars().last(), edit.chars().last())
            {
                if last_eq != last_edit {
                    break;
                }
                eq1.pop();
                edit.pop();
                edit.insert(0, last_edit);
                eq2.insert(0, last_eq);
            }

            // Walk right one character at a time, keeping the best boundary.
            let mut best = (eq1.clone(), edit.clone(), eq2.clone());
            let mut best_score = boundary_score(&eq1, &eq2);
            loop {
                let first = match (edit.chars().next(), eq2.chars().next()) {
                    (Some(a), Some(b)) if a == b => a,
                    _ => break,
                };
                eq1.push(first);
                edit.remove(0);
                edit.push(first);
                eq2.remove(0);

                let score = boundary_score(&eq1, &eq2);
                if score >= best_score {
                    best_score = score;
                    best = (eq1.clone(), edit.clone(), eq2.clone());
                }
            }

            runs[i - 1].1 = best.0;
            runs[i].1 = best.1;
            runs[i + 1].1 = best.2;
        }
        i += 1;
    }
}

/// Score how natural a split between `before` and `after` is.
fn boundary_score(before: &str, after: &str) -> u32 {
    let mut score = 0;
    match before.chars().last() {
        None => score += 3,
        Some('\n') => score += 3,
        Some(c) if c.is_whitespace() => score += 2,
        Some(c) if !c.is_alphanumeric() => score += 1,
        _ => {}
    }
    match after.chars().next() {
        None => score += 3,
        Some('\n') => score += 3,
        Some(c) if c.is_whitespace() => score += 2,
        Some(c) if !c.is_alphanumeric() => score += 1,
        _ => {}
    }
    score
}

/// Turn coalesced runs into ops with character positions.
fn assign_positions(runs: Vec<(OpKind, String)>) -> Vec<DiffOp> {
    let mut old_pos = 0usize;
    let mut new_pos = 0usize;
    let mut ops = Vec::with_capacity(runs.len());
    for (kind, text) in runs {
        if text.is_empty() {
            continue;
        }
        let chars = text.chars().count();
        let position = match kind {
            OpKind::Equal | OpKind::Insert => new_pos,
            OpKind::Delete => old_pos,
        };
        match kind {
            OpKind::Equal => {
                old_pos += chars;
                new_pos += chars;
            }
            OpKind::Insert => new_pos += chars,
            OpKind::Delete => old_pos += chars,
        }
        ops.push(DiffOp {
            kind,
            text,
            position,
        });
    }
    ops
}

fn char_stats(ops: &[DiffOp]) -> DiffStats {
    let mut stats = DiffStats::default();
    for op in ops {
        let chars = op.text.chars().count();
        match op.kind {
            OpKind::Equal => stats.chars_unchanged += chars,
            OpKind::Insert => stats.chars_added += chars,
            OpKind::Delete => stats.chars_removed += chars,
        }
    }
    stats
}

/// Word counts from a second diff over whitespace-tokenized sequences.
fn word_stats(old: &str, new: &str) -> (usize, usize, usize) {
    let old_words: Vec<&str> = old.split_whitespace().collect();
    let new_words: Vec<&str> = new.split_whitespace().collect();

    let mut added = 0usize;
    let mut removed = 0usize;
    let mut unchanged = 0usize;
    for op in capture_diff_slices(Algorithm::Myers, &old_words, &new_words) {
        match op {
            similar::DiffOp::Equal { len, .. } => unchanged += len,
            similar::DiffOp::Delete { old_len, .. } => removed += old_len,
            similar::DiffOp::Insert { new_len, .. } => added += new_len,
            similar::DiffOp::Replace {
                old_len, new_len, ..
            } => {
                removed += old_len;
                added += new_len;
            }
        }
    }
    (added, removed, unchanged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn equal_chars(diff: &TextDiff) -> usize {
        diff.stats.chars_unchanged
    }

    // -----------------------------------------------------------------------
    // Identity and empty inputs
    // -----------------------------------------------------------------------

    #[test]
    fn identical_strings_full_similarity() {
        for granularity in [Granularity::Character, Granularity::Word, Granularity::Line] {
            let diff = diff_text("same text here", "same text here", granularity);
            assert_eq!(diff.similarity, 100.0);
            assert!(!diff.has_changes());
            assert!(diff.ops.iter().all(|op| op.kind == OpKind::Equal));
        }
    }

    #[test]
    fn empty_vs_empty_is_similarity_100() {
        let diff = diff_text("", "", Granularity::Character);
        assert_eq!(diff.similarity, 100.0);
        assert!(diff.ops.is_empty());
    }

    #[test]
    fn empty_to_content_is_pure_insert() {
        let diff = diff_text("", "new content", Granularity::Word);
        assert_eq!(diff.similarity, 0.0);
        assert_eq!(diff.ops.len(), 1);
        assert_eq!(diff.ops[0].kind, OpKind::Insert);
        assert_eq!(diff.ops[0].text, "new content");
    }

    #[test]
    fn content_to_empty_is_pure_delete() {
        let diff = diff_text("old content", "", Granularity::Word);
        assert_eq!(diff.similarity, 0.0);
        assert_eq!(diff.ops.len(), 1);
        assert_eq!(diff.ops[0].kind, OpKind::Delete);
    }

    // -----------------------------------------------------------------------
    // Round-trip law
    // -----------------------------------------------------------------------

    #[test]
    fn ops_reconstruct_both_inputs() {
        let old = "the quick brown fox\njumps over the dog";
        let new = "the slow brown fox\nleaps over the lazy dog";
        for granularity in [Granularity::Character, Granularity::Word, Granularity::Line] {
            let diff = diff_text(old, new, granularity);
            assert_eq!(diff.reconstruct_old(), old, "{granularity:?}");
            assert_eq!(diff.reconstruct_new(), new, "{granularity:?}");
        }
    }

    proptest! {
        #[test]
        fn reconstruction_roundtrip(old in ".{0,80}", new in ".{0,80}") {
            for granularity in [Granularity::Character, Granularity::Word] {
                let diff = diff_text(&old, &new, granularity);
                prop_assert_eq!(diff.reconstruct_old(), old.clone());
                prop_assert_eq!(diff.reconstruct_new(), new.clone());
            }
        }

        #[test]
        fn self_diff_is_all_equal(s in ".{0,80}") {
            let diff = diff_text(&s, &s, Granularity::Character);
            prop_assert_eq!(diff.similarity, 100.0);
            prop_assert!(diff.ops.iter().all(|op| op.kind == OpKind::Equal));
        }

        #[test]
        fn invert_twice_is_identity(old in ".{0,60}", new in ".{0,60}") {
            let diff = diff_text(&old, &new, Granularity::Character);
            prop_assert_eq!(diff.invert().invert(), diff);
        }
    }

    // -----------------------------------------------------------------------
    // Inversion
    // -----------------------------------------------------------------------

    #[test]
    fn invert_swaps_kinds_and_reconstructs_reversed() {
        let diff = diff_text("alpha beta", "alpha gamma", Granularity::Word);
        let inverted = diff.invert();
        assert_eq!(inverted.reconstruct_old(), "alpha gamma");
        assert_eq!(inverted.reconstruct_new(), "alpha beta");
        assert_eq!(inverted.similarity, diff.similarity);
        assert_eq!(inverted.stats.chars_added, diff.stats.chars_removed);
        assert_eq!(inverted.stats.words_added, diff.stats.words_removed);
    }

    // -----------------------------------------------------------------------
    // Similarity formula
    // -----------------------------------------------------------------------

    #[test]
    fn similarity_matches_equal_char_formula() {
        let old = "hello world";
        let new = "hello there world";
        let diff = diff_text(old, new, Granularity::Character);

        let expected = 2.0 * equal_chars(&diff) as f64
            / (old.chars().count() + new.chars().count()) as f64
            * 100.0;
        assert_eq!(diff.similarity, expected);
        // The entire old string survives in the new one.
        assert_eq!(equal_chars(&diff), old.chars().count());
    }

    #[test]
    fn hello_there_world_is_one_insert() {
        let diff = diff_text("hello world", "hello there world", Granularity::Character);
        let inserts: Vec<&DiffOp> = diff
            .ops
            .iter()
            .filter(|op| op.kind == OpKind::Insert)
            .collect();
        assert_eq!(inserts.len(), 1);
        assert_eq!(inserts[0].text.trim(), "there");
        assert!(diff.ops.iter().all(|op| op.kind != OpKind::Delete));
    }

    // -----------------------------------------------------------------------
    // Stats
    // -----------------------------------------------------------------------

    #[test]
    fn word_stats_count_tokens() {
        let diff = diff_text("one two three", "one four three", Granularity::Word);
        assert_eq!(diff.stats.words_unchanged, 2);
        assert_eq!(diff.stats.words_added, 1);
        assert_eq!(diff.stats.words_removed, 1);
    }

    #[test]
    fn char_stats_sum_to_input_lengths() {
        let old = "abcdef";
        let new = "abXdef";
        let diff = diff_text(old, new, Granularity::Character);
        assert_eq!(
            diff.stats.chars_unchanged + diff.stats.chars_removed,
            old.chars().count()
        );
        assert_eq!(
            diff.stats.chars_unchanged + diff.stats.chars_added,
            new.chars().count()
        );
    }

    // -----------------------------------------------------------------------
    // Positions
    // -----------------------------------------------------------------------

    #[test]
    fn insert_positions_index_into_new_text() {
        let diff = diff_text("ab", "aXb", Granularity::Character);
        let insert = diff
            .ops
            .iter()
            .find(|op| op.kind == OpKind::Insert)
            .expect("one insert");
        let new_text: Vec<char> = "aXb".chars().collect();
        assert_eq!(new_text[insert.position], 'X');
    }

    #[test]
    fn delete_positions_index_into_old_text() {
        let diff = diff_text("aXb", "ab", Granularity::Character);
        let delete = diff
            .ops
            .iter()
            .find(|op| op.kind == OpKind::Delete)
            .expect("one delete");
        let old_text: Vec<char> = "aXb".chars().collect();
        assert_eq!(old_text[delete.position], 'X');
    }

    // -----------------------------------------------------------------------
    // Boundary sliding
    // -----------------------------------------------------------------------

    #[test]
    fn edits_settle_on_word_boundaries() {
        // A naive Myers alignment can split "there " across boundaries; the
        // slide pass should park the whole edit at a whitespace edge.
        let diff = diff_text("hello world", "hello there world", Granularity::Character);
        for op in diff.ops.iter().filter(|op| op.kind == OpKind::Insert) {
            assert_eq!(op.text.trim(), "there");
        }
    }

    #[test]
    fn line_granularity_keeps_line_runs() {
        let diff = diff_text("a\nb\nc\n", "a\nX\nc\n", Granularity::Line);
        let deleted: String = diff
            .ops
            .iter()
            .filter(|op| op.kind == OpKind::Delete)
            .map(|op| op.text.as_str())
            .collect();
        assert_eq!(deleted, "b\n");
    }

    // -----------------------------------------------------------------------
    // Semantic groups
    // -----------------------------------------------------------------------

    #[test]
    fn content_change_tagged() {
        let diff = diff_text("intro text", "intro updated text", Granularity::Word);
        let groups = diff.semantic_groups();
        assert_eq!(groups.len(), 1);
        assert!(groups[0].is_content_change);
        assert!(!groups[0].is_formatting_change);
    }

    #[test]
    fn whitespace_only_change_is_formatting() {
        let diff = diff_text("a b", "a  b", Granularity::Character);
        let groups = diff.semantic_groups();
        assert!(!groups.is_empty());
        assert!(groups.iter().all(|g| g.is_formatting_change));
        assert!(groups.iter().all(|g| !g.is_content_change));
    }

    #[test]
    fn short_token_is_not_content_change() {
        // "ab" has no run of three word characters.
        let diff = diff_text("x y", "x ab y", Granularity::Word);
        let groups = diff.semantic_groups();
        assert!(groups.iter().all(|g| !g.is_content_change));
    }

    // -----------------------------------------------------------------------
    // Oversized inputs degrade instead of blocking
    // -----------------------------------------------------------------------

    #[test]
    fn oversized_input_degrades_to_replace() {
        let old = "a".repeat(64);
        let new = "b".repeat(64);
        let diff = diff_text_with(
            &old,
            &new,
            TextDiffOptions {
                granularity: Granularity::Character,
                max_len: 16,
            },
        );
        assert_eq!(diff.ops.len(), 2);
        assert_eq!(diff.ops[0].kind, OpKind::Delete);
        assert_eq!(diff.ops[1].kind, OpKind::Insert);
        assert_eq!(diff.reconstruct_old(), old);
        assert_eq!(diff.reconstruct_new(), new);
    }

    #[test]
    fn oversized_identical_input_still_full_similarity() {
        let text = "same".repeat(64);
        let diff = diff_text_with(
            &text,
            &text,
            TextDiffOptions {
                granularity: Granularity::Word,
                max_len: 16,
            },
        );
        assert_eq!(diff.similarity, 100.0);
    }

    // -----------------------------------------------------------------------
    // Unicode safety
    // -----------------------------------------------------------------------

    #[test]
    fn multibyte_text_roundtrips() {
        let old = "naïve café";
        let new = "naïve théâtre";
        let diff = diff_text(old, new, Granularity::Character);
        assert_eq!(diff.reconstruct_old(), old);
        assert_eq!(diff.reconstruct_new(), new);
    }
}
