//! Three-way merge over key-value documents.
//!
//! All decisions compare three states of a field: the common ancestor
//! (`base`), the main line (`main`), and the branch. A field changed on
//! only one side auto-resolves to that side; a true conflict needs both
//! sides to have changed it, differently. Unresolved conflicts come back as
//! data, never as errors.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use rev_types::Document;

/// How conflicting fields are resolved during a merge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Keep main's value on every conflicting field.
    Ours,
    /// Take the branch's value on every conflicting field.
    Theirs,
    /// Field-aware resolution: composite values (objects, arrays) are
    /// union-merged with the branch winning key collisions; scalar
    /// conflicts stay unresolved.
    Smart,
    /// Caller-supplied resolution map from field name to winning value.
    /// Conflicting fields absent from the map stay unresolved.
    Custom(BTreeMap<String, Value>),
}

/// A field both sides changed, differently, relative to the base.
///
/// `None` means the side removed the field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldConflict {
    /// The conflicting field name.
    pub field: String,
    /// The common-ancestor value.
    pub base: Option<Value>,
    /// Main's value.
    pub main: Option<Value>,
    /// The branch's value.
    pub branch: Option<Value>,
}

/// The result of a three-way merge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MergeOutcome {
    /// Every field resolved; the merged document is ready to save.
    Merged(Document),
    /// Some fields could not be resolved under the chosen strategy. The
    /// merged document carries main's value for each unresolved field so a
    /// caller can still display a best-effort result.
    Conflicted {
        merged: Document,
        conflicts: Vec<FieldConflict>,
    },
}

impl MergeOutcome {
    /// Returns `true` if the merge resolved every field.
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Merged(_))
    }

    /// The merged document, complete or best-effort.
    pub fn document(&self) -> &Document {
        match self {
            Self::Merged(doc) | Self::Conflicted { merged: doc, .. } => doc,
        }
    }

    /// Unresolved conflicts, empty for a clean merge.
    pub fn conflicts(&self) -> &[FieldConflict] {
        match self {
            Self::Merged(_) => &[],
            Self::Conflicted { conflicts, .. } => conflicts,
        }
    }
}

/// Find the fields that are true conflicts between main and branch.
///
/// A field conflicts only when both sides differ from the base and from
/// each other. One-sided changes (including one-sided removals) are not
/// conflicts.
pub fn find_conflicts(base: &Document, main: &Document, branch: &Document) -> Vec<FieldConflict> {
    field_union(base, main, branch)
        .into_iter()
        .filter_map(|field| {
            let b = base.get(&field);
            let m = main.get(&field);
            let r = branch.get(&field);
            let main_changed = m != b;
            let branch_changed = r != b;
            if main_changed && branch_changed && m != r {
                Some(FieldConflict {
                    field,
                    base: b.cloned(),
                    main: m.cloned(),
                    branch: r.cloned(),
                })
            } else {
                None
            }
        })
        .collect()
}

/// Merge `branch` into `main` against the common ancestor `base`.
pub fn merge_documents(
    base: &Document,
    main: &Document,
    branch: &Document,
    strategy: &MergeStrategy,
) -> MergeOutcome {
    let mut merged = Document::new();
    let mut conflicts = Vec::new();

    for field in field_union(base, main, branch) {
        let b = base.get(&field);
        let m = main.get(&field);
        let r = branch.get(&field);
        let main_changed = m != b;
        let branch_changed = r != b;

        let resolved: Option<Value> = if !main_changed && !branch_changed {
            b.cloned()
        } else if main_changed && !branch_changed {
            m.cloned()
        } else if branch_changed && !main_changed {
            r.cloned()
        } else if m == r {
            // Both sides made the same change.
            m.cloned()
        } else {
            match resolve_conflict(&field, m, r, strategy) {
                Some(winner) => winner,
                None => {
                    conflicts.push(FieldConflict {
                        field: field.clone(),
                        base: b.cloned(),
                        main: m.cloned(),
                        branch: r.cloned(),
                    });
                    // Best-effort output keeps main's side.
                    m.cloned()
                }
            }
        };

        if let Some(value) = resolved {
            merged.insert(field, value);
        }
    }

    if conflicts.is_empty() {
        MergeOutcome::Merged(merged)
    } else {
        tracing::debug!(count = conflicts.len(), "merge left unresolved conflicts");
        MergeOutcome::Conflicted { merged, conflicts }
    }
}

/// Resolve one conflicting field per the strategy. `None` inside the outer
/// `Some` means "the winner removed the field"; outer `None` means
/// unresolved.
#[allow(clippy::type_complexity)]
fn resolve_conflict(
    field: &str,
    main: Option<&Value>,
    branch: Option<&Value>,
    strategy: &MergeStrategy,
) -> Option<Option<Value>> {
    match strategy {
        MergeStrategy::Ours => Some(main.cloned()),
        MergeStrategy::Theirs => Some(branch.cloned()),
        MergeStrategy::Custom(resolutions) => {
            resolutions.get(field).map(|value| Some(value.clone()))
        }
        MergeStrategy::Smart => match (main, branch) {
            (Some(Value::Object(m)), Some(Value::Object(r))) => {
                // Key-level union; the branch wins collisions.
                let mut union = m.clone();
                for (k, v) in r {
                    union.insert(k.clone(), v.clone());
                }
                Some(Some(Value::Object(union)))
            }
            (Some(Value::Array(m)), Some(Value::Array(r))) => {
                // Index-level union: branch values win per index, the
                // longer side keeps its tail.
                let mut union: Vec<Value> = r.clone();
                if m.len() > r.len() {
                    union.extend_from_slice(&m[r.len()..]);
                }
                Some(Some(Value::Array(union)))
            }
            _ => None,
        },
    }
}

fn field_union(base: &Document, main: &Document, branch: &Document) -> Vec<String> {
    let keys: BTreeSet<&String> = base
        .keys()
        .chain(main.keys())
        .chain(branch.keys())
        .collect();
    keys.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(pairs: &[(&str, Value)]) -> Document {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn base() -> Document {
        doc(&[
            ("title", json!("original title")),
            ("body", json!("original body")),
            ("tags", json!(["a"])),
        ])
    }

    // -----------------------------------------------------------------------
    // Conflict detection
    // -----------------------------------------------------------------------

    #[test]
    fn one_sided_change_is_not_a_conflict() {
        let main = doc(&[
            ("title", json!("main title")),
            ("body", json!("original body")),
            ("tags", json!(["a"])),
        ]);
        let branch = doc(&[
            ("title", json!("original title")),
            ("body", json!("branch body")),
            ("tags", json!(["a"])),
        ]);
        assert!(find_conflicts(&base(), &main, &branch).is_empty());
    }

    #[test]
    fn both_sides_changed_differently_is_a_conflict() {
        let main = doc(&[("title", json!("main title"))]);
        let branch = doc(&[("title", json!("branch title"))]);
        let base = doc(&[("title", json!("original"))]);

        let conflicts = find_conflicts(&base, &main, &branch);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].field, "title");
        assert_eq!(conflicts[0].base, Some(json!("original")));
        assert_eq!(conflicts[0].main, Some(json!("main title")));
        assert_eq!(conflicts[0].branch, Some(json!("branch title")));
    }

    #[test]
    fn identical_changes_on_both_sides_do_not_conflict() {
        let base = doc(&[("title", json!("old"))]);
        let same = doc(&[("title", json!("new"))]);
        assert!(find_conflicts(&base, &same, &same.clone()).is_empty());
    }

    #[test]
    fn removal_against_edit_is_a_conflict() {
        let base = doc(&[("title", json!("old"))]);
        let main = doc(&[]); // removed
        let branch = doc(&[("title", json!("edited"))]);

        let conflicts = find_conflicts(&base, &main, &branch);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].main, None);
    }

    // -----------------------------------------------------------------------
    // Merging
    // -----------------------------------------------------------------------

    #[test]
    fn one_sided_changes_auto_resolve() {
        let main = doc(&[
            ("title", json!("main title")),
            ("body", json!("original body")),
            ("tags", json!(["a"])),
        ]);
        let branch = doc(&[
            ("title", json!("original title")),
            ("body", json!("branch body")),
            ("tags", json!(["a"])),
        ]);

        let outcome = merge_documents(&base(), &main, &branch, &MergeStrategy::Smart);
        assert!(outcome.is_clean());
        assert_eq!(outcome.document()["title"], json!("main title"));
        assert_eq!(outcome.document()["body"], json!("branch body"));
    }

    #[test]
    fn ours_keeps_main_on_conflict() {
        let base = doc(&[("title", json!("old"))]);
        let main = doc(&[("title", json!("main"))]);
        let branch = doc(&[("title", json!("branch"))]);

        let outcome = merge_documents(&base, &main, &branch, &MergeStrategy::Ours);
        assert!(outcome.is_clean());
        assert_eq!(outcome.document()["title"], json!("main"));
    }

    #[test]
    fn theirs_takes_branch_on_conflict() {
        let base = doc(&[("title", json!("old"))]);
        let main = doc(&[("title", json!("main"))]);
        let branch = doc(&[("title", json!("branch"))]);

        let outcome = merge_documents(&base, &main, &branch, &MergeStrategy::Theirs);
        assert!(outcome.is_clean());
        assert_eq!(outcome.document()["title"], json!("branch"));
    }

    #[test]
    fn theirs_honors_branch_removal() {
        let base = doc(&[("title", json!("old"))]);
        let main = doc(&[("title", json!("main"))]);
        let branch = doc(&[]);

        let outcome = merge_documents(&base, &main, &branch, &MergeStrategy::Theirs);
        assert!(outcome.is_clean());
        assert!(!outcome.document().contains_key("title"));
    }

    #[test]
    fn smart_unions_composite_fields() {
        let base = doc(&[("meta", json!({"a": 1}))]);
        let main = doc(&[("meta", json!({"a": 1, "b": 2}))]);
        let branch = doc(&[("meta", json!({"a": 9, "c": 3}))]);

        let outcome = merge_documents(&base, &main, &branch, &MergeStrategy::Smart);
        assert!(outcome.is_clean());
        // Branch wins the "a" collision; both new keys survive.
        assert_eq!(
            outcome.document()["meta"],
            json!({"a": 9, "b": 2, "c": 3})
        );
    }

    #[test]
    fn smart_unions_arrays_by_index() {
        let base = doc(&[("tags", json!(["a"]))]);
        let main = doc(&[("tags", json!(["x", "m"]))]);
        let branch = doc(&[("tags", json!(["y"]))]);

        let outcome = merge_documents(&base, &main, &branch, &MergeStrategy::Smart);
        assert!(outcome.is_clean());
        assert_eq!(outcome.document()["tags"], json!(["y", "m"]));
    }

    #[test]
    fn smart_leaves_scalar_conflicts_unresolved() {
        let base = doc(&[("title", json!("old"))]);
        let main = doc(&[("title", json!("main"))]);
        let branch = doc(&[("title", json!("branch"))]);

        let outcome = merge_documents(&base, &main, &branch, &MergeStrategy::Smart);
        assert!(!outcome.is_clean());
        assert_eq!(outcome.conflicts().len(), 1);
        assert_eq!(outcome.conflicts()[0].field, "title");
        // Best-effort output keeps main's side.
        assert_eq!(outcome.document()["title"], json!("main"));
    }

    #[test]
    fn custom_resolves_mapped_fields_only() {
        let base = doc(&[("title", json!("old")), ("body", json!("old body"))]);
        let main = doc(&[("title", json!("main")), ("body", json!("main body"))]);
        let branch = doc(&[("title", json!("branch")), ("body", json!("branch body"))]);

        let mut resolutions = BTreeMap::new();
        resolutions.insert("title".to_string(), json!("hand-picked"));
        let outcome = merge_documents(
            &base,
            &main,
            &branch,
            &MergeStrategy::Custom(resolutions),
        );

        assert!(!outcome.is_clean());
        assert_eq!(outcome.document()["title"], json!("hand-picked"));
        let unresolved: Vec<&str> = outcome.conflicts().iter().map(|c| c.field.as_str()).collect();
        assert_eq!(unresolved, vec!["body"]);
    }

    #[test]
    fn untouched_fields_pass_through() {
        let outcome = merge_documents(&base(), &base(), &base(), &MergeStrategy::Smart);
        assert!(outcome.is_clean());
        assert_eq!(outcome.document(), &base());
    }

    #[test]
    fn field_added_on_branch_survives() {
        let main = base();
        let mut branch = base();
        branch.insert("summary".into(), json!("added on branch"));

        let outcome = merge_documents(&base(), &main, &branch, &MergeStrategy::Smart);
        assert!(outcome.is_clean());
        assert_eq!(outcome.document()["summary"], json!("added on branch"));
    }
}
