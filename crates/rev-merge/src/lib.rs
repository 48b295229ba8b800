//! Branch tracking and three-way merge resolution.
//!
//! A [`ContentBranch`] is a named divergent line of versions forked from a
//! base version; [`BranchStore`] persists its `active -> merged | archived`
//! lifecycle. [`merge_documents`] and [`find_conflicts`] implement the
//! three-way comparison (base vs main vs branch) that distinguishes true
//! conflicts from one-sided changes; unresolved conflicts come back as data
//! in [`MergeOutcome::Conflicted`], never as errors.
//!
//! Orchestration — copying base data into a branch's first version and
//! saving the merged result as a new main version — lives in the facade
//! crate, keeping this engine free of version persistence.

pub mod branch;
pub mod error;
pub mod merge;

pub use branch::{BranchStore, ContentBranch, InMemoryBranchStore};
pub use error::{MergeError, MergeResult};
pub use merge::{find_conflicts, merge_documents, FieldConflict, MergeOutcome, MergeStrategy};
