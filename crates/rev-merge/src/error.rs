use rev_types::{BranchId, BranchStatus};

/// Errors from branch store operations.
///
/// Unresolved merge conflicts are not errors: they come back as data in
/// [`MergeOutcome::Conflicted`](crate::MergeOutcome::Conflicted) so callers
/// can hand them to a human.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// The branch does not exist.
    #[error("branch not found: {0}")]
    BranchNotFound(BranchId),

    /// The branch is already merged or archived; no further transitions or
    /// versions are allowed.
    #[error("branch {id} is {status} and cannot change")]
    BranchClosed { id: BranchId, status: BranchStatus },

    /// Persistence-layer failure from a durable backend.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for branch operations.
pub type MergeResult<T> = Result<T, MergeError>;
