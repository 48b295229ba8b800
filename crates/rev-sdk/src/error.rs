use thiserror::Error;

use rev_types::{ContentId, VersionId, WorkflowId};

/// Errors surfaced by the high-level revisions API.
#[derive(Debug, Error)]
pub enum RevError {
    #[error("version not found: {0}")]
    VersionNotFound(VersionId),

    #[error("workflow not found: {0}")]
    WorkflowNotFound(WorkflowId),

    #[error("version {version} does not belong to content {content}")]
    VersionContentMismatch {
        version: VersionId,
        content: ContentId,
    },

    #[error("no open approval for content {0}")]
    NoOpenApproval(ContentId),

    #[error("an approval is already in progress for content {0}")]
    ApprovalInProgress(ContentId),

    #[error("store error: {0}")]
    Store(#[from] rev_store::StoreError),

    #[error("branch error: {0}")]
    Branch(#[from] rev_merge::MergeError),

    #[error("approval error: {0}")]
    Approval(#[from] rev_approve::ApproveError),
}

pub type RevResult<T> = Result<T, RevError>;
