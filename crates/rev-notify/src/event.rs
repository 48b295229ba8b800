//! Events emitted by the revision core.
//!
//! Each event carries the content and version it pertains to plus the actor
//! or approver ids the notification layer needs for addressing. Events are
//! serializable so the platform can queue them.

use serde::{Deserialize, Serialize};

use rev_types::{BranchId, ContentId, UserId, VersionId};

/// Classification of revision events, for filtering and counting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A new version was created (`version.created`).
    VersionCreated,
    /// The approval cursor moved to a new step (`approval.step_changed`).
    ApprovalStepChanged,
    /// The final approval step passed (`approval.completed`).
    ApprovalCompleted,
    /// An approver rejected or requested changes (`approval.rejected`).
    ApprovalRejected,
    /// A branch was merged into main (`branch.merged`).
    BranchMerged,
    /// A merge attempt found unresolved conflicts (`branch.conflict_detected`).
    BranchConflictDetected,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::VersionCreated => "version.created",
            Self::ApprovalStepChanged => "approval.step_changed",
            Self::ApprovalCompleted => "approval.completed",
            Self::ApprovalRejected => "approval.rejected",
            Self::BranchMerged => "branch.merged",
            Self::BranchConflictDetected => "branch.conflict_detected",
        };
        write!(f, "{s}")
    }
}

/// A single event flowing out of the revision core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevisionEvent {
    /// A version was saved (manual save, autosave, restore, or merge result).
    VersionCreated {
        content_id: ContentId,
        version_id: VersionId,
        version_number: u64,
        author: UserId,
        is_autosave: bool,
    },
    /// The approval workflow advanced to the next step.
    ApprovalStepChanged {
        content_id: ContentId,
        version_id: VersionId,
        step_index: usize,
        step_name: String,
        approvers: Vec<UserId>,
    },
    /// Every step approved; the version is approved.
    ApprovalCompleted {
        content_id: ContentId,
        version_id: VersionId,
        approved_by: UserId,
    },
    /// The workflow pass ended with a rejection or a changes request.
    ApprovalRejected {
        content_id: ContentId,
        version_id: VersionId,
        decided_by: UserId,
        changes_requested: bool,
    },
    /// A branch merged into main, producing a new main version.
    BranchMerged {
        content_id: ContentId,
        branch_id: BranchId,
        merged_version_id: VersionId,
        merged_by: UserId,
    },
    /// A merge attempt could not resolve every conflicting field.
    BranchConflictDetected {
        content_id: ContentId,
        branch_id: BranchId,
        conflicting_fields: Vec<String>,
        detected_by: UserId,
    },
}

impl RevisionEvent {
    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::VersionCreated { .. } => EventKind::VersionCreated,
            Self::ApprovalStepChanged { .. } => EventKind::ApprovalStepChanged,
            Self::ApprovalCompleted { .. } => EventKind::ApprovalCompleted,
            Self::ApprovalRejected { .. } => EventKind::ApprovalRejected,
            Self::BranchMerged { .. } => EventKind::BranchMerged,
            Self::BranchConflictDetected { .. } => EventKind::BranchConflictDetected,
        }
    }

    /// The content item this event pertains to.
    pub fn content_id(&self) -> ContentId {
        match self {
            Self::VersionCreated { content_id, .. }
            | Self::ApprovalStepChanged { content_id, .. }
            | Self::ApprovalCompleted { content_id, .. }
            | Self::ApprovalRejected { content_id, .. }
            | Self::BranchMerged { content_id, .. }
            | Self::BranchConflictDetected { content_id, .. } => *content_id,
        }
    }
}
