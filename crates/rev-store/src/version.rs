//! Version records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rev_types::{ApprovalStatus, BranchId, ContentId, UserId, VersionData, VersionId};

/// An immutable snapshot of a content item's data.
///
/// Versions are append-only: once written, a record never changes except for
/// the `is_current` flag (flipped when a newer version supersedes it) and
/// `approval_status` (driven by the approval workflow). `version_number` is
/// strictly increasing per `(content_id, branch_id)` and starts at 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentVersion {
    /// Unique version id.
    pub id: VersionId,
    /// The content item this version belongs to.
    pub content_id: ContentId,
    /// Monotonic number within the content's branch, starting at 1.
    pub version_number: u64,
    /// The snapshot payload.
    pub data: VersionData,
    /// Author of the save.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Transient autosave, never eligible to become current.
    pub is_autosave: bool,
    /// The authoritative version of the content. At most one per content
    /// item, always on the main branch, never an autosave.
    pub is_current: bool,
    /// This version was created by restoring an earlier one.
    pub is_rollback: bool,
    /// The version number that was restored, when `is_rollback` is set.
    pub rollback_from_version: Option<u64>,
    /// Branch this version lives on; `None` is the main branch.
    pub branch_id: Option<BranchId>,
    /// Where this version stands in the approval workflow.
    pub approval_status: ApprovalStatus,
}

impl ContentVersion {
    /// Returns `true` if this version lives on the main branch.
    pub fn is_main(&self) -> bool {
        self.branch_id.is_none()
    }
}

/// Input for creating a version.
#[derive(Clone, Debug)]
pub struct NewVersion {
    /// The content item to version.
    pub content_id: ContentId,
    /// The snapshot payload.
    pub data: VersionData,
    /// Author of the save.
    pub created_by: UserId,
    /// Save as a transient autosave.
    pub is_autosave: bool,
    /// Target branch; `None` is the main branch.
    pub branch_id: Option<BranchId>,
}

impl NewVersion {
    /// A manual save on the main branch.
    pub fn save(content_id: ContentId, data: impl Into<VersionData>, created_by: UserId) -> Self {
        Self {
            content_id,
            data: data.into(),
            created_by,
            is_autosave: false,
            branch_id: None,
        }
    }

    /// An autosave on the main branch.
    pub fn autosave(
        content_id: ContentId,
        data: impl Into<VersionData>,
        created_by: UserId,
    ) -> Self {
        Self {
            is_autosave: true,
            ..Self::save(content_id, data, created_by)
        }
    }

    /// A save on the given branch.
    pub fn on_branch(mut self, branch_id: BranchId) -> Self {
        self.branch_id = Some(branch_id);
        self
    }
}
