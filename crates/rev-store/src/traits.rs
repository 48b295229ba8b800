use rev_types::{ApprovalStatus, BranchId, ContentId, UserId, VersionId};

use crate::error::StoreResult;
use crate::version::{ContentVersion, NewVersion};

/// Append-only version log, one numbered sequence per content branch.
///
/// All implementations must satisfy these invariants:
/// - Version records are immutable once written; only the `is_current` flag
///   and `approval_status` may change afterwards.
/// - `version_number` is assigned as `max(existing) + 1` per
///   `(content_id, branch_id)`, starting at 1, and the assignment is
///   linearizable: concurrent writers must never observe or produce
///   duplicate numbers. Backends either serialize writers or detect the
///   race, retry once with a fresh max-read, and surface
///   [`StoreError::ConcurrencyConflict`](crate::StoreError::ConcurrencyConflict)
///   if it recurs.
/// - At most one version per content item has `is_current` set, always a
///   non-autosave version on the main branch.
/// - Restores append; they never delete or renumber existing versions.
pub trait VersionStore: Send + Sync {
    /// Register a content item so versions can be created for it.
    ///
    /// Idempotent. Creating a version for unregistered content fails with
    /// `ContentNotFound`.
    fn register_content(&self, content_id: ContentId) -> StoreResult<()>;

    /// Returns `true` if the content item is registered.
    fn content_exists(&self, content_id: ContentId) -> StoreResult<bool>;

    /// Append a new version, assigning the next version number.
    ///
    /// Non-autosave saves on the main branch become the current version;
    /// the previous current version's flag is cleared in the same atomic
    /// step.
    fn create_version(&self, new: NewVersion) -> StoreResult<ContentVersion>;

    /// Fetch a version by id. Returns `Ok(None)` if it does not exist.
    fn get_version(&self, id: VersionId) -> StoreResult<Option<ContentVersion>>;

    /// The current version of a content item, if any version has been saved.
    fn current_version(&self, content_id: ContentId) -> StoreResult<Option<ContentVersion>>;

    /// All versions on one branch of a content item, ordered by ascending
    /// version number. `branch_id = None` lists the main branch.
    fn list_versions(
        &self,
        content_id: ContentId,
        branch_id: Option<BranchId>,
    ) -> StoreResult<Vec<ContentVersion>>;

    /// The most recent autosave for a content item, if one survives.
    fn latest_autosave(&self, content_id: ContentId) -> StoreResult<Option<ContentVersion>>;

    /// Restore an earlier version by copying its data into a brand-new
    /// version tagged as a rollback.
    ///
    /// The new version records the restored version's number in
    /// `rollback_from_version`. No existing version is deleted or
    /// renumbered, so the full forward history is preserved.
    fn restore_version(&self, id: VersionId, restored_by: UserId) -> StoreResult<ContentVersion>;

    /// Promote an autosave to a real numbered version.
    ///
    /// Copies the autosave's data into a new non-autosave version, then
    /// deletes the autosave. Fails with `NotAnAutosave` for regular
    /// versions.
    fn promote_autosave(&self, id: VersionId, promoted_by: UserId) -> StoreResult<ContentVersion>;

    /// Delete non-current main-branch versions beyond the most recent
    /// `keep`, plus every autosave older than the newest one.
    ///
    /// Returns the ids of the deleted versions so callers can cascade
    /// removal of cached diffs that reference them. The current version is
    /// never deleted regardless of `keep`.
    fn cleanup_old_versions(
        &self,
        content_id: ContentId,
        keep: usize,
    ) -> StoreResult<Vec<VersionId>>;

    /// Update a version's approval status. Returns the updated record.
    fn set_approval_status(
        &self,
        id: VersionId,
        status: ApprovalStatus,
    ) -> StoreResult<ContentVersion>;
}
