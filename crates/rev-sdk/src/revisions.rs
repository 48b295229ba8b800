//! The high-level revisions facade.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rev_approve::{
    ApprovalInstance, ApprovalSummary, StepOutcome, StepProgress, WorkflowState, WorkflowStore,
};
use rev_cache::ComparisonCache;
use rev_diff::{diff_payloads, Granularity};
use rev_merge::{
    find_conflicts, merge_documents, BranchStore, ContentBranch, FieldConflict, MergeOutcome,
    MergeStrategy,
};
use rev_notify::{NotificationDispatcher, RevisionEvent};
use rev_store::{ContentVersion, NewVersion, StoreError, VersionStore};
use rev_types::{BranchId, ContentId, Document, UserId, VersionData, VersionId, WorkflowId};

use crate::compare::Comparison;
use crate::error::{RevError, RevResult};
use crate::timeline::TimelineEntry;

/// What a merge attempt produced.
#[derive(Clone, Debug, PartialEq)]
pub enum MergeReport {
    /// The merge resolved cleanly; a new main version was saved and the
    /// branch is closed.
    Merged {
        branch: ContentBranch,
        version: ContentVersion,
    },
    /// Unresolved conflicts remain; nothing was saved and the branch stays
    /// active. The conflicts are data for a human to resolve, typically by
    /// retrying with [`MergeStrategy::Custom`].
    Conflicted { conflicts: Vec<FieldConflict> },
}

/// Facade over the version store, diff cache, branch engine, and approval
/// workflow.
///
/// Collaborators are injected as trait objects so the surrounding platform
/// can supply durable backends; [`Revisions::in_memory`] wires up the
/// in-memory implementations for tests and embedding. Events flow out
/// through the [`NotificationDispatcher`]; this core never delivers
/// notifications itself.
pub struct Revisions {
    store: Arc<dyn VersionStore>,
    cache: ComparisonCache,
    branches: Arc<dyn BranchStore>,
    workflows: Arc<dyn WorkflowStore>,
    notifier: Arc<dyn NotificationDispatcher>,
    // One approval instance per content item; a new version replaces a
    // finished instance.
    approvals: RwLock<HashMap<ContentId, ApprovalInstance>>,
}

impl Revisions {
    /// Build a facade over explicit collaborators.
    pub fn new(
        store: Arc<dyn VersionStore>,
        cache: ComparisonCache,
        branches: Arc<dyn BranchStore>,
        workflows: Arc<dyn WorkflowStore>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            store,
            cache,
            branches,
            workflows,
            notifier,
            approvals: RwLock::new(HashMap::new()),
        }
    }

    /// An all-in-memory stack with the given dispatcher.
    pub fn in_memory(notifier: Arc<dyn NotificationDispatcher>) -> Self {
        Self::new(
            Arc::new(rev_store::InMemoryVersionStore::new()),
            ComparisonCache::in_memory(),
            Arc::new(rev_merge::InMemoryBranchStore::new()),
            Arc::new(rev_approve::InMemoryWorkflowStore::new()),
            notifier,
        )
    }

    /// The underlying version store.
    pub fn store(&self) -> &Arc<dyn VersionStore> {
        &self.store
    }

    /// The underlying workflow definition store.
    pub fn workflows(&self) -> &Arc<dyn WorkflowStore> {
        &self.workflows
    }

    // ---- Versioning ----

    /// Register a content item for versioning. Idempotent.
    pub fn register_content(&self, content_id: ContentId) -> RevResult<()> {
        self.store.register_content(content_id)?;
        Ok(())
    }

    /// Save a new version on the main branch and make it current.
    pub fn save(
        &self,
        content_id: ContentId,
        data: impl Into<VersionData>,
        author: UserId,
    ) -> RevResult<ContentVersion> {
        let version = self.create_retrying(NewVersion::save(content_id, data, author))?;
        self.emit_version_created(&version);
        Ok(version)
    }

    /// Save a transient autosave; never becomes current.
    pub fn autosave(
        &self,
        content_id: ContentId,
        data: impl Into<VersionData>,
        author: UserId,
    ) -> RevResult<ContentVersion> {
        let version = self.create_retrying(NewVersion::autosave(content_id, data, author))?;
        self.emit_version_created(&version);
        Ok(version)
    }

    /// Promote an autosave into a real numbered version, consuming it.
    pub fn promote_autosave(&self, id: VersionId, user: UserId) -> RevResult<ContentVersion> {
        let version = self.store.promote_autosave(id, user)?;
        self.cache.remove_version(id);
        self.emit_version_created(&version);
        Ok(version)
    }

    /// Restore an earlier version as a brand-new rollback version.
    pub fn restore(&self, id: VersionId, user: UserId) -> RevResult<ContentVersion> {
        let version = self.store.restore_version(id, user)?;
        self.emit_version_created(&version);
        Ok(version)
    }

    /// Prune old versions, cascading removal of their cached comparisons.
    ///
    /// Returns how many versions were deleted.
    pub fn cleanup(&self, content_id: ContentId, keep: usize) -> RevResult<usize> {
        let deleted = self.store.cleanup_old_versions(content_id, keep)?;
        for id in &deleted {
            self.cache.remove_version(*id);
        }
        Ok(deleted.len())
    }

    /// A content item's main-branch history, newest first, with display
    /// summaries ("Initial version", "Restored from version N", ...).
    pub fn timeline(&self, content_id: ContentId) -> RevResult<Vec<TimelineEntry>> {
        let mut versions = self.store.list_versions(content_id, None)?;
        versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        Ok(versions.iter().map(TimelineEntry::from_version).collect())
    }

    // ---- Comparison ----

    /// Compare two versions, memoized through the two-tier cache.
    ///
    /// The single read entry point for diffs: every rendering format is a
    /// derived view on the returned [`Comparison`].
    pub fn compare(
        &self,
        from: VersionId,
        to: VersionId,
        granularity: Granularity,
    ) -> RevResult<Comparison> {
        let old = self.require_version(from)?;
        let new = self.require_version(to)?;
        if old.content_id != new.content_id {
            return Err(RevError::VersionContentMismatch {
                version: to,
                content: old.content_id,
            });
        }

        let diff = self
            .cache
            .get_or_compute(from, to, granularity, || {
                diff_payloads(&old.data, &new.data, granularity)
            });
        Ok(Comparison {
            from,
            to,
            granularity,
            diff,
        })
    }

    /// Compare a version against its predecessor on the same branch.
    ///
    /// Returns `Ok(None)` for the first version of a branch.
    pub fn compare_with_previous(
        &self,
        id: VersionId,
        granularity: Granularity,
    ) -> RevResult<Option<Comparison>> {
        let version = self.require_version(id)?;
        let previous = self
            .store
            .list_versions(version.content_id, version.branch_id)?
            .into_iter()
            .filter(|v| v.version_number < version.version_number)
            .max_by_key(|v| v.version_number);
        match previous {
            Some(prev) => Ok(Some(self.compare(prev.id, id, granularity)?)),
            None => Ok(None),
        }
    }

    // ---- Branching ----

    /// Fork a branch from a main-branch version.
    ///
    /// The branch's first version is a verbatim copy of the base version's
    /// data.
    pub fn create_branch(
        &self,
        name: impl Into<String>,
        base_version: VersionId,
        user: UserId,
    ) -> RevResult<(ContentBranch, ContentVersion)> {
        let base = self.require_version(base_version)?;
        let branch = ContentBranch::new(base.content_id, name, base_version, user);
        self.branches.create_branch(branch.clone())?;

        let first = self.create_retrying(
            NewVersion::save(base.content_id, base.data.clone(), user).on_branch(branch.id),
        )?;
        self.emit_version_created(&first);
        Ok((branch, first))
    }

    /// Save a new version on an active branch.
    pub fn save_on_branch(
        &self,
        branch_id: BranchId,
        data: impl Into<VersionData>,
        author: UserId,
    ) -> RevResult<ContentVersion> {
        let branch = self.require_branch(branch_id)?;
        if !branch.is_active() {
            return Err(rev_merge::MergeError::BranchClosed {
                id: branch.id,
                status: branch.status,
            }
            .into());
        }
        let version = self
            .create_retrying(NewVersion::save(branch.content_id, data, author).on_branch(branch_id))?;
        self.emit_version_created(&version);
        Ok(version)
    }

    /// True conflicts between the branch and main, relative to the base.
    pub fn branch_conflicts(&self, branch_id: BranchId) -> RevResult<Vec<FieldConflict>> {
        let (base, main, side) = self.merge_inputs(branch_id)?;
        Ok(find_conflicts(&base, &main, &side))
    }

    /// Merge a branch into main under the given strategy.
    ///
    /// A clean merge saves a new main version, closes the branch, and
    /// emits `branch.merged`; unresolved conflicts emit
    /// `branch.conflict_detected` and leave everything untouched.
    pub fn merge_branch(
        &self,
        branch_id: BranchId,
        strategy: &MergeStrategy,
        user: UserId,
    ) -> RevResult<MergeReport> {
        let branch = self.require_branch(branch_id)?;
        if !branch.is_active() {
            return Err(rev_merge::MergeError::BranchClosed {
                id: branch.id,
                status: branch.status,
            }
            .into());
        }
        let (base, main, side) = self.merge_inputs(branch_id)?;

        match merge_documents(&base, &main, &side, strategy) {
            MergeOutcome::Merged(document) => {
                let version = self.create_retrying(NewVersion::save(
                    branch.content_id,
                    VersionData::Document(document),
                    user,
                ))?;
                let branch = self.branches.mark_merged(branch_id, version.id)?;
                self.emit_version_created(&version);
                self.notifier.dispatch(
                    &[],
                    &RevisionEvent::BranchMerged {
                        content_id: branch.content_id,
                        branch_id,
                        merged_version_id: version.id,
                        merged_by: user,
                    },
                );
                Ok(MergeReport::Merged { branch, version })
            }
            MergeOutcome::Conflicted { conflicts, .. } => {
                self.notifier.dispatch(
                    &[user],
                    &RevisionEvent::BranchConflictDetected {
                        content_id: branch.content_id,
                        branch_id,
                        conflicting_fields: conflicts.iter().map(|c| c.field.clone()).collect(),
                        detected_by: user,
                    },
                );
                Ok(MergeReport::Conflicted { conflicts })
            }
        }
    }

    /// Archive an active branch.
    pub fn archive_branch(&self, branch_id: BranchId) -> RevResult<ContentBranch> {
        Ok(self.branches.archive_branch(branch_id)?)
    }

    // ---- Approval ----

    /// Submit a version for approval under a workflow definition.
    ///
    /// Fails if another approval is still pending for the same content.
    pub fn submit_for_approval(
        &self,
        version_id: VersionId,
        workflow_id: WorkflowId,
    ) -> RevResult<()> {
        let version = self.require_version(version_id)?;
        let mut approvals = self.approvals.write().expect("lock poisoned");
        if let Some(open) = approvals.get(&version.content_id) {
            if open.state() == WorkflowState::Pending {
                return Err(RevError::ApprovalInProgress(version.content_id));
            }
        }

        let workflow = self
            .workflows
            .get_workflow(workflow_id)?
            .ok_or(RevError::WorkflowNotFound(workflow_id))?;
        let mut instance = ApprovalInstance::new(version.content_id, version_id, workflow)?;
        instance.submit()?;
        self.store
            .set_approval_status(version_id, instance.approval_status())?;
        self.emit_step_changed(&instance);
        approvals.insert(version.content_id, instance);
        Ok(())
    }

    /// Approve the current step as `user`.
    pub fn approve(
        &self,
        content_id: ContentId,
        user: UserId,
        comment: Option<String>,
    ) -> RevResult<StepOutcome> {
        let mut approvals = self.approvals.write().expect("lock poisoned");
        let instance = approvals
            .get_mut(&content_id)
            .ok_or(RevError::NoOpenApproval(content_id))?;

        let outcome = instance.approve_step(user, comment)?;
        match &outcome {
            StepOutcome::Advanced { .. } => self.emit_step_changed(instance),
            StepOutcome::Completed => {
                let version = self
                    .store
                    .set_approval_status(instance.version_id, instance.approval_status())?;
                self.notifier.dispatch(
                    &[version.created_by],
                    &RevisionEvent::ApprovalCompleted {
                        content_id,
                        version_id: instance.version_id,
                        approved_by: user,
                    },
                );
            }
        }
        Ok(outcome)
    }

    /// Reject at the current step, ending the pass.
    pub fn reject(
        &self,
        content_id: ContentId,
        user: UserId,
        comment: Option<String>,
    ) -> RevResult<()> {
        self.decline(content_id, user, comment, false)
    }

    /// Request changes at the current step, ending the pass.
    pub fn request_changes(
        &self,
        content_id: ContentId,
        user: UserId,
        comment: Option<String>,
    ) -> RevResult<()> {
        self.decline(content_id, user, comment, true)
    }

    fn decline(
        &self,
        content_id: ContentId,
        user: UserId,
        comment: Option<String>,
        changes_requested: bool,
    ) -> RevResult<()> {
        let mut approvals = self.approvals.write().expect("lock poisoned");
        let instance = approvals
            .get_mut(&content_id)
            .ok_or(RevError::NoOpenApproval(content_id))?;

        if changes_requested {
            instance.request_changes(user, comment)?;
        } else {
            instance.reject_step(user, comment)?;
        }
        let version = self
            .store
            .set_approval_status(instance.version_id, instance.approval_status())?;
        self.notifier.dispatch(
            &[version.created_by],
            &RevisionEvent::ApprovalRejected {
                content_id,
                version_id: instance.version_id,
                decided_by: user,
                changes_requested,
            },
        );
        Ok(())
    }

    /// Resubmit after a rejection or changes request. The cursor returns to
    /// the first step; the decision history is kept.
    pub fn resubmit(&self, content_id: ContentId) -> RevResult<()> {
        let mut approvals = self.approvals.write().expect("lock poisoned");
        let instance = approvals
            .get_mut(&content_id)
            .ok_or(RevError::NoOpenApproval(content_id))?;
        instance.submit()?;
        self.store
            .set_approval_status(instance.version_id, instance.approval_status())?;
        self.emit_step_changed(instance);
        Ok(())
    }

    /// Withdraw back to draft after a rejection or changes request.
    pub fn withdraw(&self, content_id: ContentId) -> RevResult<()> {
        let mut approvals = self.approvals.write().expect("lock poisoned");
        let instance = approvals
            .get_mut(&content_id)
            .ok_or(RevError::NoOpenApproval(content_id))?;
        instance.withdraw()?;
        self.store
            .set_approval_status(instance.version_id, instance.approval_status())?;
        Ok(())
    }

    /// `true` only when an approval is pending and `user` is on the current
    /// step.
    pub fn can_approve(&self, content_id: ContentId, user: UserId) -> bool {
        self.approvals
            .read()
            .expect("lock poisoned")
            .get(&content_id)
            .is_some_and(|i| i.can_approve(user))
    }

    /// Steps, decisions grouped by step, and the current status.
    pub fn approval_summary(&self, content_id: ContentId) -> RevResult<ApprovalSummary> {
        let approvals = self.approvals.read().expect("lock poisoned");
        let instance = approvals
            .get(&content_id)
            .ok_or(RevError::NoOpenApproval(content_id))?;
        Ok(instance.summary())
    }

    /// Per-step status for the current pass.
    pub fn workflow_progress(&self, content_id: ContentId) -> RevResult<Vec<StepProgress>> {
        let approvals = self.approvals.read().expect("lock poisoned");
        let instance = approvals
            .get(&content_id)
            .ok_or(RevError::NoOpenApproval(content_id))?;
        Ok(instance.progress())
    }

    // ---- Internals ----

    /// Create a version, retrying once if the backend reports a numbering
    /// race. A second conflict is surfaced to the caller.
    fn create_retrying(&self, new: NewVersion) -> RevResult<ContentVersion> {
        match self.store.create_version(new.clone()) {
            Err(StoreError::ConcurrencyConflict { content_id, .. }) => {
                tracing::debug!(content = %content_id, "version numbering race, retrying");
                Ok(self.store.create_version(new)?)
            }
            other => Ok(other?),
        }
    }

    fn require_version(&self, id: VersionId) -> RevResult<ContentVersion> {
        self.store
            .get_version(id)?
            .ok_or(RevError::VersionNotFound(id))
    }

    fn require_branch(&self, id: BranchId) -> RevResult<ContentBranch> {
        Ok(self
            .branches
            .get_branch(id)?
            .ok_or(rev_merge::MergeError::BranchNotFound(id))?)
    }

    /// Base, main, and branch documents for a three-way merge.
    fn merge_inputs(&self, branch_id: BranchId) -> RevResult<(Document, Document, Document)> {
        let branch = self.require_branch(branch_id)?;
        let base = self.require_version(branch.base_version_id)?;
        let main = self
            .store
            .current_version(branch.content_id)?
            .unwrap_or_else(|| base.clone());
        let side = self
            .store
            .list_versions(branch.content_id, Some(branch_id))?
            .into_iter()
            .max_by_key(|v| v.version_number)
            .unwrap_or_else(|| base.clone());
        Ok((
            base.data.to_document(),
            main.data.to_document(),
            side.data.to_document(),
        ))
    }

    fn emit_version_created(&self, version: &ContentVersion) {
        self.notifier.dispatch(
            &[],
            &RevisionEvent::VersionCreated {
                content_id: version.content_id,
                version_id: version.id,
                version_number: version.version_number,
                author: version.created_by,
                is_autosave: version.is_autosave,
            },
        );
    }

    fn emit_step_changed(&self, instance: &ApprovalInstance) {
        if let Some(step) = instance.current_step() {
            let approvers: Vec<UserId> = step.approvers.iter().copied().collect();
            self.notifier.dispatch(
                &approvers,
                &RevisionEvent::ApprovalStepChanged {
                    content_id: instance.content_id,
                    version_id: instance.version_id,
                    step_index: instance.current_step_index(),
                    step_name: step.name.clone(),
                    approvers: approvers.clone(),
                },
            );
        }
    }
}

impl std::fmt::Debug for Revisions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Revisions").finish_non_exhaustive()
    }
}
