//! Branch records and their store.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rev_types::{BranchId, BranchStatus, ContentId, UserId, VersionId};

use crate::error::{MergeError, MergeResult};

/// A named divergent line of versions forked from a base version.
///
/// `active -> merged` and `active -> archived` are the only transitions;
/// both end states are terminal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentBranch {
    /// Unique branch id.
    pub id: BranchId,
    /// The content item this branch belongs to.
    pub content_id: ContentId,
    /// Human-readable branch name.
    pub name: String,
    /// The main-branch version this branch forked from.
    pub base_version_id: VersionId,
    /// Who created the branch.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Current lifecycle state.
    pub status: BranchStatus,
    /// The main-branch version the merge produced, once merged.
    pub merged_into_version: Option<VersionId>,
}

impl ContentBranch {
    /// A new active branch forked from `base_version_id`.
    pub fn new(
        content_id: ContentId,
        name: impl Into<String>,
        base_version_id: VersionId,
        created_by: UserId,
    ) -> Self {
        Self {
            id: BranchId::new(),
            content_id,
            name: name.into(),
            base_version_id,
            created_by,
            created_at: Utc::now(),
            status: BranchStatus::Active,
            merged_into_version: None,
        }
    }

    /// Returns `true` if the branch can still receive versions.
    pub fn is_active(&self) -> bool {
        self.status == BranchStatus::Active
    }
}

/// Persistence seam for branch records.
pub trait BranchStore: Send + Sync {
    /// Persist a new branch.
    fn create_branch(&self, branch: ContentBranch) -> MergeResult<()>;

    /// Fetch a branch by id. Returns `Ok(None)` if it does not exist.
    fn get_branch(&self, id: BranchId) -> MergeResult<Option<ContentBranch>>;

    /// All branches of a content item, in creation order.
    fn list_branches(&self, content_id: ContentId) -> MergeResult<Vec<ContentBranch>>;

    /// Transition an active branch to merged, recording the version the
    /// merge produced. Fails with `BranchClosed` on a terminal branch.
    fn mark_merged(&self, id: BranchId, merged_into: VersionId) -> MergeResult<ContentBranch>;

    /// Transition an active branch to archived. Fails with `BranchClosed`
    /// on a terminal branch.
    fn archive_branch(&self, id: BranchId) -> MergeResult<ContentBranch>;
}

/// In-memory branch store for tests and embedding.
#[derive(Default)]
pub struct InMemoryBranchStore {
    branches: RwLock<HashMap<BranchId, ContentBranch>>,
    order: RwLock<Vec<BranchId>>,
}

impl InMemoryBranchStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn update<F>(&self, id: BranchId, apply: F) -> MergeResult<ContentBranch>
    where
        F: FnOnce(&mut ContentBranch),
    {
        let mut branches = self.branches.write().expect("lock poisoned");
        let branch = branches
            .get_mut(&id)
            .ok_or(MergeError::BranchNotFound(id))?;
        if !branch.is_active() {
            return Err(MergeError::BranchClosed {
                id,
                status: branch.status,
            });
        }
        apply(branch);
        Ok(branch.clone())
    }
}

impl BranchStore for InMemoryBranchStore {
    fn create_branch(&self, branch: ContentBranch) -> MergeResult<()> {
        self.order.write().expect("lock poisoned").push(branch.id);
        self.branches
            .write()
            .expect("lock poisoned")
            .insert(branch.id, branch);
        Ok(())
    }

    fn get_branch(&self, id: BranchId) -> MergeResult<Option<ContentBranch>> {
        Ok(self
            .branches
            .read()
            .expect("lock poisoned")
            .get(&id)
            .cloned())
    }

    fn list_branches(&self, content_id: ContentId) -> MergeResult<Vec<ContentBranch>> {
        let branches = self.branches.read().expect("lock poisoned");
        Ok(self
            .order
            .read()
            .expect("lock poisoned")
            .iter()
            .filter_map(|id| branches.get(id))
            .filter(|b| b.content_id == content_id)
            .cloned()
            .collect())
    }

    fn mark_merged(&self, id: BranchId, merged_into: VersionId) -> MergeResult<ContentBranch> {
        let branch = self.update(id, |b| {
            b.status = BranchStatus::Merged;
            b.merged_into_version = Some(merged_into);
        })?;
        tracing::debug!(branch = %id, version = %merged_into, "branch merged");
        Ok(branch)
    }

    fn archive_branch(&self, id: BranchId) -> MergeResult<ContentBranch> {
        self.update(id, |b| b.status = BranchStatus::Archived)
    }
}

impl std::fmt::Debug for InMemoryBranchStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBranchStore")
            .field(
                "branch_count",
                &self.branches.read().expect("lock poisoned").len(),
            )
            .finish()
    }
}
