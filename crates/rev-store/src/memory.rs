use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use chrono::Utc;

use rev_types::{ApprovalStatus, BranchId, ContentId, UserId, VersionId};

use crate::error::{StoreError, StoreResult};
use crate::traits::VersionStore;
use crate::version::{ContentVersion, NewVersion};

#[derive(Default)]
struct State {
    contents: HashSet<ContentId>,
    versions: HashMap<VersionId, ContentVersion>,
    // Per-content version ids in insertion order.
    by_content: HashMap<ContentId, Vec<VersionId>>,
}

impl State {
    fn content_versions(&self, content_id: ContentId) -> Vec<&ContentVersion> {
        self.by_content
            .get(&content_id)
            .map(|ids| ids.iter().filter_map(|id| self.versions.get(id)).collect())
            .unwrap_or_default()
    }

    fn next_number(&self, content_id: ContentId, branch_id: Option<BranchId>) -> u64 {
        self.content_versions(content_id)
            .iter()
            .filter(|v| v.branch_id == branch_id)
            .map(|v| v.version_number)
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// In-memory version store.
///
/// Intended for tests and embedding. All records live behind a single
/// `RwLock`; holding the write lock across the max-read and the insert makes
/// version-number assignment linearizable, so `ConcurrencyConflict` never
/// occurs with this backend.
pub struct InMemoryVersionStore {
    state: RwLock<State>,
}

impl InMemoryVersionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
        }
    }

    /// Total number of stored versions across all content items.
    pub fn len(&self) -> usize {
        self.state.read().expect("lock poisoned").versions.len()
    }

    /// Returns `true` if no versions are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryVersionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionStore for InMemoryVersionStore {
    fn register_content(&self, content_id: ContentId) -> StoreResult<()> {
        let mut state = self.state.write().expect("lock poisoned");
        state.contents.insert(content_id);
        Ok(())
    }

    fn content_exists(&self, content_id: ContentId) -> StoreResult<bool> {
        let state = self.state.read().expect("lock poisoned");
        Ok(state.contents.contains(&content_id))
    }

    fn create_version(&self, new: NewVersion) -> StoreResult<ContentVersion> {
        let mut state = self.state.write().expect("lock poisoned");
        if !state.contents.contains(&new.content_id) {
            return Err(StoreError::ContentNotFound(new.content_id));
        }

        let version_number = state.next_number(new.content_id, new.branch_id);
        let becomes_current = !new.is_autosave && new.branch_id.is_none();
        if becomes_current {
            if let Some(ids) = state.by_content.get(&new.content_id).cloned() {
                for id in ids {
                    if let Some(v) = state.versions.get_mut(&id) {
                        v.is_current = false;
                    }
                }
            }
        }

        let version = ContentVersion {
            id: VersionId::new(),
            content_id: new.content_id,
            version_number,
            data: new.data,
            created_by: new.created_by,
            created_at: Utc::now(),
            is_autosave: new.is_autosave,
            is_current: becomes_current,
            is_rollback: false,
            rollback_from_version: None,
            branch_id: new.branch_id,
            approval_status: ApprovalStatus::None,
        };
        tracing::debug!(
            content = %version.content_id,
            number = version.version_number,
            autosave = version.is_autosave,
            "version created"
        );
        state
            .by_content
            .entry(version.content_id)
            .or_default()
            .push(version.id);
        state.versions.insert(version.id, version.clone());
        Ok(version)
    }

    fn get_version(&self, id: VersionId) -> StoreResult<Option<ContentVersion>> {
        let state = self.state.read().expect("lock poisoned");
        Ok(state.versions.get(&id).cloned())
    }

    fn current_version(&self, content_id: ContentId) -> StoreResult<Option<ContentVersion>> {
        let state = self.state.read().expect("lock poisoned");
        Ok(state
            .content_versions(content_id)
            .into_iter()
            .find(|v| v.is_current)
            .cloned())
    }

    fn list_versions(
        &self,
        content_id: ContentId,
        branch_id: Option<BranchId>,
    ) -> StoreResult<Vec<ContentVersion>> {
        let state = self.state.read().expect("lock poisoned");
        let mut versions: Vec<ContentVersion> = state
            .content_versions(content_id)
            .into_iter()
            .filter(|v| v.branch_id == branch_id)
            .cloned()
            .collect();
        versions.sort_by_key(|v| v.version_number);
        Ok(versions)
    }

    fn latest_autosave(&self, content_id: ContentId) -> StoreResult<Option<ContentVersion>> {
        let state = self.state.read().expect("lock poisoned");
        Ok(state
            .content_versions(content_id)
            .into_iter()
            .filter(|v| v.is_autosave)
            .max_by_key(|v| v.version_number)
            .cloned())
    }

    fn restore_version(&self, id: VersionId, restored_by: UserId) -> StoreResult<ContentVersion> {
        let mut state = self.state.write().expect("lock poisoned");
        let source = state
            .versions
            .get(&id)
            .cloned()
            .ok_or(StoreError::VersionNotFound(id))?;

        let version_number = state.next_number(source.content_id, None);
        if let Some(ids) = state.by_content.get(&source.content_id).cloned() {
            for vid in ids {
                if let Some(v) = state.versions.get_mut(&vid) {
                    v.is_current = false;
                }
            }
        }
        let restored = ContentVersion {
            id: VersionId::new(),
            content_id: source.content_id,
            version_number,
            data: source.data.clone(),
            created_by: restored_by,
            created_at: Utc::now(),
            is_autosave: false,
            is_current: true,
            is_rollback: true,
            rollback_from_version: Some(source.version_number),
            branch_id: None,
            approval_status: ApprovalStatus::None,
        };
        tracing::debug!(
            content = %restored.content_id,
            number = restored.version_number,
            from = source.version_number,
            "version restored"
        );
        state
            .by_content
            .entry(restored.content_id)
            .or_default()
            .push(restored.id);
        state.versions.insert(restored.id, restored.clone());
        Ok(restored)
    }

    fn promote_autosave(&self, id: VersionId, promoted_by: UserId) -> StoreResult<ContentVersion> {
        let mut state = self.state.write().expect("lock poisoned");
        let source = state
            .versions
            .get(&id)
            .cloned()
            .ok_or(StoreError::VersionNotFound(id))?;
        if !source.is_autosave {
            return Err(StoreError::NotAnAutosave(id));
        }

        let version_number = state.next_number(source.content_id, source.branch_id);
        let becomes_current = source.branch_id.is_none();
        if becomes_current {
            if let Some(ids) = state.by_content.get(&source.content_id).cloned() {
                for vid in ids {
                    if let Some(v) = state.versions.get_mut(&vid) {
                        v.is_current = false;
                    }
                }
            }
        }
        let promoted = ContentVersion {
            id: VersionId::new(),
            content_id: source.content_id,
            version_number,
            data: source.data.clone(),
            created_by: promoted_by,
            created_at: Utc::now(),
            is_autosave: false,
            is_current: becomes_current,
            is_rollback: false,
            rollback_from_version: None,
            branch_id: source.branch_id,
            approval_status: ApprovalStatus::None,
        };
        state
            .by_content
            .entry(promoted.content_id)
            .or_default()
            .push(promoted.id);
        state.versions.insert(promoted.id, promoted.clone());

        // The autosave is consumed by the promotion.
        state.versions.remove(&id);
        if let Some(ids) = state.by_content.get_mut(&source.content_id) {
            ids.retain(|vid| *vid != id);
        }
        Ok(promoted)
    }

    fn cleanup_old_versions(
        &self,
        content_id: ContentId,
        keep: usize,
    ) -> StoreResult<Vec<VersionId>> {
        let mut state = self.state.write().expect("lock poisoned");
        if !state.contents.contains(&content_id) {
            return Err(StoreError::ContentNotFound(content_id));
        }

        let mut old: Vec<(u64, VersionId)> = state
            .content_versions(content_id)
            .into_iter()
            .filter(|v| v.is_main() && !v.is_autosave && !v.is_current)
            .map(|v| (v.version_number, v.id))
            .collect();
        old.sort_by(|a, b| b.0.cmp(&a.0));
        let mut doomed: Vec<VersionId> = old.into_iter().skip(keep).map(|(_, id)| id).collect();

        // Only the newest autosave survives a cleanup pass.
        let mut autosaves: Vec<(u64, VersionId)> = state
            .content_versions(content_id)
            .into_iter()
            .filter(|v| v.is_autosave)
            .map(|v| (v.version_number, v.id))
            .collect();
        autosaves.sort_by(|a, b| b.0.cmp(&a.0));
        doomed.extend(autosaves.into_iter().skip(1).map(|(_, id)| id));

        for id in &doomed {
            state.versions.remove(id);
        }
        if let Some(ids) = state.by_content.get_mut(&content_id) {
            ids.retain(|id| !doomed.contains(id));
        }
        if !doomed.is_empty() {
            tracing::debug!(content = %content_id, deleted = doomed.len(), "old versions pruned");
        }
        Ok(doomed)
    }

    fn set_approval_status(
        &self,
        id: VersionId,
        status: ApprovalStatus,
    ) -> StoreResult<ContentVersion> {
        let mut state = self.state.write().expect("lock poisoned");
        let version = state
            .versions
            .get_mut(&id)
            .ok_or(StoreError::VersionNotFound(id))?;
        version.approval_status = status;
        Ok(version.clone())
    }
}

impl std::fmt::Debug for InMemoryVersionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryVersionStore")
            .field("version_count", &self.len())
            .finish()
    }
}
