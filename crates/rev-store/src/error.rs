use rev_types::{ContentId, VersionId};

/// Errors from version store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The content item is not registered with the store.
    #[error("content not found: {0}")]
    ContentNotFound(ContentId),

    /// The requested version does not exist.
    #[error("version not found: {0}")]
    VersionNotFound(VersionId),

    /// Promotion was requested for a version that is not an autosave.
    #[error("version {0} is not an autosave")]
    NotAnAutosave(VersionId),

    /// Two writers raced on version-number assignment and the retry also
    /// failed. Backends that serialize writers never produce this.
    #[error("concurrent version creation for content {content_id} at number {version_number}")]
    ConcurrencyConflict {
        content_id: ContentId,
        version_number: u64,
    },

    /// Persistence-layer failure from a durable backend.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
