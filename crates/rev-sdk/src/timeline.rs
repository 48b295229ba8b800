//! Human-readable version history.

use chrono::{DateTime, Utc};
use serde::Serialize;

use rev_store::ContentVersion;
use rev_types::{UserId, VersionId};

/// One row of a content item's history, newest first.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub version_id: VersionId,
    pub version_number: u64,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    /// What happened, phrased for display.
    pub summary: String,
    /// Payload size of this snapshot in bytes.
    pub size_bytes: usize,
    pub is_current: bool,
    pub is_autosave: bool,
}

impl TimelineEntry {
    pub(crate) fn from_version(version: &ContentVersion) -> Self {
        Self {
            version_id: version.id,
            version_number: version.version_number,
            created_by: version.created_by,
            created_at: version.created_at,
            summary: summarize(version),
            size_bytes: version.data.size_bytes(),
            is_current: version.is_current,
            is_autosave: version.is_autosave,
        }
    }
}

fn summarize(version: &ContentVersion) -> String {
    if version.is_autosave {
        return "Autosaved draft".to_string();
    }
    if let Some(from) = version.rollback_from_version {
        return format!("Restored from version {from}");
    }
    if version.version_number == 1 {
        return "Initial version".to_string();
    }
    format!("Updated to version {}", version.version_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rev_store::NewVersion;
    use rev_store::VersionStore;
    use rev_types::ContentId;

    #[test]
    fn summaries_reflect_version_kind() {
        let store = rev_store::InMemoryVersionStore::new();
        let content = ContentId::new();
        let author = UserId::new();
        store.register_content(content).unwrap();

        let v1 = store
            .create_version(NewVersion::save(content, "first", author))
            .unwrap();
        let v2 = store
            .create_version(NewVersion::save(content, "second", author))
            .unwrap();
        let auto = store
            .create_version(NewVersion::autosave(content, "draft", author))
            .unwrap();
        let restored = store.restore_version(v1.id, author).unwrap();

        assert_eq!(TimelineEntry::from_version(&v1).summary, "Initial version");
        assert_eq!(
            TimelineEntry::from_version(&v2).summary,
            "Updated to version 2"
        );
        assert_eq!(TimelineEntry::from_version(&auto).summary, "Autosaved draft");
        assert_eq!(
            TimelineEntry::from_version(&restored).summary,
            "Restored from version 1"
        );
        assert_eq!(TimelineEntry::from_version(&v1).size_bytes, 5);
    }
}
