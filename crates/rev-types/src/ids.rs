//! Identifier newtypes.
//!
//! All ids are time-ordered UUID v7 values, so freshly created rows sort
//! roughly by creation time without an extra column.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a new time-ordered id (UUID v7).
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            /// Create from an existing UUID.
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// The underlying UUID.
            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }

            /// Short representation (first 8 characters of the UUID).
            pub fn short_id(&self) -> String {
                self.0.to_string()[..8].to_string()
            }

            /// Parse from a string representation.
            pub fn parse(s: &str) -> Result<Self, TypeError> {
                uuid::Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| TypeError::InvalidId(e.to_string()))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.short_id())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.short_id())
            }
        }
    };
}

define_id!(
    /// Identifier for a content item (the thing being versioned).
    ContentId,
    "content"
);

define_id!(
    /// Identifier for a single immutable version of a content item.
    VersionId,
    "version"
);

define_id!(
    /// Identifier for a divergent branch of a content item.
    BranchId,
    "branch"
);

define_id!(
    /// Identifier for a user (author, approver).
    UserId,
    "user"
);

define_id!(
    /// Identifier for an approval workflow definition.
    WorkflowId,
    "workflow"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(ContentId::new(), ContentId::new());
        assert_ne!(VersionId::new(), VersionId::new());
    }

    #[test]
    fn v7_ids_sort_by_creation() {
        let a = VersionId::new();
        let b = VersionId::new();
        assert!(a < b);
    }

    #[test]
    fn display_carries_prefix() {
        let id = BranchId::new();
        assert!(format!("{id}").starts_with("branch:"));
        assert!(format!("{}", UserId::new()).starts_with("user:"));
    }

    #[test]
    fn parse_roundtrip() {
        let id = ContentId::new();
        let parsed = ContentId::parse(&id.as_uuid().to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            ContentId::parse("not-a-uuid"),
            Err(TypeError::InvalidId(_))
        ));
    }

    #[test]
    fn serde_roundtrip() {
        let id = WorkflowId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: WorkflowId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
