//! Lifecycle status enums for versions and branches.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Approval status attached to a content version.
///
/// `Approved` is terminal for a given version: a new version restarts the
/// workflow at `None`/draft.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// No approval workflow has been started for this version.
    #[default]
    None,
    /// The version is inside an active workflow pass.
    Pending,
    /// All workflow steps approved the version.
    Approved,
    /// An approver rejected the version.
    Rejected,
    /// An approver asked for changes; the pass ended early.
    ChangesRequested,
}

impl ApprovalStatus {
    /// Returns `true` if no further decisions can be made on this version.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::ChangesRequested => "changes_requested",
        };
        write!(f, "{s}")
    }
}

/// Lifecycle status of a content branch.
///
/// `Merged` and `Archived` are terminal: a branch never leaves either state,
/// and no further versions may be created on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchStatus {
    /// The branch accepts new versions.
    #[default]
    Active,
    /// The branch was merged into main.
    Merged,
    /// The branch was closed without merging.
    Archived,
}

impl BranchStatus {
    /// Returns `true` if the branch can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Merged | Self::Archived)
    }
}

impl fmt::Display for BranchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Merged => "merged",
            Self::Archived => "archived",
        };
        write!(f, "{s}")
    }
}
