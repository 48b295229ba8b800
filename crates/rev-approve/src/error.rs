use rev_types::{UserId, WorkflowId};

use crate::machine::WorkflowState;

/// Errors from approval workflow operations.
///
/// Invalid transitions are never silently corrected: an action outside the
/// allowed state-machine edges surfaces here and leaves the instance
/// untouched.
#[derive(Debug, thiserror::Error)]
pub enum ApproveError {
    /// The workflow definition does not exist.
    #[error("workflow not found: {0}")]
    WorkflowNotFound(WorkflowId),

    /// The action is not allowed from the instance's current state.
    #[error("cannot {action} from state {from}")]
    InvalidTransition {
        action: &'static str,
        from: WorkflowState,
    },

    /// The user is not in the approver set of the current step.
    #[error("user {user} is not an approver for step {step}")]
    NotAnApprover { user: UserId, step: usize },

    /// A workflow definition with no steps cannot drive approvals.
    #[error("workflow has no steps")]
    EmptyWorkflow,
}

/// Result alias for approval operations.
pub type ApproveResult<T> = Result<T, ApproveError>;
