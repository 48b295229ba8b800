//! Ordered multi-step approval workflow for content versions.
//!
//! An [`ApprovalWorkflow`] defines ordered steps with approver sets; an
//! [`ApprovalInstance`] drives one version through those steps with a
//! strict state machine (`draft -> pending -> approved | rejected |
//! changes_requested`) and an append-only decision log. Guards reject any
//! action outside the allowed edges or from users not on the current step.
//!
//! [`ApprovalSummary`] and [`StepProgress`] are the read models the
//! workflow UI layer consumes.

pub mod error;
pub mod machine;
pub mod summary;
pub mod workflow;

pub use error::{ApproveError, ApproveResult};
pub use machine::{
    ApprovalDecision, ApprovalInstance, Decision, StepOutcome, WorkflowState,
};
pub use summary::{ApprovalSummary, StepProgress, StepStatus, StepSummary};
pub use workflow::{ApprovalStep, ApprovalWorkflow, InMemoryWorkflowStore, WorkflowStore};
