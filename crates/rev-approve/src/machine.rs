//! The approval state machine.
//!
//! One instance drives one version through a workflow definition. States:
//!
//! ```text
//! draft -> pending -> approved
//!                  -> rejected          -> pending (resubmit) | draft (withdraw)
//!                  -> changes_requested -> pending (resubmit) | draft (withdraw)
//! ```
//!
//! `approved` is terminal for the version; a new version starts a new
//! instance at `draft`. Within `pending` a step cursor advances through the
//! workflow's ordered steps. Rejections and changes requests end the whole
//! pass immediately without touching later steps. Decisions are append-only
//! and survive resubmission; only an explicit [`reset`](ApprovalInstance::reset)
//! clears them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rev_types::{ApprovalStatus, ContentId, UserId, VersionId};

use crate::error::{ApproveError, ApproveResult};
use crate::workflow::{ApprovalStep, ApprovalWorkflow};

/// Lifecycle state of an approval instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    /// Not yet submitted for approval.
    #[default]
    Draft,
    /// In review; the step cursor is live.
    Pending,
    /// Every step approved. Terminal.
    Approved,
    /// An approver rejected the version.
    Rejected,
    /// An approver asked for changes.
    ChangesRequested,
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::ChangesRequested => "changes_requested",
        };
        write!(f, "{s}")
    }
}

/// What an approver decided at a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
    ChangesRequested,
}

/// An immutable record of one decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalDecision {
    /// Index of the step the decision was made at.
    pub step_index: usize,
    /// Which submission pass the decision belongs to (first pass is 1).
    pub pass: u32,
    /// Who decided.
    pub user: UserId,
    /// The decision.
    pub decision: Decision,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// When the decision was recorded.
    pub decided_at: DateTime<Utc>,
}

/// Result of a successful `approve_step`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// More steps remain; the cursor moved to `next_step`.
    Advanced { next_step: usize },
    /// That was the last step; the instance is now approved.
    Completed,
}

/// A version's journey through one workflow.
///
/// The instance embeds a copy of the workflow definition so later edits to
/// the definition never change the rules of an in-flight approval.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApprovalInstance {
    /// The content item under review.
    pub content_id: ContentId,
    /// The version under review.
    pub version_id: VersionId,
    /// The workflow definition this instance follows.
    pub workflow: ApprovalWorkflow,
    state: WorkflowState,
    current_step: usize,
    pass: u32,
    decisions: Vec<ApprovalDecision>,
}

impl ApprovalInstance {
    /// Start a new instance at `draft`.
    pub fn new(
        content_id: ContentId,
        version_id: VersionId,
        workflow: ApprovalWorkflow,
    ) -> ApproveResult<Self> {
        if workflow.steps.is_empty() {
            return Err(ApproveError::EmptyWorkflow);
        }
        Ok(Self {
            content_id,
            version_id,
            workflow,
            state: WorkflowState::Draft,
            current_step: 0,
            pass: 0,
            decisions: Vec::new(),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Index of the step the cursor sits on.
    pub fn current_step_index(&self) -> usize {
        self.current_step
    }

    /// The step the cursor sits on, when the instance is pending.
    pub fn current_step(&self) -> Option<&ApprovalStep> {
        if self.state == WorkflowState::Pending {
            self.workflow.steps.get(self.current_step)
        } else {
            None
        }
    }

    /// The submission pass currently in flight (0 before first submit).
    pub fn pass(&self) -> u32 {
        self.pass
    }

    /// Every decision ever recorded, in order.
    pub fn decisions(&self) -> &[ApprovalDecision] {
        &self.decisions
    }

    /// The version-level status corresponding to this instance's state.
    pub fn approval_status(&self) -> ApprovalStatus {
        match self.state {
            WorkflowState::Draft => ApprovalStatus::None,
            WorkflowState::Pending => ApprovalStatus::Pending,
            WorkflowState::Approved => ApprovalStatus::Approved,
            WorkflowState::Rejected => ApprovalStatus::Rejected,
            WorkflowState::ChangesRequested => ApprovalStatus::ChangesRequested,
        }
    }

    /// Submit (or resubmit) for approval.
    ///
    /// Allowed from `draft`, `rejected`, and `changes_requested`. The step
    /// cursor returns to the first step; earlier decisions are kept for the
    /// audit trail.
    pub fn submit(&mut self) -> ApproveResult<()> {
        match self.state {
            WorkflowState::Draft | WorkflowState::Rejected | WorkflowState::ChangesRequested => {
                self.state = WorkflowState::Pending;
                self.current_step = 0;
                self.pass += 1;
                tracing::debug!(version = %self.version_id, pass = self.pass, "submitted for approval");
                Ok(())
            }
            from => Err(ApproveError::InvalidTransition {
                action: "submit",
                from,
            }),
        }
    }

    /// Withdraw back to `draft` after a rejection or changes request.
    pub fn withdraw(&mut self) -> ApproveResult<()> {
        match self.state {
            WorkflowState::Rejected | WorkflowState::ChangesRequested => {
                self.state = WorkflowState::Draft;
                self.current_step = 0;
                Ok(())
            }
            from => Err(ApproveError::InvalidTransition {
                action: "withdraw",
                from,
            }),
        }
    }

    /// `true` only when the instance is pending and `user` belongs to the
    /// current step's approver set.
    pub fn can_approve(&self, user: UserId) -> bool {
        self.current_step()
            .is_some_and(|step| step.approvers.contains(&user))
    }

    /// Approve the current step.
    ///
    /// Records the decision, then either advances the cursor or, on the
    /// last step, transitions the instance to `approved`.
    pub fn approve_step(
        &mut self,
        user: UserId,
        comment: Option<String>,
    ) -> ApproveResult<StepOutcome> {
        self.guard(user, "approve")?;
        self.record(user, Decision::Approved, comment);

        if self.current_step + 1 < self.workflow.steps.len() {
            self.current_step += 1;
            tracing::debug!(
                version = %self.version_id,
                step = self.current_step,
                "approval advanced"
            );
            Ok(StepOutcome::Advanced {
                next_step: self.current_step,
            })
        } else {
            self.state = WorkflowState::Approved;
            tracing::debug!(version = %self.version_id, "approval completed");
            Ok(StepOutcome::Completed)
        }
    }

    /// Reject at the current step, ending the pass immediately.
    ///
    /// Later steps are never consulted.
    pub fn reject_step(&mut self, user: UserId, comment: Option<String>) -> ApproveResult<()> {
        self.guard(user, "reject")?;
        self.record(user, Decision::Rejected, comment);
        self.state = WorkflowState::Rejected;
        Ok(())
    }

    /// Request changes at the current step, ending the pass immediately.
    pub fn request_changes(&mut self, user: UserId, comment: Option<String>) -> ApproveResult<()> {
        self.guard(user, "request changes on")?;
        self.record(user, Decision::ChangesRequested, comment);
        self.state = WorkflowState::ChangesRequested;
        Ok(())
    }

    /// Explicit full reset: back to `draft`, cursor at the first step, all
    /// decisions discarded. The only path that deletes decisions.
    pub fn reset(&mut self) {
        self.state = WorkflowState::Draft;
        self.current_step = 0;
        self.pass = 0;
        self.decisions.clear();
    }

    fn guard(&self, user: UserId, action: &'static str) -> ApproveResult<()> {
        if self.state != WorkflowState::Pending {
            return Err(ApproveError::InvalidTransition {
                action,
                from: self.state,
            });
        }
        if !self.can_approve(user) {
            return Err(ApproveError::NotAnApprover {
                user,
                step: self.current_step,
            });
        }
        Ok(())
    }

    fn record(&mut self, user: UserId, decision: Decision, comment: Option<String>) {
        self.decisions.push(ApprovalDecision {
            step_index: self.current_step,
            pass: self.pass,
            user,
            decision,
            comment,
            decided_at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_step_instance() -> (ApprovalInstance, UserId, UserId) {
        let first = UserId::new();
        let second = UserId::new();
        let workflow = ApprovalWorkflow::new(
            "editorial",
            vec![
                ApprovalStep::new("editor review", [first]),
                ApprovalStep::new("legal review", [second]),
            ],
        )
        .unwrap();
        let instance =
            ApprovalInstance::new(ContentId::new(), VersionId::new(), workflow).unwrap();
        (instance, first, second)
    }

    // -----------------------------------------------------------------------
    // Happy path
    // -----------------------------------------------------------------------

    #[test]
    fn single_step_approval_completes() {
        let alice = UserId::new();
        let workflow =
            ApprovalWorkflow::new("simple", vec![ApprovalStep::new("review", [alice])]).unwrap();
        let mut instance =
            ApprovalInstance::new(ContentId::new(), VersionId::new(), workflow).unwrap();

        instance.submit().unwrap();
        let outcome = instance.approve_step(alice, None).unwrap();
        assert_eq!(outcome, StepOutcome::Completed);
        assert_eq!(instance.state(), WorkflowState::Approved);
        assert_eq!(instance.approval_status(), ApprovalStatus::Approved);
    }

    #[test]
    fn multi_step_advances_cursor() {
        let (mut instance, first, second) = two_step_instance();
        instance.submit().unwrap();

        let outcome = instance.approve_step(first, Some("looks good".into())).unwrap();
        assert_eq!(outcome, StepOutcome::Advanced { next_step: 1 });
        assert_eq!(instance.state(), WorkflowState::Pending);
        assert_eq!(instance.current_step().unwrap().name, "legal review");

        let outcome = instance.approve_step(second, None).unwrap();
        assert_eq!(outcome, StepOutcome::Completed);
        assert_eq!(instance.decisions().len(), 2);
    }

    // -----------------------------------------------------------------------
    // Guards
    // -----------------------------------------------------------------------

    #[test]
    fn only_current_step_approvers_may_act() {
        let (mut instance, _, second) = two_step_instance();
        instance.submit().unwrap();

        // Second-step approver cannot act while the cursor is on step 0.
        assert!(!instance.can_approve(second));
        let err = instance.approve_step(second, None).unwrap_err();
        assert!(matches!(err, ApproveError::NotAnApprover { step: 0, .. }));
        assert!(instance.decisions().is_empty());
    }

    #[test]
    fn actions_outside_pending_are_invalid() {
        let (mut instance, first, _) = two_step_instance();

        // Not submitted yet.
        assert!(!instance.can_approve(first));
        assert!(matches!(
            instance.approve_step(first, None).unwrap_err(),
            ApproveError::InvalidTransition {
                from: WorkflowState::Draft,
                ..
            }
        ));

        // Approving already-approved content.
        let alice = UserId::new();
        let workflow =
            ApprovalWorkflow::new("simple", vec![ApprovalStep::new("review", [alice])]).unwrap();
        let mut done = ApprovalInstance::new(ContentId::new(), VersionId::new(), workflow).unwrap();
        done.submit().unwrap();
        done.approve_step(alice, None).unwrap();
        assert!(matches!(
            done.approve_step(alice, None).unwrap_err(),
            ApproveError::InvalidTransition {
                from: WorkflowState::Approved,
                ..
            }
        ));
        assert!(done.submit().is_err());
    }

    // -----------------------------------------------------------------------
    // Rejection short-circuits
    // -----------------------------------------------------------------------

    #[test]
    fn reject_midway_skips_later_steps() {
        let users: Vec<UserId> = (0..3).map(|_| UserId::new()).collect();
        let workflow = ApprovalWorkflow::new(
            "three step",
            vec![
                ApprovalStep::new("one", [users[0]]),
                ApprovalStep::new("two", [users[1]]),
                ApprovalStep::new("three", [users[2]]),
            ],
        )
        .unwrap();
        let mut instance =
            ApprovalInstance::new(ContentId::new(), VersionId::new(), workflow).unwrap();
        instance.submit().unwrap();
        instance.approve_step(users[0], None).unwrap();

        instance.reject_step(users[1], Some("not ready".into())).unwrap();
        assert_eq!(instance.state(), WorkflowState::Rejected);
        // Step three was never touched: no decision mentions it, and its
        // approver cannot act.
        assert!(instance.decisions().iter().all(|d| d.step_index < 2));
        assert!(!instance.can_approve(users[2]));
    }

    #[test]
    fn request_changes_ends_the_pass() {
        let (mut instance, first, second) = two_step_instance();
        instance.submit().unwrap();
        instance.request_changes(first, None).unwrap();

        assert_eq!(instance.state(), WorkflowState::ChangesRequested);
        assert_eq!(instance.approval_status(), ApprovalStatus::ChangesRequested);
        assert!(!instance.can_approve(second));
    }

    // -----------------------------------------------------------------------
    // Resubmission and withdrawal
    // -----------------------------------------------------------------------

    #[test]
    fn resubmit_restarts_at_step_one_keeping_decisions() {
        let (mut instance, first, second) = two_step_instance();
        instance.submit().unwrap();
        instance.approve_step(first, None).unwrap();
        instance.reject_step(second, None).unwrap();

        instance.submit().unwrap();
        assert_eq!(instance.state(), WorkflowState::Pending);
        assert_eq!(instance.current_step_index(), 0);
        assert_eq!(instance.pass(), 2);
        // The first pass's decisions survive for the audit trail.
        assert_eq!(instance.decisions().len(), 2);
        assert!(instance.decisions().iter().all(|d| d.pass == 1));
    }

    #[test]
    fn withdraw_returns_to_draft() {
        let (mut instance, first, _) = two_step_instance();
        instance.submit().unwrap();
        instance.request_changes(first, None).unwrap();

        instance.withdraw().unwrap();
        assert_eq!(instance.state(), WorkflowState::Draft);
        // Withdrawing from draft or pending is invalid.
        assert!(instance.withdraw().is_err());
        instance.submit().unwrap();
        assert!(instance.withdraw().is_err());
    }

    #[test]
    fn reset_clears_decisions() {
        let (mut instance, first, _) = two_step_instance();
        instance.submit().unwrap();
        instance.approve_step(first, None).unwrap();

        instance.reset();
        assert_eq!(instance.state(), WorkflowState::Draft);
        assert!(instance.decisions().is_empty());
        assert_eq!(instance.pass(), 0);
    }
}
