//! Read models for the approval UI layer.

use serde::{Deserialize, Serialize};

use rev_types::UserId;

use crate::machine::{ApprovalDecision, ApprovalInstance, Decision, WorkflowState};

/// Per-step status in the current submission pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// The pass has not reached this step.
    NotStarted,
    /// The cursor sits on this step awaiting a decision.
    Pending,
    Approved,
    Rejected,
    ChangesRequested,
}

/// Progress of one step in the current pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepProgress {
    /// Step position in the workflow.
    pub index: usize,
    /// Step name from the definition.
    pub name: String,
    /// Users allowed to decide this step.
    pub approvers: Vec<UserId>,
    /// Where the step stands in the current pass.
    pub status: StepStatus,
}

/// One step with its full decision history, across all passes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSummary {
    /// Step position in the workflow.
    pub index: usize,
    /// Step name from the definition.
    pub name: String,
    /// Users allowed to decide this step.
    pub approvers: Vec<UserId>,
    /// Every decision ever recorded at this step, oldest first.
    pub decisions: Vec<ApprovalDecision>,
}

/// The full picture the workflow UI renders: overall state, cursor, and
/// decisions grouped by step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApprovalSummary {
    /// Overall instance state.
    pub state: WorkflowState,
    /// Cursor position, present only while pending.
    pub current_step: Option<usize>,
    /// Steps with their decision history.
    pub steps: Vec<StepSummary>,
}

impl ApprovalInstance {
    /// Decisions grouped by step plus the overall state.
    pub fn summary(&self) -> ApprovalSummary {
        let steps = self
            .workflow
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| StepSummary {
                index,
                name: step.name.clone(),
                approvers: step.approvers.iter().copied().collect(),
                decisions: self
                    .decisions()
                    .iter()
                    .filter(|d| d.step_index == index)
                    .cloned()
                    .collect(),
            })
            .collect();
        ApprovalSummary {
            state: self.state(),
            current_step: if self.state() == WorkflowState::Pending {
                Some(self.current_step_index())
            } else {
                None
            },
            steps,
        }
    }

    /// Per-step status for the current pass.
    pub fn progress(&self) -> Vec<StepProgress> {
        let pass = self.pass();
        self.workflow
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let decision = self
                    .decisions()
                    .iter()
                    .filter(|d| d.pass == pass && d.step_index == index)
                    .next_back();
                let status = match decision {
                    Some(d) => match d.decision {
                        Decision::Approved => StepStatus::Approved,
                        Decision::Rejected => StepStatus::Rejected,
                        Decision::ChangesRequested => StepStatus::ChangesRequested,
                    },
                    None if self.state() == WorkflowState::Pending
                        && index == self.current_step_index() =>
                    {
                        StepStatus::Pending
                    }
                    None => StepStatus::NotStarted,
                };
                StepProgress {
                    index,
                    name: step.name.clone(),
                    approvers: step.approvers.iter().copied().collect(),
                    status,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{ApprovalStep, ApprovalWorkflow};
    use rev_types::{ContentId, VersionId};

    fn three_step() -> (ApprovalInstance, Vec<UserId>) {
        let users: Vec<UserId> = (0..3).map(|_| UserId::new()).collect();
        let workflow = ApprovalWorkflow::new(
            "editorial",
            vec![
                ApprovalStep::new("draft review", [users[0]]),
                ApprovalStep::new("editor review", [users[1]]),
                ApprovalStep::new("legal review", [users[2]]),
            ],
        )
        .unwrap();
        let instance =
            ApprovalInstance::new(ContentId::new(), VersionId::new(), workflow).unwrap();
        (instance, users)
    }

    #[test]
    fn progress_tracks_the_cursor() {
        let (mut instance, users) = three_step();
        instance.submit().unwrap();
        instance.approve_step(users[0], None).unwrap();

        let progress = instance.progress();
        assert_eq!(progress[0].status, StepStatus::Approved);
        assert_eq!(progress[1].status, StepStatus::Pending);
        assert_eq!(progress[2].status, StepStatus::NotStarted);
    }

    #[test]
    fn rejection_shows_on_the_deciding_step() {
        let (mut instance, users) = three_step();
        instance.submit().unwrap();
        instance.approve_step(users[0], None).unwrap();
        instance.reject_step(users[1], None).unwrap();

        let progress = instance.progress();
        assert_eq!(progress[0].status, StepStatus::Approved);
        assert_eq!(progress[1].status, StepStatus::Rejected);
        assert_eq!(progress[2].status, StepStatus::NotStarted);
    }

    #[test]
    fn resubmission_resets_progress_but_not_history() {
        let (mut instance, users) = three_step();
        instance.submit().unwrap();
        instance.approve_step(users[0], None).unwrap();
        instance.reject_step(users[1], None).unwrap();
        instance.submit().unwrap();

        // New pass: everything back to the start.
        let progress = instance.progress();
        assert_eq!(progress[0].status, StepStatus::Pending);
        assert_eq!(progress[1].status, StepStatus::NotStarted);

        // History keeps both first-pass decisions grouped by step.
        let summary = instance.summary();
        assert_eq!(summary.state, WorkflowState::Pending);
        assert_eq!(summary.current_step, Some(0));
        assert_eq!(summary.steps[0].decisions.len(), 1);
        assert_eq!(summary.steps[1].decisions.len(), 1);
        assert!(summary.steps[2].decisions.is_empty());
    }

    #[test]
    fn summary_outside_pending_has_no_cursor() {
        let (instance, _) = three_step();
        assert_eq!(instance.summary().current_step, None);
    }
}
