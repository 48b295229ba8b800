//! Workflow definitions and their store.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use rev_types::{UserId, WorkflowId};

use crate::error::{ApproveError, ApproveResult};

/// One stage of an approval workflow: a name and the users allowed to
/// decide it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalStep {
    /// Human-readable step name.
    pub name: String,
    /// Users allowed to approve, reject, or request changes at this step.
    pub approvers: BTreeSet<UserId>,
}

impl ApprovalStep {
    /// A step with the given name and approver set.
    pub fn new(name: impl Into<String>, approvers: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            name: name.into(),
            approvers: approvers.into_iter().collect(),
        }
    }
}

/// An ordered list of approval steps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalWorkflow {
    /// Unique workflow id.
    pub id: WorkflowId,
    /// Human-readable workflow name.
    pub name: String,
    /// Steps in the order they must pass.
    pub steps: Vec<ApprovalStep>,
}

impl ApprovalWorkflow {
    /// A new workflow definition. Fails if `steps` is empty.
    pub fn new(
        name: impl Into<String>,
        steps: Vec<ApprovalStep>,
    ) -> ApproveResult<Self> {
        if steps.is_empty() {
            return Err(ApproveError::EmptyWorkflow);
        }
        Ok(Self {
            id: WorkflowId::new(),
            name: name.into(),
            steps,
        })
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`: empty workflows cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Persistence seam for workflow definitions.
///
/// Definitions are owned by the surrounding platform; this core only reads
/// them when instantiating approvals.
pub trait WorkflowStore: Send + Sync {
    /// Persist a workflow definition, replacing any previous one with the
    /// same id.
    fn put_workflow(&self, workflow: ApprovalWorkflow) -> ApproveResult<()>;

    /// Fetch a definition by id.
    fn get_workflow(&self, id: WorkflowId) -> ApproveResult<Option<ApprovalWorkflow>>;
}

/// In-memory workflow store for tests and embedding.
#[derive(Default)]
pub struct InMemoryWorkflowStore {
    workflows: RwLock<HashMap<WorkflowId, ApprovalWorkflow>>,
}

impl InMemoryWorkflowStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkflowStore for InMemoryWorkflowStore {
    fn put_workflow(&self, workflow: ApprovalWorkflow) -> ApproveResult<()> {
        self.workflows
            .write()
            .expect("lock poisoned")
            .insert(workflow.id, workflow);
        Ok(())
    }

    fn get_workflow(&self, id: WorkflowId) -> ApproveResult<Option<ApprovalWorkflow>> {
        Ok(self
            .workflows
            .read()
            .expect("lock poisoned")
            .get(&id)
            .cloned())
    }
}

impl std::fmt::Debug for InMemoryWorkflowStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryWorkflowStore")
            .field(
                "workflow_count",
                &self.workflows.read().expect("lock poisoned").len(),
            )
            .finish()
    }
}
