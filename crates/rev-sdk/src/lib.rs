//! High-level facade for the content revision core.
//!
//! [`Revisions`] wires the version store, comparison cache, branch engine,
//! approval workflow, and notification port together behind one API:
//! saves, autosaves, restores, cached comparisons, three-way branch merges,
//! and multi-step approvals. Collaborators are injected, so the surrounding
//! platform chooses the backends; [`Revisions::in_memory`] covers tests and
//! embedding.

pub mod compare;
pub mod error;
pub mod revisions;
pub mod timeline;

pub use compare::Comparison;
pub use error::{RevError, RevResult};
pub use revisions::{MergeReport, Revisions};
pub use timeline::TimelineEntry;
