//! Foundation types for the content revision core.
//!
//! This crate provides the identifiers, payload model, and status enums used
//! throughout the revision system. Every other `rev-*` crate depends on it.
//!
//! # Key Types
//!
//! - [`ContentId`] / [`VersionId`] / [`BranchId`] / [`UserId`] / [`WorkflowId`] — UUID v7 identifiers
//! - [`Document`] — ordered key-value payload (`BTreeMap<String, serde_json::Value>`)
//! - [`VersionData`] — the payload of a version: plain text or a structured document
//! - [`ApprovalStatus`] / [`BranchStatus`] — lifecycle enums

pub mod error;
pub mod ids;
pub mod payload;
pub mod status;

pub use error::TypeError;
pub use ids::{BranchId, ContentId, UserId, VersionId, WorkflowId};
pub use payload::{Document, VersionData};
pub use status::{ApprovalStatus, BranchStatus};
