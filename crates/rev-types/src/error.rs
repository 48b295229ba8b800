//! Error types shared across the foundation crate.

/// Errors from parsing or constructing foundation types.
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
    /// A string could not be parsed as a UUID.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}
