//! Append-only version store for the content revision core.
//!
//! Every save of a content item produces a new [`ContentVersion`] with a
//! monotonic number assigned by the store. Restores and autosave promotions
//! append copies rather than rewriting history; retention cleanup is the
//! only path that deletes records, and it reports what it deleted so cached
//! diffs can be cascaded out.
//!
//! The [`VersionStore`] trait is the seam to the surrounding platform's
//! persistence; [`InMemoryVersionStore`] backs tests and embedded use.

pub mod error;
pub mod memory;
pub mod traits;
pub mod version;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryVersionStore;
pub use traits::VersionStore;
pub use version::{ContentVersion, NewVersion};
