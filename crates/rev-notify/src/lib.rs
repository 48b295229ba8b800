//! Notification port for the content revision core.
//!
//! The core never delivers notifications itself. It emits [`RevisionEvent`]s
//! to a [`NotificationDispatcher`] provided by the surrounding platform
//! (email, in-app, webhooks — all out of scope here). The
//! [`RecordingDispatcher`] captures events in memory for tests.

pub mod event;

pub use event::{EventKind, RevisionEvent};

use std::sync::RwLock;

use rev_types::UserId;

/// Receives events from the revision core, addressed to a recipient set.
///
/// Implementations must be thread-safe; dispatch is fire-and-forget from the
/// core's point of view and must not fail the calling operation.
pub trait NotificationDispatcher: Send + Sync {
    /// Deliver `event` to `recipients`.
    fn dispatch(&self, recipients: &[UserId], event: &RevisionEvent);
}

/// A dispatcher that records every event in memory.
///
/// Intended for tests and embedding.
#[derive(Default)]
pub struct RecordingDispatcher {
    events: RwLock<Vec<(Vec<UserId>, RevisionEvent)>>,
}

impl RecordingDispatcher {
    /// Create a new empty recording dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded (recipients, event) pairs, in dispatch order.
    pub fn recorded(&self) -> Vec<(Vec<UserId>, RevisionEvent)> {
        self.events.read().expect("lock poisoned").clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.read().expect("lock poisoned").len()
    }

    /// Returns `true` if nothing has been dispatched.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of recorded events of the given kind.
    pub fn count_kind(&self, kind: EventKind) -> usize {
        self.events
            .read()
            .expect("lock poisoned")
            .iter()
            .filter(|(_, e)| e.kind() == kind)
            .count()
    }
}

impl NotificationDispatcher for RecordingDispatcher {
    fn dispatch(&self, recipients: &[UserId], event: &RevisionEvent) {
        tracing::debug!(kind = %event.kind(), recipients = recipients.len(), "event dispatched");
        self.events
            .write()
            .expect("lock poisoned")
            .push((recipients.to_vec(), event.clone()));
    }
}
