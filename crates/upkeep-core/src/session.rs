use tokio::sync::oneshot;
use upkeep_provider::{UpdateKind, UpdateMetadata};

use crate::error::SessionError;

pub(crate) type Resolution = Result<(), SessionError>;

/// Observable phase of the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session: nothing checked yet, or the last flow reached a
    /// terminal outcome.
    Idle,
    /// Metadata is held and no update flow awaits resolution.
    Checked,
    /// An update flow has been started and awaits its terminal outcome.
    Pending,
}

/// The record of one check-through-complete lifecycle.
///
/// At most one instance lives per coordinator, and at most one pending
/// sender per instance. Replaced wholesale, never left half-updated.
#[derive(Debug)]
pub(crate) struct Session {
    pub metadata: UpdateMetadata,
    pub in_flight: Option<UpdateKind>,
    pub pending: Option<oneshot::Sender<Resolution>>,
}

impl Session {
    pub fn new(metadata: UpdateMetadata) -> Self {
        Self {
            metadata,
            in_flight: None,
            pending: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.pending.is_some() {
            SessionPhase::Pending
        } else {
            SessionPhase::Checked
        }
    }
}
