//! Ingestion phase state machine, events, and cancellation

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Where the store's ingestion pipeline currently is
///
/// `Idle → Transferring(0..=100) → Synthesizing → Done(id)`. A cancelled
/// ingestion falls back to `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "value", rename_all = "lowercase")]
pub enum IngestPhase {
    #[default]
    Idle,
    /// Upload progress in percent
    Transferring(u8),
    Synthesizing,
    /// Last ingestion finished and produced this record
    Done(Uuid),
}

impl IngestPhase {
    /// Check if an ingestion is in flight
    pub fn is_active(&self) -> bool {
        matches!(self, IngestPhase::Transferring(_) | IngestPhase::Synthesizing)
    }

    /// Upload progress for display. Synthesizing and done report 100.
    pub fn progress(&self) -> u8 {
        match self {
            IngestPhase::Idle => 0,
            IngestPhase::Transferring(pct) => *pct,
            IngestPhase::Synthesizing | IngestPhase::Done(_) => 100,
        }
    }
}

impl std::fmt::Display for IngestPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestPhase::Idle => write!(f, "Idle"),
            IngestPhase::Transferring(pct) => write!(f, "Transferring ({}%)", pct),
            IngestPhase::Synthesizing => write!(f, "Synthesizing"),
            IngestPhase::Done(_) => write!(f, "Done"),
        }
    }
}

/// Notifications published to store subscribers
#[derive(Clone, Debug, PartialEq)]
pub enum IngestEvent {
    /// Upload accepted
    Started { filename: String },
    /// Transfer progress in percent
    Progress(u8),
    /// Transfer finished, record being synthesized
    Synthesizing,
    /// Record committed and selected
    Completed(Uuid),
    /// Ingestion rolled back
    Cancelled,
}

/// Shared flag to abort an in-flight ingestion
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_activity() {
        assert!(!IngestPhase::Idle.is_active());
        assert!(IngestPhase::Transferring(40).is_active());
        assert!(IngestPhase::Synthesizing.is_active());
        assert!(!IngestPhase::Done(Uuid::nil()).is_active());
    }

    #[test]
    fn test_phase_progress() {
        assert_eq!(IngestPhase::Idle.progress(), 0);
        assert_eq!(IngestPhase::Transferring(30).progress(), 30);
        assert_eq!(IngestPhase::Synthesizing.progress(), 100);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(IngestPhase::Transferring(70).to_string(), "Transferring (70%)");
        assert_eq!(IngestPhase::Idle.to_string(), "Idle");
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
