use crate::activity::{ActivityStatus, InactivityWindow, TrackerState};

use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

/// Read-only view of the tracker, published after every frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerSnapshot {
    /// Correlation id of the open session, if any.
    pub session_id: Option<Uuid>,
    /// Order identifier of the open session, if any.
    pub production_order: Option<String>,
    /// Fine-grained tracker state.
    pub state: TrackerState,
    /// Coarse status for front ends.
    pub status: ActivityStatus,
    /// Hands detected in the latest sample.
    pub hand_count: usize,
    /// `ceil(hand_count / 2)`.
    pub people_estimate: usize,
    /// Accumulated plus in-flight active seconds.
    pub active_seconds: f64,
    /// First activation of the open session.
    pub started_at: Option<DateTime<Local>>,
    /// Latest confirmed idle window of the open session.
    pub last_inactivity: Option<InactivityWindow>,
    /// Terminal condition reported by the worker, if any.
    pub diagnostic: Option<String>,
}

impl TrackerSnapshot {
    /// Snapshot of a tracker with no open session.
    pub fn stopped() -> Self {
        Self {
            session_id: None,
            production_order: None,
            state: TrackerState::Stopped,
            status: ActivityStatus::Stopped,
            hand_count: 0,
            people_estimate: 0,
            active_seconds: 0.0,
            started_at: None,
            last_inactivity: None,
            diagnostic: None,
        }
    }

    /// Attach a diagnostic message.
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }
}

impl Default for TrackerSnapshot {
    fn default() -> Self {
        Self::stopped()
    }
}

/// Two hands per person, rounded up.
pub(crate) fn people_estimate(hand_count: usize) -> usize {
    hand_count.div_ceil(2)
}
