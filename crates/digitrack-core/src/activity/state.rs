use crate::activity::SessionRecord;

use serde::Serialize;

/// Internal state of the activity tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerState {
    /// No open session.
    Stopped,
    /// Session open, hands not yet seen.
    Waiting,
    /// Hands present in the latest sample.
    Active,
    /// Active interval in flight, hands absent for less than the idle threshold.
    IdleGrace,
    /// Hands absent for at least the idle threshold; the active interval is folded.
    IdleConfirmed,
}

impl TrackerState {
    /// Coarse status exposed to front ends.
    pub fn status(self) -> ActivityStatus {
        match self {
            TrackerState::Active | TrackerState::IdleGrace => ActivityStatus::Running,
            TrackerState::Waiting | TrackerState::IdleConfirmed => ActivityStatus::Idle,
            TrackerState::Stopped => ActivityStatus::Stopped,
        }
    }
}

/// Status reported by the `/total_time` style readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    /// Time is being accumulated.
    Running,
    /// Session open but not accumulating.
    Idle,
    /// No open session.
    Stopped,
}

impl ActivityStatus {
    /// Lowercase wire name (`running`, `idle`, `stopped`).
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityStatus::Running => "running",
            ActivityStatus::Idle => "idle",
            ActivityStatus::Stopped => "stopped",
        }
    }
}

/// Reportable outcome of evaluating one presence sample.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusTransition {
    /// Nothing worth reporting.
    Unchanged,
    /// Hands appeared after inactivity and a new active interval began.
    Active,
    /// The idle threshold was crossed and the active interval was folded.
    Idle,
    /// The stop threshold was crossed; the session was finalized.
    ///
    /// The record must be handed to a recorder exactly once.
    Stopped(SessionRecord),
}
