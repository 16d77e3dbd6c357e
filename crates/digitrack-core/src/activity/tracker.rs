use crate::{
    CoreResult, TrackerError,
    activity::{
        SessionRecord, StatusTransition, Thresholds, TrackerSnapshot, TrackerState,
        elapsed_between,
        session::Session,
        snapshot::people_estimate,
        thresholds::Absence,
    },
};

use std::panic::Location;

use chrono::{DateTime, Local};
use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Trim an order identifier.
///
/// # Errors
///
/// Returns [`TrackerError::MissingOrderId`] for empty or blank input.
#[track_caller]
pub fn normalize_order_id(order_id: &str) -> CoreResult<&str> {
    let order_id = order_id.trim();
    if order_id.is_empty() {
        return Err(TrackerError::MissingOrderId {
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(order_id)
}

#[derive(Debug)]
enum Phase {
    Closed,
    Open(Session),
    /// Finalized by the stop threshold, explicit stop not yet seen.
    AutoStopped {
        session_id: Uuid,
        order_id: String,
    },
}

/// Converts a per-frame hand count into session time accounting.
///
/// Single writer: the detection worker owns the tracker while a session
/// runs; readers only ever see [`TrackerSnapshot`]s.
#[derive(Debug)]
pub struct ActivityTracker {
    thresholds: Thresholds,
    phase: Phase,
    hand_count: usize,
}

impl ActivityTracker {
    /// Create a tracker with no open session.
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            phase: Phase::Closed,
            hand_count: 0,
        }
    }

    /// Configured thresholds.
    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Open a session for `order_id`, starting the absence clock at `now`.
    ///
    /// Any session already open is discarded without a record; callers
    /// that want it recorded must [`stop`](Self::stop) first.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::MissingOrderId`] for an empty or blank
    /// identifier, leaving the tracker untouched.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn open(&mut self, order_id: &str, now: DateTime<Local>) -> CoreResult<Uuid> {
        let order_id = normalize_order_id(order_id)?;

        if let Phase::Open(previous) = &self.phase {
            warn!(
                session_id = %previous.session_id,
                order_id = %previous.order_id,
                "Discarding open session without a record"
            );
        }

        let session = Session::open(order_id.to_string(), now);
        let session_id = session.session_id;
        self.phase = Phase::Open(session);
        self.hand_count = 0;

        info!(session_id = %session_id, order_id, "Session opened");

        Ok(session_id)
    }

    /// Evaluate one presence sample.
    ///
    /// Never fails. Samples arriving with no open session are ignored.
    pub fn evaluate(&mut self, hand_count: usize, now: DateTime<Local>) -> StatusTransition {
        let Phase::Open(session) = &mut self.phase else {
            return StatusTransition::Unchanged;
        };
        self.hand_count = hand_count;

        if hand_count > 0 {
            if now > session.last_presence_at {
                session.last_presence_at = now;
            }
            session.idle_confirmed = false;

            if session.is_active {
                return StatusTransition::Unchanged;
            }

            let started = session.last_presence_at;
            session.is_active = true;
            session.started_at = Some(started);
            session.first_active_at.get_or_insert(started);

            debug!(session_id = %session.session_id, hand_count, "Active interval started");
            return StatusTransition::Active;
        }

        let absent_for = elapsed_between(session.last_presence_at, now);

        match self.thresholds.classify(absent_for) {
            Absence::Grace => StatusTransition::Unchanged,
            Absence::Idle => {
                session.mark_idle(now);
                if !session.is_active {
                    return StatusTransition::Unchanged;
                }

                session.fold_active();
                debug!(
                    session_id = %session.session_id,
                    accumulated_secs = session.accumulated_active_secs,
                    "Idle threshold crossed"
                );
                StatusTransition::Idle
            }
            Absence::Expired => self.finalize(now),
        }
    }

    fn finalize(&mut self, now: DateTime<Local>) -> StatusTransition {
        let Phase::Open(mut session) = std::mem::replace(&mut self.phase, Phase::Closed) else {
            return StatusTransition::Unchanged;
        };

        session.fold_active();
        self.hand_count = 0;
        self.phase = Phase::AutoStopped {
            session_id: session.session_id,
            order_id: session.order_id.clone(),
        };

        let record = session.into_record(now);

        info!(
            session_id = %record.session_id,
            total_secs = record.total_active_secs,
            "Stop threshold crossed, session finalized"
        );

        StatusTransition::Stopped(record)
    }

    /// Explicitly stop the session.
    ///
    /// Returns the record to persist: the open session folded up to its
    /// last presence, or a single zero-duration record if the session
    /// was already auto-finalized. Returns `None` once nothing is left
    /// to record, so repeated stops never duplicate a write.
    #[instrument(skip(self))]
    pub fn stop(&mut self, now: DateTime<Local>) -> Option<SessionRecord> {
        self.hand_count = 0;

        match std::mem::replace(&mut self.phase, Phase::Closed) {
            Phase::Open(mut session) => {
                session.fold_active();
                let record = session.into_record(now);
                info!(
                    session_id = %record.session_id,
                    total_secs = record.total_active_secs,
                    "Session stopped"
                );
                Some(record)
            }
            Phase::AutoStopped {
                session_id,
                order_id,
            } => {
                info!(session_id = %session_id, "Stop after auto-finalize, zero-duration record");
                Some(SessionRecord {
                    session_id,
                    order_id,
                    total_active_secs: 0.0,
                    started_at: now,
                    stopped_at: now,
                })
            }
            Phase::Closed => {
                debug!("Stop requested with no session");
                None
            }
        }
    }

    /// Whether a session is open and accumulating or waiting.
    pub fn is_open(&self) -> bool {
        matches!(self.phase, Phase::Open(_))
    }

    /// Current fine-grained state.
    pub fn state(&self) -> TrackerState {
        match &self.phase {
            Phase::Closed | Phase::AutoStopped { .. } => TrackerState::Stopped,
            Phase::Open(session) => match (session.is_active, self.hand_count > 0) {
                (true, true) => TrackerState::Active,
                (true, false) => TrackerState::IdleGrace,
                (false, _) if session.first_active_at.is_some() => TrackerState::IdleConfirmed,
                (false, _) => TrackerState::Waiting,
            },
        }
    }

    /// Read-only view for front ends.
    pub fn snapshot(&self) -> TrackerSnapshot {
        let state = self.state();

        let Phase::Open(session) = &self.phase else {
            return TrackerSnapshot::stopped();
        };

        TrackerSnapshot {
            session_id: Some(session.session_id),
            production_order: Some(session.order_id.clone()),
            state,
            status: state.status(),
            hand_count: self.hand_count,
            people_estimate: people_estimate(self.hand_count),
            active_seconds: session.active_secs(),
            started_at: session.first_active_at,
            last_inactivity: session.last_inactivity,
            diagnostic: None,
        }
    }
}
