use crate::activity::{elapsed_between, format_hms, format_timestamp};

use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

/// Wall-clock window of the latest confirmed idleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InactivityWindow {
    /// When the idle threshold was crossed.
    pub from: DateTime<Local>,
    /// Latest absent sample while idle.
    pub to: DateTime<Local>,
}

/// One tracked interval for a single order identifier.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) session_id: Uuid,
    pub(crate) order_id: String,
    pub(crate) is_active: bool,
    /// Start of the in-flight active interval.
    pub(crate) started_at: Option<DateTime<Local>>,
    pub(crate) accumulated_active_secs: f64,
    pub(crate) last_presence_at: DateTime<Local>,
    pub(crate) opened_at: DateTime<Local>,
    pub(crate) first_active_at: Option<DateTime<Local>>,
    pub(crate) last_inactivity: Option<InactivityWindow>,
    pub(crate) idle_confirmed: bool,
}

impl Session {
    pub(crate) fn open(order_id: String, now: DateTime<Local>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            order_id,
            is_active: false,
            started_at: None,
            accumulated_active_secs: 0.0,
            last_presence_at: now,
            opened_at: now,
            first_active_at: None,
            last_inactivity: None,
            idle_confirmed: false,
        }
    }

    /// Seconds of the in-flight active interval, up to the last presence.
    pub(crate) fn in_flight_secs(&self) -> f64 {
        match (self.is_active, self.started_at) {
            (true, Some(started)) => elapsed_between(started, self.last_presence_at).as_secs_f64(),
            _ => 0.0,
        }
    }

    pub(crate) fn active_secs(&self) -> f64 {
        self.accumulated_active_secs + self.in_flight_secs()
    }

    /// Close the in-flight active interval into the accumulator.
    pub(crate) fn fold_active(&mut self) {
        self.accumulated_active_secs += self.in_flight_secs();
        self.started_at = None;
        self.is_active = false;
    }

    pub(crate) fn mark_idle(&mut self, now: DateTime<Local>) {
        if self.idle_confirmed {
            if let Some(window) = self.last_inactivity.as_mut() {
                window.to = now;
            }
        } else {
            self.idle_confirmed = true;
            self.last_inactivity = Some(InactivityWindow { from: now, to: now });
        }
    }

    pub(crate) fn into_record(self, stopped_at: DateTime<Local>) -> SessionRecord {
        SessionRecord {
            session_id: self.session_id,
            order_id: self.order_id,
            total_active_secs: self.accumulated_active_secs,
            started_at: self.first_active_at.unwrap_or(self.opened_at),
            stopped_at,
        }
    }
}

/// Immutable summary of a finalized session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    /// Correlation id of the session that produced this record.
    pub session_id: Uuid,
    /// Production order the session was tracked against.
    pub order_id: String,
    /// Accumulated active time in seconds.
    pub total_active_secs: f64,
    /// First activation (or open time if never active).
    pub started_at: DateTime<Local>,
    /// Finalization time.
    pub stopped_at: DateTime<Local>,
}

impl SessionRecord {
    /// Active time as `HH:MM:SS`.
    pub fn formatted_duration(&self) -> String {
        format_hms(self.total_active_secs)
    }

    /// Start as `YYYY-MM-DD HH:MM:SS`.
    pub fn formatted_start(&self) -> String {
        format_timestamp(&self.started_at)
    }

    /// Stop as `YYYY-MM-DD HH:MM:SS`.
    pub fn formatted_stop(&self) -> String {
        format_timestamp(&self.stopped_at)
    }
}
