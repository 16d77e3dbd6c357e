use crate::{CoreResult, TrackerError};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;

/// Continuous absence after which a session reports idle.
pub const DEFAULT_IDLE_THRESHOLD: Duration = Duration::from_secs(10);

/// Continuous absence after which a session is finalized and recorded.
pub const DEFAULT_STOP_THRESHOLD: Duration = Duration::from_secs(30);

/// Where a stretch of hand absence falls relative to the thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Absence {
    /// `elapsed < idle`
    Grace,
    /// `idle <= elapsed < stop`
    Idle,
    /// `elapsed >= stop`
    Expired,
}

/// Idle/stop threshold pair, guaranteed `0 < idle < stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    idle: Duration,
    stop: Duration,
}

impl Thresholds {
    /// Create a threshold pair.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidThresholds`] unless `0 < idle < stop`.
    #[track_caller]
    pub fn new(idle: Duration, stop: Duration) -> CoreResult<Self> {
        if idle.is_zero() || idle >= stop {
            return Err(TrackerError::InvalidThresholds {
                idle_secs: idle.as_secs_f64(),
                stop_secs: stop.as_secs_f64(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self { idle, stop })
    }

    /// Absence before the session reports idle.
    pub fn idle(&self) -> Duration {
        self.idle
    }

    /// Absence before the session is finalized.
    pub fn stop(&self) -> Duration {
        self.stop
    }

    pub(crate) fn classify(&self, absent_for: Duration) -> Absence {
        if absent_for >= self.stop {
            Absence::Expired
        } else if absent_for >= self.idle {
            Absence::Idle
        } else {
            Absence::Grace
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            idle: DEFAULT_IDLE_THRESHOLD,
            stop: DEFAULT_STOP_THRESHOLD,
        }
    }
}
