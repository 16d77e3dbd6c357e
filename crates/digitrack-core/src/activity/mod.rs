mod format;
mod session;
mod snapshot;
mod state;
mod thresholds;
mod tracker;

pub(crate) use format::elapsed_between;

pub use {
    format::{TIMESTAMP_FORMAT, format_hms, format_timestamp},
    session::{InactivityWindow, SessionRecord},
    snapshot::TrackerSnapshot,
    state::{ActivityStatus, StatusTransition, TrackerState},
    thresholds::{DEFAULT_IDLE_THRESHOLD, DEFAULT_STOP_THRESHOLD, Thresholds},
    tracker::{ActivityTracker, normalize_order_id},
};
