//! DigiTrack Core Library
//!
//! Hand-presence activity tracking: turns a noisy per-frame "hands
//! visible" signal into session time accounting with idle detection,
//! automatic finalization, and append-only session records.
//!
//! # Example
//!
//! ```
//! use digitrack_core::{ActivityTracker, CoreResult, StatusTransition, Thresholds};
//!
//! use chrono::{Local, TimeDelta};
//!
//! fn main() -> CoreResult<()> {
//!     let mut tracker = ActivityTracker::new(Thresholds::default());
//!     let t0 = Local::now();
//!
//!     tracker.open("PO-1001", t0)?;
//!     assert_eq!(tracker.evaluate(2, t0), StatusTransition::Active);
//!     tracker.evaluate(2, t0 + TimeDelta::seconds(5));
//!
//!     let record = tracker.stop(t0 + TimeDelta::seconds(6));
//!     assert_eq!(record.map(|r| r.formatted_duration()), Some("00:00:05".to_string()));
//!     Ok(())
//! }
//! ```

mod activity;
mod error;
mod frame;
mod recorder;
mod worker;

pub use {
    activity::{
        ActivityStatus, ActivityTracker, DEFAULT_IDLE_THRESHOLD, DEFAULT_STOP_THRESHOLD,
        InactivityWindow, SessionRecord, StatusTransition, TIMESTAMP_FORMAT, Thresholds,
        TrackerSnapshot, TrackerState, format_hms, format_timestamp, normalize_order_id,
    },
    error::{Result as CoreResult, TrackerError},
    frame::{
        CameraOpener, DEFAULT_JPEG_QUALITY, DetectionFilter, Frame, FrameSource, HandDetector,
        HandRegion, JpegFrame, ScriptStep, ScriptedDetector, SyntheticCamera,
        SyntheticCameraOpener, open_first_available,
    },
    recorder::{CSV_HEADER, CsvRecorder, SessionRecorder},
    worker::{
        DetectionWorker, FrameCadence, WorkerChannels, WorkerExit, WorkerOutcome, WorkerSettings,
    },
};

#[cfg(test)]
mod tests;
