use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Tracking pipeline errors with source location tracking.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// None of the candidate camera devices could be opened.
    #[error("No camera detected (tried devices {tried:?}) {location}")]
    CameraUnavailable {
        /// Device indices that were attempted, in order.
        tried: Vec<u32>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An open camera failed to deliver a frame.
    #[error("Failed to grab frame: {reason} {location}")]
    FrameReadFailed {
        /// Description of the read failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The hand detector could not process a frame.
    #[error("Hand detection failed: {reason} {location}")]
    DetectorFailed {
        /// Description of the detector failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A session was started without an order identifier.
    #[error("Production order is required {location}")]
    MissingOrderId {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Idle/stop thresholds are not ordered `0 < idle < stop`.
    #[error("Invalid thresholds: idle {idle_secs}s must be positive and below stop {stop_secs}s {location}")]
    InvalidThresholds {
        /// Configured idle threshold in seconds.
        idle_secs: f64,
        /// Configured stop threshold in seconds.
        stop_secs: f64,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Appending a session record to durable storage failed.
    #[error("Session storage error at {path:?}: {source} {location}")]
    StorageIo {
        /// Storage target that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A frame could not be encoded for streaming.
    #[error("Frame encoding failed: {reason} {location}")]
    EncodeFailed {
        /// Description of the encoder failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`TrackerError`].
pub type Result<T> = std::result::Result<T, TrackerError>;
