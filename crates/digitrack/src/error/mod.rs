use digitrack_core::TrackerError;

use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Application-level errors for the digitrack binary.
///
/// All variants include `ErrorLocation` for call-site tracking.
#[derive(Error, Debug)]
pub enum AppError {
    /// Tracking pipeline error from digitrack-core.
    #[error("Tracker error: {source} {location}")]
    Core {
        /// The underlying tracker error.
        #[source]
        source: TrackerError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Configuration loading or saving error.
    #[error("Configuration error: {reason} {location}")]
    ConfigError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// IO error from filesystem or terminal operations.
    #[error("IO error: {source} {location}")]
    IoError {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// HTTP server failed to bind or serve.
    #[error("Server error: {reason} {location}")]
    ServerError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The detection worker panicked or was aborted.
    #[error("Detection worker failed: {reason} {location}")]
    WorkerJoinFailed {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

impl AppError {
    /// Whether this error was caused by bad caller input rather than
    /// a fault on our side.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Core {
                source: TrackerError::MissingOrderId { .. },
                ..
            }
        )
    }
}

// Manual From<TrackerError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<TrackerError> for AppError {
    #[track_caller]
    fn from(source: TrackerError) -> Self {
        AppError::Core {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for AppError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        AppError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `AppError`.
pub type Result<T> = StdResult<T, AppError>;
