mod camera_config;
#[allow(clippy::module_inception)]
mod config;
mod console_config;
mod detector_config;
mod logging_config;
mod server_config;
mod storage_config;
mod tracking_config;

pub(crate) use {
    camera_config::CameraConfig, config::Config, console_config::ConsoleConfig,
    detector_config::DetectorConfig, logging_config::LoggingConfig, server_config::ServerConfig,
    storage_config::StorageConfig, tracking_config::TrackingConfig,
};

use std::path::PathBuf;

use digitrack_core::ScriptStep;
use directories::ProjectDirs;

pub(crate) const QUALIFIER: &str = "com";
pub(crate) const ORGANIZATION: &str = "digitrack";
pub(crate) const APPLICATION: &str = "DigiTrack";

pub(crate) const DEFAULT_IDLE_THRESHOLD_SECS: u64 = 10;
pub(crate) const DEFAULT_STOP_THRESHOLD_SECS: u64 = 30;
pub(crate) const DEFAULT_WIDTH: u32 = 640;
pub(crate) const DEFAULT_HEIGHT: u32 = 480;
pub(crate) const DEFAULT_FPS: u32 = 30;
pub(crate) const DEFAULT_MIRROR: bool = true;
pub(crate) const DEFAULT_MAX_HANDS: usize = 6;
pub(crate) const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;
pub(crate) const DEFAULT_CSV_FILE: &str = "detection_data.csv";
pub(crate) const DEFAULT_HOST: &str = "127.0.0.1";
pub(crate) const DEFAULT_PORT: u16 = 5000;

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

pub(crate) fn default_idle_threshold_secs() -> u64 {
    DEFAULT_IDLE_THRESHOLD_SECS
}

pub(crate) fn default_stop_threshold_secs() -> u64 {
    DEFAULT_STOP_THRESHOLD_SECS
}

/// Preferred external camera first, then the built-in one.
pub(crate) fn default_device_indices() -> Vec<u32> {
    vec![1, 0]
}

pub(crate) fn default_width() -> u32 {
    DEFAULT_WIDTH
}

pub(crate) fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

pub(crate) fn default_fps() -> u32 {
    DEFAULT_FPS
}

pub(crate) fn default_mirror() -> bool {
    DEFAULT_MIRROR
}

pub(crate) fn default_max_hands() -> usize {
    DEFAULT_MAX_HANDS
}

pub(crate) fn default_min_confidence() -> f32 {
    DEFAULT_MIN_CONFIDENCE
}

/// Two hands for a minute, then away long enough to finalize.
pub(crate) fn default_script() -> Vec<ScriptStep> {
    vec![
        ScriptStep { hands: 2, secs: 60 },
        ScriptStep { hands: 0, secs: 15 },
        ScriptStep { hands: 2, secs: 45 },
        ScriptStep { hands: 0, secs: 40 },
    ]
}

/// `detection_data.csv` in the per-user data directory, or the working
/// directory when no home directory can be resolved.
pub(crate) fn default_csv_path() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.data_dir().join(DEFAULT_CSV_FILE),
        None => PathBuf::from(DEFAULT_CSV_FILE),
    }
}

pub(crate) fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

pub(crate) fn default_port() -> u16 {
    DEFAULT_PORT
}
