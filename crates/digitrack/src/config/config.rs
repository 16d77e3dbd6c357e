//! Configuration management for digitrack.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        CameraConfig, ConsoleConfig, DetectorConfig, LoggingConfig, ServerConfig, StorageConfig,
        TrackingConfig, project_dirs,
    },
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    time::Duration,
};

use digitrack_core::{DEFAULT_JPEG_QUALITY, Thresholds, WorkerSettings};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Idle and stop thresholds.
    #[serde(default)]
    pub tracking: TrackingConfig,
    /// Camera acquisition.
    #[serde(default)]
    pub camera: CameraConfig,
    /// Hand detector.
    #[serde(default)]
    pub detector: DetectorConfig,
    /// Session record storage.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Embedded web server.
    #[serde(default)]
    pub server: ServerConfig,
    /// Terminal front end.
    #[serde(default)]
    pub console: ConsoleConfig,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the platform config directory, creating
    /// a default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, creating a default file there if
    /// none exists.
    ///
    /// Thresholds are validated here so a bad file fails at startup
    /// rather than on the first session.
    #[track_caller]
    #[instrument]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            info!(config_path = ?path, "No config found, creating default");
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        config.thresholds()?;

        info!(config_path = ?path, "Configuration loaded");

        Ok(config)
    }

    /// Save configuration to `path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
                debug!(config_dir = ?parent, "Created config directory");
            }
        }

        // Atomic write: write to temp file then rename
        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Validated threshold pair.
    #[track_caller]
    pub fn thresholds(&self) -> AppResult<Thresholds> {
        Thresholds::new(
            Duration::from_secs(self.tracking.idle_threshold_secs),
            Duration::from_secs(self.tracking.stop_threshold_secs),
        )
        .map_err(|e| AppError::ConfigError {
            reason: format!("Invalid [tracking] thresholds: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Settings handed to each detection worker.
    pub fn worker_settings(&self) -> WorkerSettings {
        WorkerSettings {
            device_indices: self.camera.device_indices.clone(),
            mirror: self.camera.mirror,
            fps: self.camera.fps,
            filter: self.detector.filter(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Get the web server URL for opening in a browser.
    pub fn server_url(&self) -> String {
        format!("http://{}", self.server.bind_addr())
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = project_dirs().ok_or_else(|| AppError::ConfigError {
            reason: "Failed to get config directory".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }
}
