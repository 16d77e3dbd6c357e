use crate::config::default_csv_path;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Session record storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Append-only CSV file receiving one row per finalized session.
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}
