use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Log output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write a daily rolling log file here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}
