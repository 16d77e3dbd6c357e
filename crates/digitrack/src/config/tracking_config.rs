use crate::config::{default_idle_threshold_secs, default_stop_threshold_secs};

use serde::{Deserialize, Serialize};

/// Activity threshold configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Seconds without hands before the session reports idle.
    #[serde(default = "default_idle_threshold_secs")]
    pub idle_threshold_secs: u64,

    /// Seconds without hands before the session is finalized.
    #[serde(default = "default_stop_threshold_secs")]
    pub stop_threshold_secs: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            idle_threshold_secs: default_idle_threshold_secs(),
            stop_threshold_secs: default_stop_threshold_secs(),
        }
    }
}
