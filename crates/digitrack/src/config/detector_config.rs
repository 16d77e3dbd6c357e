use crate::config::{default_max_hands, default_min_confidence, default_script};

use digitrack_core::{DetectionFilter, ScriptStep};
use serde::{Deserialize, Serialize};

/// Hand detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Maximum hands counted per frame.
    #[serde(default = "default_max_hands")]
    pub max_hands: usize,

    /// Regions below this confidence are discarded.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,

    /// Schedule replayed by the built-in scripted detector.
    #[serde(default = "default_script")]
    pub script: Vec<ScriptStep>,
}

impl DetectorConfig {
    /// Post-detection filter for the worker.
    pub fn filter(&self) -> DetectionFilter {
        DetectionFilter {
            max_hands: self.max_hands,
            min_confidence: self.min_confidence,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_hands: default_max_hands(),
            min_confidence: default_min_confidence(),
            script: default_script(),
        }
    }
}
