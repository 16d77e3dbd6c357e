use crate::config::{
    default_device_indices, default_fps, default_height, default_mirror, default_width,
};

use serde::{Deserialize, Serialize};

/// Camera acquisition configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Device indices tried in order; the first that opens wins.
    #[serde(default = "default_device_indices")]
    pub device_indices: Vec<u32>,

    /// Frame width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Frame height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Target frames per second.
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Flip frames horizontally (selfie view).
    #[serde(default = "default_mirror")]
    pub mirror: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_indices: default_device_indices(),
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            mirror: default_mirror(),
        }
    }
}
