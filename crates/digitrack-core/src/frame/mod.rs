//! Frame acquisition, hand detection seams, and frame rendering.
//!
//! Real camera drivers and the pretrained hand model live outside this
//! crate; they plug in through [`CameraOpener`]/[`FrameSource`] and
//! [`HandDetector`]. The synthetic camera and scripted detector here let
//! the pipeline run end-to-end without either.

mod detector;
#[allow(clippy::module_inception)]
mod frame;
mod source;

pub use {
    detector::{DetectionFilter, HandDetector, HandRegion, ScriptStep, ScriptedDetector},
    frame::{DEFAULT_JPEG_QUALITY, Frame, JpegFrame},
    source::{CameraOpener, FrameSource, SyntheticCamera, SyntheticCameraOpener, open_first_available},
};
