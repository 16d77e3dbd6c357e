use crate::{CoreResult, TrackerError, frame::Frame};

use std::panic::Location;

use chrono::{DateTime, Local, TimeDelta};
use error_location::ErrorLocation;
use image::{Rgb, RgbImage};
use tracing::{debug, info, instrument, warn};

/// A camera that yields decoded frames. Blocking.
///
/// Dropping the source releases the device.
pub trait FrameSource: Send {
    /// Backend identifier for logs.
    fn name(&self) -> &'static str;

    /// Block until the next frame is available.
    fn read_frame(&mut self) -> CoreResult<Frame>;
}

/// Opens camera devices by index.
pub trait CameraOpener: Send + Sync {
    /// Open one device.
    fn open(&self, device_index: u32) -> CoreResult<Box<dyn FrameSource>>;
}

/// Try `candidates` in order and return the first device that opens.
///
/// # Errors
///
/// Returns [`TrackerError::CameraUnavailable`] when none open.
#[track_caller]
#[instrument(skip(opener))]
pub fn open_first_available(
    opener: &dyn CameraOpener,
    candidates: &[u32],
) -> CoreResult<(u32, Box<dyn FrameSource>)> {
    for &index in candidates {
        match opener.open(index) {
            Ok(source) => {
                info!(device_index = index, source = source.name(), "Camera opened");
                return Ok((index, source));
            }
            Err(e) => debug!(device_index = index, error = %e, "Camera not available"),
        }
    }

    warn!(tried = ?candidates, "No camera could be opened");

    Err(TrackerError::CameraUnavailable {
        tried: candidates.to_vec(),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Test-pattern camera standing in for a real device.
pub struct SyntheticCamera {
    device_index: u32,
    width: u32,
    height: u32,
    frames_read: u64,
    frame_limit: Option<u64>,
    /// Next timestamp and per-frame step.
    simulated_clock: Option<(DateTime<Local>, TimeDelta)>,
}

impl SyntheticCamera {
    fn pattern(&self) -> RgbImage {
        let shift = (self.frames_read % 256) as u32;
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let r = ((x + shift) % 256) as u8;
            let g = ((y + shift) % 256) as u8;
            Rgb([r, g, 96])
        })
    }
}

impl FrameSource for SyntheticCamera {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn read_frame(&mut self) -> CoreResult<Frame> {
        if self.frame_limit.is_some_and(|limit| self.frames_read >= limit) {
            return Err(TrackerError::FrameReadFailed {
                reason: format!("device {} stopped delivering frames", self.device_index),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let captured_at = match self.simulated_clock.as_mut() {
            Some((next, step)) => {
                let captured_at = *next;
                // Saturates at the end of the representable range.
                *next = next.checked_add_signed(*step).unwrap_or(captured_at);
                captured_at
            }
            None => Local::now(),
        };

        let frame = Frame::new(self.pattern(), captured_at);
        self.frames_read += 1;

        Ok(frame)
    }
}

impl Drop for SyntheticCamera {
    fn drop(&mut self) {
        debug!(
            device_index = self.device_index,
            frames_read = self.frames_read,
            "Camera released"
        );
    }
}

/// Opens [`SyntheticCamera`]s.
#[derive(Debug, Clone)]
pub struct SyntheticCameraOpener {
    width: u32,
    height: u32,
    available: Option<Vec<u32>>,
    frame_limit: Option<u64>,
    simulated_clock: Option<(DateTime<Local>, TimeDelta)>,
}

impl SyntheticCameraOpener {
    /// Opener whose devices produce `width` x `height` frames on the wall clock.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            available: None,
            frame_limit: None,
            simulated_clock: None,
        }
    }

    /// Only these device indices open; all others fail.
    pub fn with_available(mut self, devices: Vec<u32>) -> Self {
        self.available = Some(devices);
        self
    }

    /// Each opened device fails after delivering `limit` frames.
    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    /// Stamp frames from `origin`, advancing `step` per frame instead of
    /// reading the wall clock.
    pub fn with_simulated_clock(mut self, origin: DateTime<Local>, step: TimeDelta) -> Self {
        self.simulated_clock = Some((origin, step));
        self
    }
}

impl CameraOpener for SyntheticCameraOpener {
    fn open(&self, device_index: u32) -> CoreResult<Box<dyn FrameSource>> {
        let present = self
            .available
            .as_ref()
            .is_none_or(|devices| devices.contains(&device_index));

        if !present || self.width == 0 || self.height == 0 {
            return Err(TrackerError::CameraUnavailable {
                tried: vec![device_index],
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Box::new(SyntheticCamera {
            device_index,
            width: self.width,
            height: self.height,
            frames_read: 0,
            frame_limit: self.frame_limit,
            simulated_clock: self.simulated_clock,
        }))
    }
}
