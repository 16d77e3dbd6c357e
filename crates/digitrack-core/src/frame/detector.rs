use crate::{CoreResult, frame::Frame};

use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A detected hand, in coordinates normalized to `0..1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandRegion {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
    /// Detector confidence, `0..1`.
    pub confidence: f32,
}

impl HandRegion {
    /// Inclusive pixel bounds `(x0, y0, x1, y1)` clamped to the frame.
    pub(crate) fn pixel_bounds(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        if width == 0 || height == 0 {
            return (0, 0, 0, 0);
        }

        let max_x = (width - 1) as f32;
        let max_y = (height - 1) as f32;

        let x0 = (self.x.clamp(0.0, 1.0) * max_x) as u32;
        let y0 = (self.y.clamp(0.0, 1.0) * max_y) as u32;
        let x1 = ((self.x + self.width).clamp(0.0, 1.0) * max_x) as u32;
        let y1 = ((self.y + self.height).clamp(0.0, 1.0) * max_y) as u32;

        (x0, y0, x1, y1)
    }
}

/// Hand presence oracle: given a frame, return zero or more hand regions.
///
/// Implementations wrap a pretrained model. They must treat the frame as
/// read-only and must not retain it past the call.
pub trait HandDetector: Send {
    /// Backend identifier for logs.
    fn name(&self) -> &'static str;

    /// Detect hands in a frame.
    fn detect(&mut self, frame: &Frame) -> CoreResult<Vec<HandRegion>>;
}

/// Post-detection filtering: confidence floor and hand cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionFilter {
    /// Maximum hands counted per frame.
    pub max_hands: usize,
    /// Regions below this confidence are dropped.
    pub min_confidence: f32,
}

impl DetectionFilter {
    /// Keep confident regions, most confident first, capped at `max_hands`.
    pub fn apply(&self, mut regions: Vec<HandRegion>) -> Vec<HandRegion> {
        regions.retain(|r| r.confidence >= self.min_confidence);
        regions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        regions.truncate(self.max_hands);
        regions
    }
}

impl Default for DetectionFilter {
    fn default() -> Self {
        Self {
            max_hands: 6,
            min_confidence: 0.5,
        }
    }
}

/// One step of a scripted presence schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Hands reported during this step.
    pub hands: usize,
    /// How long the step lasts, in seconds.
    pub secs: u64,
}

/// Detector that replays a looping schedule of hand counts.
///
/// The schedule is keyed on frame capture time relative to the first
/// frame seen, so it follows whatever clock the frame source uses.
pub struct ScriptedDetector {
    steps: Vec<ScriptStep>,
    cycle: Duration,
    first_frame_at: Option<DateTime<Local>>,
}

impl ScriptedDetector {
    /// Create from a schedule. An empty schedule (or one with no
    /// duration) never reports hands.
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        let cycle = Duration::from_secs(steps.iter().map(|s| s.secs).sum());
        Self {
            steps,
            cycle,
            first_frame_at: None,
        }
    }

    fn hands_at(&self, offset: Duration) -> usize {
        if self.cycle.is_zero() {
            return 0;
        }

        let mut remaining = offset.as_secs_f64() % self.cycle.as_secs_f64();
        for step in &self.steps {
            let secs = step.secs as f64;
            if remaining < secs {
                return step.hands;
            }
            remaining -= secs;
        }

        0
    }
}

impl HandDetector for ScriptedDetector {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn detect(&mut self, frame: &Frame) -> CoreResult<Vec<HandRegion>> {
        let first = *self.first_frame_at.get_or_insert(frame.captured_at());
        let offset = (frame.captured_at() - first).to_std().unwrap_or(Duration::ZERO);
        let hands = self.hands_at(offset);

        // Lay hands out side by side so the overlay is readable.
        let slot = 1.0 / hands.max(1) as f32;
        Ok((0..hands)
            .map(|i| HandRegion {
                x: i as f32 * slot + slot * 0.1,
                y: 0.3,
                width: slot * 0.8,
                height: 0.4,
                confidence: 0.9,
            })
            .collect())
    }
}
