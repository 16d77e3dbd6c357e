use std::time::{Duration, Instant};

/// Paces the worker to a fixed per-frame budget and tracks overruns.
#[derive(Debug)]
pub struct FrameCadence {
    frame_budget: Duration,
    deadline_misses: u64,
    worst_case: Duration,
    total_frames: u64,
}

impl FrameCadence {
    /// Budget of `1000 / fps` milliseconds. `fps` of zero is treated as one.
    pub fn new(fps: u32) -> Self {
        let frame_budget = Duration::from_millis(1000 / u64::from(fps.max(1)));

        Self {
            frame_budget,
            deadline_misses: 0,
            worst_case: Duration::ZERO,
            total_frames: 0,
        }
    }

    /// Account for a frame that took `elapsed` and return how long to
    /// sleep before the next one.
    pub fn finish_frame(&mut self, elapsed: Duration) -> Duration {
        if elapsed > self.frame_budget {
            self.deadline_misses += 1;
        }

        if elapsed > self.worst_case {
            self.worst_case = elapsed;
        }

        self.total_frames += 1;

        self.frame_budget.saturating_sub(elapsed)
    }

    /// Sleep out the remainder of the budget for a frame started at `start`.
    pub fn pace(&mut self, start: Instant) {
        let remaining = self.finish_frame(start.elapsed());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
    }

    /// Per-frame budget.
    pub fn frame_budget(&self) -> Duration {
        self.frame_budget
    }

    /// Frames that overran the budget.
    pub fn deadline_misses(&self) -> u64 {
        self.deadline_misses
    }

    /// Slowest frame seen.
    pub fn worst_case(&self) -> Duration {
        self.worst_case
    }

    /// Frames accounted so far.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}
