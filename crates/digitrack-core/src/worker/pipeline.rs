use crate::{
    ActivityTracker, StatusTransition, TrackerSnapshot,
    frame::{
        CameraOpener, DEFAULT_JPEG_QUALITY, DetectionFilter, HandDetector, JpegFrame,
        open_first_available,
    },
    recorder::SessionRecorder,
    worker::FrameCadence,
};

use std::{sync::Arc, time::Instant};

use chrono::{DateTime, Local};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Per-session worker settings.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerSettings {
    /// Camera indices tried in order.
    pub device_indices: Vec<u32>,
    /// Flip frames horizontally before detection.
    pub mirror: bool,
    /// Target frame rate.
    pub fps: u32,
    /// Confidence floor and hand cap.
    pub filter: DetectionFilter,
    /// JPEG quality for the live feed.
    pub jpeg_quality: u8,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            device_indices: vec![1, 0],
            mirror: true,
            fps: 30,
            filter: DetectionFilter::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Outbound channels: the worker is the only sender.
#[derive(Debug, Clone)]
pub struct WorkerChannels {
    /// Latest tracker snapshot.
    pub snapshots: Arc<watch::Sender<TrackerSnapshot>>,
    /// Latest annotated frame; `None` while no worker is streaming.
    pub frames: Arc<watch::Sender<Option<JpegFrame>>>,
}

impl WorkerChannels {
    /// Fresh channels seeded with a stopped snapshot and no frame.
    pub fn new() -> Self {
        let (snapshots, _) = watch::channel(TrackerSnapshot::stopped());
        let (frames, _) = watch::channel(None);

        Self {
            snapshots: Arc::new(snapshots),
            frames: Arc::new(frames),
        }
    }

    /// Publish a snapshot, with or without live readers.
    pub fn publish(&self, snapshot: TrackerSnapshot) {
        self.snapshots.send_replace(snapshot);
    }
}

impl Default for WorkerChannels {
    fn default() -> Self {
        Self::new()
    }
}

/// Why the worker loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The cancellation token fired.
    Cancelled,
    /// The stop threshold finalized the session.
    SessionFinalized,
    /// No camera could be opened.
    CameraUnavailable,
    /// The camera stopped delivering frames.
    FrameReadFailed,
}

/// What the join point receives back from the worker.
#[derive(Debug)]
pub struct WorkerOutcome {
    /// The tracker, handed back to its owner.
    pub tracker: ActivityTracker,
    /// Exit reason.
    pub exit: WorkerExit,
}

/// Blocking detection loop for one session.
///
/// Owns the tracker for the lifetime of the loop. Acquisition and
/// inference run on the calling thread; run it under `spawn_blocking`.
pub struct DetectionWorker {
    settings: WorkerSettings,
    opener: Arc<dyn CameraOpener>,
    detector: Box<dyn HandDetector>,
    recorder: Arc<dyn SessionRecorder>,
}

impl DetectionWorker {
    /// Assemble a worker.
    pub fn new(
        settings: WorkerSettings,
        opener: Arc<dyn CameraOpener>,
        detector: Box<dyn HandDetector>,
        recorder: Arc<dyn SessionRecorder>,
    ) -> Self {
        Self {
            settings,
            opener,
            detector,
            recorder,
        }
    }

    /// Run until cancelled, finalized, or the camera fails.
    ///
    /// Cancellation is checked once per frame and leaves the session open
    /// for the caller to stop. Camera failures end and record the session
    /// here. The camera is released on every exit path before this returns.
    #[instrument(skip_all, fields(detector = self.detector.name()))]
    pub fn run(
        mut self,
        mut tracker: ActivityTracker,
        channels: &WorkerChannels,
        cancel: CancellationToken,
    ) -> WorkerOutcome {
        let (device_index, mut source) =
            match open_first_available(self.opener.as_ref(), &self.settings.device_indices) {
                Ok(opened) => opened,
                Err(e) => {
                    error!(error = %e, "Camera unavailable, ending session");
                    self.end_session(
                        &mut tracker,
                        Local::now(),
                        "Error: No camera detected.",
                        channels,
                    );
                    return WorkerOutcome {
                        tracker,
                        exit: WorkerExit::CameraUnavailable,
                    };
                }
            };

        let mut cadence = FrameCadence::new(self.settings.fps);
        info!(
            device_index,
            frame_budget_ms = cadence.frame_budget().as_millis(),
            "Detection loop started"
        );

        let mut last_captured_at: Option<DateTime<Local>> = None;

        let exit = loop {
            if cancel.is_cancelled() {
                break WorkerExit::Cancelled;
            }

            let frame_start = Instant::now();

            let mut frame = match source.read_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    error!(error = %e, "Frame read failed, ending session");
                    let now = last_captured_at.unwrap_or_else(Local::now);
                    self.end_session(&mut tracker, now, "Failed to grab frame", channels);
                    break WorkerExit::FrameReadFailed;
                }
            };
            last_captured_at = Some(frame.captured_at());

            if self.settings.mirror {
                frame.mirror();
            }

            let regions = match self.detector.detect(&frame) {
                Ok(regions) => self.settings.filter.apply(regions),
                Err(e) => {
                    warn!(error = %e, "Detection failed, counting frame as absent");
                    Vec::new()
                }
            };

            match tracker.evaluate(regions.len(), frame.captured_at()) {
                StatusTransition::Unchanged => {}
                StatusTransition::Active => info!(hand_count = regions.len(), "Status: active"),
                StatusTransition::Idle => info!("Status: idle"),
                StatusTransition::Stopped(record) => {
                    let mut snapshot = tracker.snapshot();
                    if let Err(e) = self.recorder.record(&record) {
                        error!(error = %e, order_id = %record.order_id, "Failed to persist session, data lost");
                        snapshot = snapshot.with_diagnostic(format!("Failed to save session: {e}"));
                    }
                    channels.publish(snapshot);
                    break WorkerExit::SessionFinalized;
                }
            }

            frame.draw_regions(&regions);
            match frame.encode_jpeg(self.settings.jpeg_quality) {
                Ok(jpeg) => {
                    channels.frames.send_replace(Some(jpeg));
                }
                Err(e) => debug!(error = %e, "Skipping feed frame"),
            }

            channels.publish(tracker.snapshot());

            cadence.pace(frame_start);
        };

        drop(source);
        channels.frames.send_replace(None);

        info!(
            ?exit,
            total_frames = cadence.total_frames(),
            deadline_misses = cadence.deadline_misses(),
            worst_case_ms = cadence.worst_case().as_millis(),
            "Detection loop stopped"
        );

        WorkerOutcome { tracker, exit }
    }

    /// Stop and record the session after a terminal camera failure, then
    /// publish a stopped snapshot carrying `diagnostic`.
    fn end_session(
        &self,
        tracker: &mut ActivityTracker,
        now: DateTime<Local>,
        diagnostic: &str,
        channels: &WorkerChannels,
    ) {
        let mut snapshot = TrackerSnapshot::stopped().with_diagnostic(diagnostic);

        if let Some(record) = tracker.stop(now) {
            if let Err(e) = self.recorder.record(&record) {
                error!(error = %e, order_id = %record.order_id, "Failed to persist session, data lost");
                snapshot =
                    snapshot.with_diagnostic(format!("{diagnostic}; failed to save session: {e}"));
            }
        }

        channels.publish(snapshot);
    }
}
