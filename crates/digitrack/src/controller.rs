use crate::{AppError, AppResult};

use std::{panic::Location, sync::Arc};

use chrono::{DateTime, Local};
use digitrack_core::{
    ActivityTracker, CameraOpener, DetectionWorker, HandDetector, JpegFrame, SessionRecord,
    SessionRecorder, Thresholds, TrackerSnapshot, WorkerChannels, WorkerOutcome,
    WorkerSettings, format_hms, format_timestamp, normalize_order_id,
};
use error_location::ErrorLocation;
use tokio::{
    sync::{Mutex, watch},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Builds a fresh detector for each session.
pub(crate) type DetectorFactory = Arc<dyn Fn() -> Box<dyn HandDetector> + Send + Sync>;

struct RunningWorker {
    session_id: Uuid,
    cancel: CancellationToken,
    handle: JoinHandle<WorkerOutcome>,
}

/// The tracker is either parked here or owned by the running worker.
#[derive(Default)]
struct ControllerState {
    parked: Option<ActivityTracker>,
    running: Option<RunningWorker>,
}

/// Result of a successful start.
#[derive(Debug, Clone)]
pub struct StartReport {
    /// Correlation id of the new session.
    pub session_id: Uuid,
    /// Trimmed order identifier.
    pub production_order: String,
}

/// Result of an explicit stop.
#[derive(Debug, Clone)]
pub struct StopReport {
    /// The record written, if there was anything to record.
    pub record: Option<SessionRecord>,
    /// Storage target the record went to.
    pub csv_file: String,
    /// When the stop was processed.
    pub stopped_at: DateTime<Local>,
}

impl StopReport {
    /// Whether a record was written.
    pub fn saved(&self) -> bool {
        self.record.is_some()
    }

    /// Recorded active time as `HH:MM:SS`.
    pub fn total_time(&self) -> String {
        format_hms(self.record.as_ref().map_or(0.0, |r| r.total_active_secs))
    }

    /// Record start, or the stop time when nothing was recorded.
    pub fn start_time(&self) -> String {
        match &self.record {
            Some(record) => record.formatted_start(),
            None => format_timestamp(&self.stopped_at),
        }
    }

    /// Record stop, or the stop time when nothing was recorded.
    pub fn stop_time(&self) -> String {
        match &self.record {
            Some(record) => record.formatted_stop(),
            None => format_timestamp(&self.stopped_at),
        }
    }
}

/// Start/stop orchestration shared by every front end.
///
/// Serialises commands behind one async mutex; the tracker itself is only
/// ever touched by whoever holds it (the worker while running, this
/// controller otherwise). Readers use [`snapshot`](Self::snapshot).
pub struct DetectionController {
    state: Mutex<ControllerState>,
    channels: WorkerChannels,
    thresholds: Thresholds,
    settings: WorkerSettings,
    opener: Arc<dyn CameraOpener>,
    detector_factory: DetectorFactory,
    recorder: Arc<dyn SessionRecorder>,
}

impl DetectionController {
    /// Create a controller with no session.
    pub fn new(
        thresholds: Thresholds,
        settings: WorkerSettings,
        opener: Arc<dyn CameraOpener>,
        detector_factory: DetectorFactory,
        recorder: Arc<dyn SessionRecorder>,
    ) -> Self {
        Self {
            state: Mutex::new(ControllerState {
                parked: Some(ActivityTracker::new(thresholds)),
                running: None,
            }),
            channels: WorkerChannels::new(),
            thresholds,
            settings,
            opener,
            detector_factory,
            recorder,
        }
    }

    /// Start tracking `production_order`.
    ///
    /// A session still open is stopped and recorded first. A blank order
    /// is rejected before anything else changes.
    #[instrument(skip(self))]
    pub async fn start(&self, production_order: &str) -> AppResult<StartReport> {
        let production_order = normalize_order_id(production_order)?;

        let mut state = self.state.lock().await;

        let mut tracker = match self.reclaim(&mut state).await {
            Ok(tracker) => tracker,
            Err(e) => {
                error!(error = %e, "Previous session lost, starting fresh");
                ActivityTracker::new(self.thresholds)
            }
        };

        if tracker.is_open() {
            info!("Stopping previous session before starting a new one");
            if let Some(record) = tracker.stop(Local::now()) {
                if let Err(e) = self.recorder.record(&record) {
                    error!(error = %e, order_id = %record.order_id, "Failed to persist previous session");
                    state.parked = Some(tracker);
                    self.channels.publish(
                        TrackerSnapshot::stopped()
                            .with_diagnostic(format!("Failed to save session: {e}")),
                    );
                    return Err(e.into());
                }
            }
        }

        let session_id = match tracker.open(production_order, Local::now()) {
            Ok(id) => id,
            Err(e) => {
                state.parked = Some(tracker);
                return Err(e.into());
            }
        };

        self.channels.publish(tracker.snapshot());

        let cancel = CancellationToken::new();
        let worker = DetectionWorker::new(
            self.settings.clone(),
            Arc::clone(&self.opener),
            (self.detector_factory)(),
            Arc::clone(&self.recorder),
        );
        let channels = self.channels.clone();
        let worker_cancel = cancel.clone();
        let handle =
            tokio::task::spawn_blocking(move || worker.run(tracker, &channels, worker_cancel));

        state.running = Some(RunningWorker {
            session_id,
            cancel,
            handle,
        });

        info!(session_id = %session_id, production_order, "Detection started");

        Ok(StartReport {
            session_id,
            production_order: production_order.to_string(),
        })
    }

    /// Stop the session and persist its record.
    ///
    /// Idempotent: once a session's record has been written, further
    /// stops report nothing saved.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> AppResult<StopReport> {
        let mut state = self.state.lock().await;
        let mut tracker = self.reclaim(&mut state).await?;

        let stopped_at = Local::now();
        let record = tracker.stop(stopped_at);
        state.parked = Some(tracker);
        self.channels.publish(TrackerSnapshot::stopped());

        if let Some(record) = &record {
            self.recorder.record(record)?;
            info!(
                session_id = %record.session_id,
                order_id = %record.order_id,
                total_time = %record.formatted_duration(),
                "Detection stopped and data saved"
            );
        }

        Ok(StopReport {
            record,
            csv_file: self.recorder.target(),
            stopped_at,
        })
    }

    /// Latest published tracker view.
    pub fn snapshot(&self) -> TrackerSnapshot {
        self.channels.snapshots.borrow().clone()
    }

    /// Subscribe to snapshot updates.
    pub fn snapshots(&self) -> watch::Receiver<TrackerSnapshot> {
        self.channels.snapshots.subscribe()
    }

    /// Subscribe to the annotated frame feed.
    pub fn frames(&self) -> watch::Receiver<Option<JpegFrame>> {
        self.channels.frames.subscribe()
    }

    /// Whether a worker is currently producing frames.
    pub async fn is_running(&self) -> bool {
        let state = self.state.lock().await;
        state
            .running
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }

    /// Stop any open session before the process exits.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        match self.stop().await {
            Ok(report) if report.saved() => {
                info!(total_time = %report.total_time(), "Open session recorded on shutdown");
            }
            Ok(_) => {}
            Err(e) => error!(error = %e, "Failed to stop session on shutdown"),
        }
    }

    /// Take the tracker back, cancelling and joining a running worker.
    async fn reclaim(&self, state: &mut ControllerState) -> AppResult<ActivityTracker> {
        let Some(running) = state.running.take() else {
            return Ok(state
                .parked
                .take()
                .unwrap_or_else(|| ActivityTracker::new(self.thresholds)));
        };

        running.cancel.cancel();

        match running.handle.await {
            Ok(outcome) => {
                info!(session_id = %running.session_id, exit = ?outcome.exit, "Detection worker joined");
                Ok(outcome.tracker)
            }
            Err(e) => {
                warn!(session_id = %running.session_id, error = %e, "Detection worker did not finish cleanly");
                Err(AppError::WorkerJoinFailed {
                    reason: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
        }
    }
}
