//! Shared fixtures for binary tests.

use crate::controller::{DetectionController, DetectorFactory};

use std::{
    panic::Location,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use digitrack_core::{
    CoreResult, DetectionFilter, HandDetector, ScriptStep, ScriptedDetector, SessionRecord,
    SessionRecorder, SyntheticCameraOpener, Thresholds, TrackerError, WorkerSettings,
};
use error_location::ErrorLocation;

/// Recorder that keeps records in memory, optionally failing every write.
#[derive(Clone, Default)]
pub(crate) struct MemoryRecorder {
    records: Arc<Mutex<Vec<SessionRecord>>>,
    fail: bool,
}

impl MemoryRecorder {
    pub(crate) fn failing() -> Self {
        Self {
            records: Arc::default(),
            fail: true,
        }
    }

    #[allow(clippy::unwrap_used)]
    pub(crate) fn recorded(&self) -> Vec<SessionRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl SessionRecorder for MemoryRecorder {
    #[allow(clippy::unwrap_used)]
    fn record(&self, record: &SessionRecord) -> CoreResult<()> {
        if self.fail {
            return Err(TrackerError::StorageIo {
                path: PathBuf::from("memory"),
                source: std::io::Error::other("disk full"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn target(&self) -> String {
        "memory".to_string()
    }
}

/// Fast worker settings for tests.
pub(crate) fn settings() -> WorkerSettings {
    WorkerSettings {
        device_indices: vec![0],
        mirror: false,
        fps: 200,
        filter: DetectionFilter::default(),
        jpeg_quality: 50,
    }
}

/// Controller over a synthetic camera whose detector replays `hands`
/// forever.
pub(crate) fn controller_with(
    hands: usize,
    thresholds: Thresholds,
    recorder: &MemoryRecorder,
) -> Arc<DetectionController> {
    let detector_factory: DetectorFactory = Arc::new(move || {
        Box::new(ScriptedDetector::new(vec![ScriptStep { hands, secs: 3600 }]))
            as Box<dyn HandDetector>
    });

    Arc::new(DetectionController::new(
        thresholds,
        settings(),
        Arc::new(SyntheticCameraOpener::new(16, 12)),
        detector_factory,
        Arc::new(recorder.clone()),
    ))
}

/// Controller with default thresholds and two hands always visible.
pub(crate) fn controller(recorder: &MemoryRecorder) -> Arc<DetectionController> {
    controller_with(2, Thresholds::default(), recorder)
}

/// Thresholds short enough to finalize within a test.
#[allow(clippy::unwrap_used)]
pub(crate) fn short_thresholds() -> Thresholds {
    Thresholds::new(Duration::from_millis(20), Duration::from_millis(60)).unwrap()
}
