use crate::{
    ActivityStatus, ActivityTracker, DetectionFilter, DetectionWorker, ScriptStep,
    ScriptedDetector, SyntheticCameraOpener, Thresholds, WorkerChannels, WorkerExit,
    WorkerSettings,
    tests::support::{FlakyDetector, MemoryRecorder, t0},
};

use std::sync::Arc;

use chrono::TimeDelta;
use tokio_util::sync::CancellationToken;

fn settings() -> WorkerSettings {
    WorkerSettings {
        device_indices: vec![1, 0],
        mirror: true,
        fps: 1000,
        filter: DetectionFilter::default(),
        jpeg_quality: 60,
    }
}

fn worker(
    opener: SyntheticCameraOpener,
    steps: Vec<ScriptStep>,
    recorder: &MemoryRecorder,
) -> DetectionWorker {
    DetectionWorker::new(
        settings(),
        Arc::new(opener),
        Box::new(ScriptedDetector::new(steps)),
        Arc::new(recorder.clone()),
    )
}

/// One frame per simulated second.
fn simulated_opener() -> SyntheticCameraOpener {
    SyntheticCameraOpener::new(32, 24).with_simulated_clock(t0(), TimeDelta::seconds(1))
}

#[allow(clippy::unwrap_used)]
fn open_tracker() -> ActivityTracker {
    let mut tracker = ActivityTracker::new(Thresholds::default());
    tracker.open("PO-1001", t0()).unwrap();
    tracker
}

/// WHAT: Presence then sustained absence finalizes and records once
/// WHY: Auto-finalize must persist the session without a front-end stop
#[test]
fn given_hands_then_absence_when_running_then_session_finalized_and_recorded() {
    // Given: Hands for 5 simulated seconds, then none
    let recorder = MemoryRecorder::default();
    let worker = worker(
        simulated_opener(),
        vec![ScriptStep { hands: 2, secs: 5 }, ScriptStep { hands: 0, secs: 600 }],
        &recorder,
    );
    let channels = WorkerChannels::new();

    // When: Running to completion
    let outcome = worker.run(open_tracker(), &channels, CancellationToken::new());

    // Then: Finalized with one record covering first to last presence (0..4)
    assert_eq!(outcome.exit, WorkerExit::SessionFinalized);
    let records = recorder.recorded();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].order_id, "PO-1001");
    assert!((records[0].total_active_secs - 4.0).abs() < 1e-9);
    assert_eq!(records[0].started_at, t0());
    assert_eq!(records[0].stopped_at, t0() + TimeDelta::seconds(34));

    // Then: Tracker handed back closed, snapshot reports stopped, feed cleared
    assert!(!outcome.tracker.is_open());
    assert_eq!(channels.snapshots.borrow().status, ActivityStatus::Stopped);
    assert!(channels.frames.borrow().is_none());
}

/// WHAT: No camera ends the session, records it and reports stopped
/// WHY: Acquisition failure is terminal, so the open session must not be stranded
#[test]
fn given_no_camera_when_running_then_session_stopped_with_diagnostic() {
    // Given: No devices available
    let recorder = MemoryRecorder::default();
    let opener = SyntheticCameraOpener::new(32, 24).with_available(Vec::new());
    let worker = worker(opener, vec![ScriptStep { hands: 2, secs: 5 }], &recorder);
    let channels = WorkerChannels::new();

    // When: Running
    let outcome = worker.run(open_tracker(), &channels, CancellationToken::new());

    // Then: Camera error surfaced and the tracker handed back closed
    assert_eq!(outcome.exit, WorkerExit::CameraUnavailable);
    assert!(!outcome.tracker.is_open());

    // Then: Snapshot reports stopped with the camera diagnostic
    let snapshot = channels.snapshots.borrow().clone();
    assert_eq!(snapshot.status, ActivityStatus::Stopped);
    assert_eq!(snapshot.diagnostic.as_deref(), Some("Error: No camera detected."));

    // Then: The never-active session is recorded with zero time
    let records = recorder.recorded();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].order_id, "PO-1001");
    assert_eq!(records[0].total_active_secs, 0.0);
}

/// WHAT: Mid-session read failure ends and records the session
/// WHY: Time accumulated before the camera died must reach storage
#[test]
fn given_camera_fails_mid_session_when_running_then_session_recorded() {
    // Given: Camera dies after three frames of presence
    let recorder = MemoryRecorder::default();
    let opener = simulated_opener().with_frame_limit(3);
    let worker = worker(opener, vec![ScriptStep { hands: 2, secs: 60 }], &recorder);
    let channels = WorkerChannels::new();

    // When: Running
    let outcome = worker.run(open_tracker(), &channels, CancellationToken::new());

    // Then: Loop exited with the tracker closed
    assert_eq!(outcome.exit, WorkerExit::FrameReadFailed);
    assert!(!outcome.tracker.is_open());

    // Then: One record with the 2s of presence, stopped at the last good frame
    let records = recorder.recorded();
    assert_eq!(records.len(), 1);
    assert!((records[0].total_active_secs - 2.0).abs() < 1e-9);
    assert_eq!(records[0].stopped_at, t0() + TimeDelta::seconds(2));

    // Then: Snapshot reports stopped with the read diagnostic, feed cleared
    let snapshot = channels.snapshots.borrow().clone();
    assert_eq!(snapshot.status, ActivityStatus::Stopped);
    assert_eq!(snapshot.diagnostic.as_deref(), Some("Failed to grab frame"));
    assert!(channels.frames.borrow().is_none());
}

/// WHAT: Detector errors count as absence and the session still finalizes
/// WHY: A failing model must not kill the loop or freeze the session open
#[test]
fn given_detector_failing_when_running_then_frames_absent_and_session_finalized() {
    // Given: Hands on frames 0..=2, then the detector errors on every frame
    let recorder = MemoryRecorder::default();
    let worker = DetectionWorker::new(
        settings(),
        Arc::new(simulated_opener()),
        Box::new(FlakyDetector::new(3)),
        Arc::new(recorder.clone()),
    );
    let channels = WorkerChannels::new();

    // When: Running to completion
    let outcome = worker.run(open_tracker(), &channels, CancellationToken::new());

    // Then: Loop kept running until the stop threshold finalized the session
    assert_eq!(outcome.exit, WorkerExit::SessionFinalized);
    assert!(!outcome.tracker.is_open());
    let records = recorder.recorded();
    assert_eq!(records.len(), 1);
    assert!((records[0].total_active_secs - 2.0).abs() < 1e-9);
    assert_eq!(records[0].started_at, t0());
    assert_eq!(records[0].stopped_at, t0() + TimeDelta::seconds(32));
    assert_eq!(channels.snapshots.borrow().status, ActivityStatus::Stopped);
}

/// WHAT: A cancelled token stops the loop before the next frame
/// WHY: Stop requests must not wait for the stop threshold
#[test]
fn given_cancelled_token_when_running_then_exits_cancelled() {
    let recorder = MemoryRecorder::default();
    let worker = worker(simulated_opener(), vec![ScriptStep { hands: 2, secs: 60 }], &recorder);
    let channels = WorkerChannels::new();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = worker.run(open_tracker(), &channels, cancel);

    assert_eq!(outcome.exit, WorkerExit::Cancelled);
    assert!(outcome.tracker.is_open());
    assert!(recorder.recorded().is_empty());
}

/// WHAT: A failed write is reported on the final snapshot
/// WHY: Lost data must be visible, not silently dropped
#[test]
fn given_failing_recorder_when_finalized_then_diagnostic_published() {
    // Given: Recorder that always fails, no hands at all
    let recorder = MemoryRecorder::failing();
    let worker = worker(simulated_opener(), vec![ScriptStep { hands: 0, secs: 600 }], &recorder);
    let channels = WorkerChannels::new();

    // When: Running until the stop threshold
    let outcome = worker.run(open_tracker(), &channels, CancellationToken::new());

    // Then: Finalized, with a save failure diagnostic
    assert_eq!(outcome.exit, WorkerExit::SessionFinalized);
    let diagnostic = channels.snapshots.borrow().diagnostic.clone();
    assert!(diagnostic.is_some_and(|d| d.starts_with("Failed to save session")));
}

/// WHAT: Live snapshots carry hand count and people estimate
/// WHY: Front ends render presence from the published snapshot
#[tokio::test]
async fn given_running_worker_when_hands_visible_then_snapshot_published() {
    // Given: Three hands forever, wall-clock camera
    let recorder = MemoryRecorder::default();
    let worker = worker(
        SyntheticCameraOpener::new(32, 24),
        vec![ScriptStep { hands: 3, secs: 3600 }],
        &recorder,
    );
    let channels = WorkerChannels::new();
    let mut snapshots = channels.snapshots.subscribe();
    let mut frames = channels.frames.subscribe();
    let cancel = CancellationToken::new();

    let worker_channels = channels.clone();
    let worker_cancel = cancel.clone();
    let handle = tokio::task::spawn_blocking(move || {
        worker.run(open_tracker(), &worker_channels, worker_cancel)
    });

    // When: Waiting for a running snapshot and a frame
    let snapshot = snapshots
        .wait_for(|s| s.status == ActivityStatus::Running)
        .await
        .map(|s| s.clone());
    let frame_seen = frames.wait_for(Option::is_some).await.is_ok();
    cancel.cancel();
    let outcome = handle.await;

    // Then: Three hands, two people, and a clean cancelled exit
    let snapshot = match snapshot {
        Ok(snapshot) => snapshot,
        Err(e) => panic!("snapshot channel closed: {e}"),
    };
    assert_eq!(snapshot.hand_count, 3);
    assert_eq!(snapshot.people_estimate, 2);
    assert_eq!(snapshot.production_order.as_deref(), Some("PO-1001"));
    assert!(frame_seen);
    assert!(matches!(outcome.map(|o| o.exit), Ok(WorkerExit::Cancelled)));
}
