use crate::{
    CameraOpener, SyntheticCameraOpener, TrackerError, open_first_available, tests::support::t0,
};

use chrono::{Local, TimeDelta, TimeZone};

/// WHAT: Devices are tried in order and the first that opens wins
/// WHY: Cameras are probed on the preferred index first, then fallbacks
#[test]
#[allow(clippy::unwrap_used)]
fn given_only_fallback_device_available_when_opening_then_fallback_used() {
    // Given: Only device 0 exists
    let opener = SyntheticCameraOpener::new(32, 24).with_available(vec![0]);

    // When: Trying 1 then 0
    let (index, mut source) = open_first_available(&opener, &[1, 0]).unwrap();

    // Then: Device 0 opened and delivers frames of the configured size
    assert_eq!(index, 0);
    let frame = source.read_frame().unwrap();
    assert_eq!((frame.width(), frame.height()), (32, 24));
}

/// WHAT: No openable device yields CameraUnavailable listing all attempts
/// WHY: Acquisition failure is terminal and must say what was tried
#[test]
fn given_no_devices_when_opening_then_camera_unavailable() {
    // Given: No devices exist
    let opener = SyntheticCameraOpener::new(32, 24).with_available(Vec::new());

    // When: Trying 1 then 0
    let result = open_first_available(&opener, &[1, 0]);

    // Then: Error lists both
    match result {
        Err(TrackerError::CameraUnavailable { tried, .. }) => assert_eq!(tried, vec![1, 0]),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected CameraUnavailable"),
    }
}

/// WHAT: Frame limit turns into FrameReadFailed
/// WHY: Mid-session read failures must surface as errors, not hang
#[test]
#[allow(clippy::unwrap_used)]
fn given_frame_limit_when_reading_past_it_then_frame_read_failed() {
    // Given: Camera that delivers two frames
    let opener = SyntheticCameraOpener::new(8, 8).with_frame_limit(2);
    let mut source = opener.open(0).unwrap();

    // When: Reading three frames
    let first = source.read_frame();
    let second = source.read_frame();
    let third = source.read_frame();

    // Then: Third fails
    assert!(first.is_ok());
    assert!(second.is_ok());
    assert!(matches!(third, Err(TrackerError::FrameReadFailed { .. })));
}

/// WHAT: Simulated clock stamps frames at fixed steps
/// WHY: Pipeline tests drive the tracker on a deterministic clock
#[test]
#[allow(clippy::unwrap_used)]
fn given_simulated_clock_when_reading_then_timestamps_advance_by_step() {
    let opener = SyntheticCameraOpener::new(8, 8).with_simulated_clock(t0(), TimeDelta::seconds(2));
    let mut source = opener.open(3).unwrap();

    let stamps: Vec<_> = (0..3).map(|_| source.read_frame().unwrap().captured_at()).collect();

    assert_eq!(
        stamps,
        vec![t0(), t0() + TimeDelta::seconds(2), t0() + TimeDelta::seconds(4)]
    );
}

/// WHAT: Simulated clock saturates instead of overflowing
/// WHY: Long runs or large steps must never panic inside the camera
#[test]
#[allow(clippy::unwrap_used)]
fn given_clock_near_end_of_range_when_reading_then_timestamps_saturate() {
    // Given: Origin near the last representable year, century-sized step
    let origin = Local.with_ymd_and_hms(262_000, 1, 1, 0, 0, 0).single().unwrap();
    let opener = SyntheticCameraOpener::new(8, 8)
        .with_simulated_clock(origin, TimeDelta::days(365 * 200));
    let mut source = opener.open(0).unwrap();

    // When: Reading past the point where the next step overflows
    let stamps: Vec<_> = (0..3).map(|_| source.read_frame().unwrap().captured_at()).collect();

    // Then: Every frame delivered, clock held at the last valid instant
    assert_eq!(stamps, vec![origin, origin, origin]);
}
