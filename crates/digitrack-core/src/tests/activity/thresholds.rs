use crate::{DEFAULT_IDLE_THRESHOLD, DEFAULT_STOP_THRESHOLD, Thresholds, TrackerError};

use std::time::Duration;

/// WHAT: Default thresholds are 10s idle and 30s stop
/// WHY: These are the canonical values the timeline contract is built on
#[test]
fn given_default_thresholds_then_ten_and_thirty_seconds() {
    let thresholds = Thresholds::default();

    assert_eq!(thresholds.idle(), Duration::from_secs(10));
    assert_eq!(thresholds.stop(), Duration::from_secs(30));
    assert_eq!(thresholds.idle(), DEFAULT_IDLE_THRESHOLD);
    assert_eq!(thresholds.stop(), DEFAULT_STOP_THRESHOLD);
}

/// WHAT: Idle must be positive and strictly below stop
/// WHY: Otherwise idle could never be reported before finalization
#[test]
fn given_misordered_thresholds_when_creating_then_invalid_thresholds_error() {
    // Given/When: Zero idle, equal, and inverted pairs
    let zero = Thresholds::new(Duration::ZERO, Duration::from_secs(30));
    let equal = Thresholds::new(Duration::from_secs(30), Duration::from_secs(30));
    let inverted = Thresholds::new(Duration::from_secs(40), Duration::from_secs(30));

    // Then: All rejected
    assert!(matches!(zero, Err(TrackerError::InvalidThresholds { .. })));
    assert!(matches!(equal, Err(TrackerError::InvalidThresholds { .. })));
    assert!(matches!(inverted, Err(TrackerError::InvalidThresholds { .. })));
}

/// WHAT: A valid pair round-trips its values
/// WHY: Configured thresholds must reach the tracker unchanged
#[test]
#[allow(clippy::unwrap_used)]
fn given_valid_thresholds_when_creating_then_values_preserved() {
    let thresholds =
        Thresholds::new(Duration::from_millis(1_500), Duration::from_secs(4)).unwrap();

    assert_eq!(thresholds.idle(), Duration::from_millis(1_500));
    assert_eq!(thresholds.stop(), Duration::from_secs(4));
}
