use crate::{
    DetectionFilter, Frame, HandDetector, HandRegion, ScriptStep, ScriptedDetector,
    tests::support::at,
};

use image::RgbImage;

fn region(confidence: f32) -> HandRegion {
    HandRegion {
        x: 0.1,
        y: 0.1,
        width: 0.2,
        height: 0.2,
        confidence,
    }
}

fn frame_at(secs: f64) -> Frame {
    Frame::new(RgbImage::new(4, 4), at(secs))
}

/// WHAT: Low-confidence regions are dropped and the rest capped
/// WHY: Presence is the count of confident detections up to max_hands
#[test]
fn given_mixed_confidence_regions_when_filtering_then_confident_capped_most_confident_first() {
    // Given: Filter with floor 0.5 and cap 2
    let filter = DetectionFilter {
        max_hands: 2,
        min_confidence: 0.5,
    };
    let regions = vec![region(0.6), region(0.3), region(0.9), region(0.5), region(0.7)];

    // When: Filtering
    let kept = filter.apply(regions);

    // Then: Two most confident above the floor
    let confidences: Vec<f32> = kept.iter().map(|r| r.confidence).collect();
    assert_eq!(confidences, vec![0.9, 0.7]);
}

/// WHAT: Confidence exactly at the floor is kept
/// WHY: The floor is a minimum, not a strict bound
#[test]
fn given_region_at_floor_when_filtering_then_kept() {
    let filter = DetectionFilter::default();
    assert_eq!(filter.apply(vec![region(0.5)]).len(), 1);
}

/// WHAT: The scripted detector replays its schedule by capture time and loops
/// WHY: The built-in pipeline must be deterministic against the frame clock
#[test]
#[allow(clippy::unwrap_used)]
fn given_schedule_when_detecting_then_counts_follow_capture_time_and_loop() {
    // Given: 2 hands for 5s, then none for 3s
    let mut detector = ScriptedDetector::new(vec![
        ScriptStep { hands: 2, secs: 5 },
        ScriptStep { hands: 0, secs: 3 },
    ]);

    // When: Detecting at offsets 0, 4.9, 5, 7.9, 8 (wraps), 13
    let counts: Vec<usize> = [0.0, 4.9, 5.0, 7.9, 8.0, 13.0]
        .iter()
        .map(|&t| detector.detect(&frame_at(t)).unwrap().len())
        .collect();

    // Then: Schedule is followed and repeats every 8s
    assert_eq!(counts, vec![2, 2, 0, 0, 2, 0]);
}

/// WHAT: An empty schedule never reports hands
/// WHY: Misconfiguration must degrade to absence, not panic
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_schedule_when_detecting_then_no_hands() {
    let mut detector = ScriptedDetector::new(Vec::new());

    assert!(detector.detect(&frame_at(0.0)).unwrap().is_empty());
    assert!(detector.detect(&frame_at(100.0)).unwrap().is_empty());
}

/// WHAT: Scripted regions lie inside the frame with high confidence
/// WHY: They must survive the default filter and draw cleanly
#[test]
#[allow(clippy::unwrap_used)]
fn given_three_hands_when_detecting_then_regions_within_unit_square() {
    let mut detector = ScriptedDetector::new(vec![ScriptStep { hands: 3, secs: 1 }]);

    let regions = detector.detect(&frame_at(0.0)).unwrap();

    assert_eq!(regions.len(), 3);
    assert_eq!(DetectionFilter::default().apply(regions.clone()).len(), 3);
    assert!(regions.iter().all(|r| r.x >= 0.0 && r.x + r.width <= 1.0));
}
