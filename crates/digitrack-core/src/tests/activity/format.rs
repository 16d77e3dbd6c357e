use crate::{format_hms, format_timestamp, tests::support::t0};

/// WHAT: Durations render as zero-padded HH:MM:SS with truncation
/// WHY: The record format is fixed and rounding happens only at presentation
#[test]
fn given_fractional_seconds_when_formatting_then_truncated_hms() {
    // Given/When/Then: Representative durations
    assert_eq!(format_hms(0.0), "00:00:00");
    assert_eq!(format_hms(5.999), "00:00:05");
    assert_eq!(format_hms(61.0), "00:01:01");
    assert_eq!(format_hms(3_661.4), "01:01:01");
}

/// WHAT: Hours do not wrap at a day
/// WHY: Long sessions must not silently lose time
#[test]
fn given_more_than_a_day_when_formatting_then_hours_exceed_24() {
    assert_eq!(format_hms(25.0 * 3600.0 + 2.0), "25:00:02");
}

/// WHAT: Invalid durations render as zero
/// WHY: Presentation must never panic or print garbage
#[test]
fn given_negative_or_nan_when_formatting_then_zero() {
    assert_eq!(format_hms(-3.0), "00:00:00");
    assert_eq!(format_hms(f64::NAN), "00:00:00");
    assert_eq!(format_hms(f64::INFINITY), "00:00:00");
}

/// WHAT: Timestamps use the record layout
/// WHY: CSV consumers parse `YYYY-MM-DD HH:MM:SS`
#[test]
fn given_local_timestamp_when_formatting_then_record_layout() {
    assert_eq!(format_timestamp(&t0()), "2024-03-04 08:00:00");
}
