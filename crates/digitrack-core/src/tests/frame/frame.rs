use crate::{Frame, HandRegion, tests::support::t0};

use image::{Rgb, RgbImage};

fn frame_with_marker() -> Frame {
    // Left column red, everything else black.
    let image = RgbImage::from_fn(8, 4, |x, _| if x == 0 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 0]) });
    Frame::new(image, t0())
}

/// WHAT: Mirroring flips the frame horizontally
/// WHY: The live feed reads like a mirror for the operator
#[test]
fn given_marked_left_column_when_mirroring_then_marker_moves_right() {
    // Given: Frame with a red left column
    let mut frame = frame_with_marker();

    // When: Mirroring
    frame.mirror();

    // Then: Red column is now on the right
    assert_eq!(*frame.image().get_pixel(7, 0), Rgb([255, 0, 0]));
    assert_eq!(*frame.image().get_pixel(0, 0), Rgb([0, 0, 0]));
}

/// WHAT: Regions are outlined without touching the interior
/// WHY: The overlay marks detections but keeps the picture visible
#[test]
fn given_region_when_drawing_then_outline_only() {
    // Given: A 20x20 black frame and a region covering the middle
    let mut frame = Frame::new(RgbImage::new(20, 20), t0());
    let region = HandRegion {
        x: 0.25,
        y: 0.25,
        width: 0.5,
        height: 0.5,
        confidence: 0.9,
    };

    // When: Drawing the region
    frame.draw_regions(&[region]);

    // Then: Edge pixel is green, centre pixel untouched
    let (x0, y0) = ((0.25f32 * 19.0) as u32, (0.25f32 * 19.0) as u32);
    assert_eq!(*frame.image().get_pixel(x0, y0), Rgb([0, 255, 0]));
    assert_eq!(*frame.image().get_pixel(10, 10), Rgb([0, 0, 0]));
}

/// WHAT: Regions extending past the frame are clamped
/// WHY: Detector output is untrusted and must not cause out-of-bounds writes
#[test]
fn given_region_outside_frame_when_drawing_then_no_panic() {
    // Given: Region hanging off the bottom-right corner
    let mut frame = Frame::new(RgbImage::new(10, 10), t0());
    let region = HandRegion {
        x: 0.8,
        y: 0.8,
        width: 2.0,
        height: 2.0,
        confidence: 0.9,
    };

    // When/Then: Drawing clamps to the last pixel
    frame.draw_regions(&[region]);
    assert_eq!(*frame.image().get_pixel(9, 9), Rgb([0, 255, 0]));
}

/// WHAT: JPEG encoding produces a valid JPEG stream
/// WHY: The MJPEG feed sends these bytes verbatim
#[test]
#[allow(clippy::unwrap_used)]
fn given_frame_when_encoding_then_jpeg_markers_present() {
    // Given: A small frame
    let frame = frame_with_marker();

    // When: Encoding
    let jpeg = frame.encode_jpeg(80).unwrap();

    // Then: Starts with SOI and ends with EOI
    assert!(jpeg.len() > 4);
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
}
