use crate::{CoreResult, TrackerError, frame::HandRegion};

use std::{panic::Location, sync::Arc};

use chrono::{DateTime, Local};
use error_location::ErrorLocation;
use image::{Rgb, RgbImage, codecs::jpeg::JpegEncoder, imageops};

/// JPEG quality used for the live feed.
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

const OVERLAY_COLOUR: Rgb<u8> = Rgb([0, 255, 0]);
const OVERLAY_THICKNESS: u32 = 2;

/// Encoded JPEG bytes, cheap to clone across feed readers.
pub type JpegFrame = Arc<[u8]>;

/// A decoded RGB frame and the wall-clock time it was captured.
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbImage,
    captured_at: DateTime<Local>,
}

impl Frame {
    /// Wrap a decoded image.
    pub fn new(image: RgbImage, captured_at: DateTime<Local>) -> Self {
        Self { image, captured_at }
    }

    /// Capture time, used as the tracker clock.
    pub fn captured_at(&self) -> DateTime<Local> {
        self.captured_at
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the pixels.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Flip horizontally so the feed reads like a mirror.
    pub fn mirror(&mut self) {
        imageops::flip_horizontal_in_place(&mut self.image);
    }

    /// Outline each region on the frame.
    pub fn draw_regions(&mut self, regions: &[HandRegion]) {
        for region in regions {
            let (x0, y0, x1, y1) = region.pixel_bounds(self.width(), self.height());
            self.draw_rect(x0, y0, x1, y1);
        }
    }

    fn draw_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32) {
        if x1 <= x0 || y1 <= y0 {
            return;
        }

        for t in 0..OVERLAY_THICKNESS {
            let top = (y0 + t).min(y1);
            let bottom = y1.saturating_sub(t).max(y0);
            for x in x0..=x1 {
                self.image.put_pixel(x, top, OVERLAY_COLOUR);
                self.image.put_pixel(x, bottom, OVERLAY_COLOUR);
            }

            let left = (x0 + t).min(x1);
            let right = x1.saturating_sub(t).max(x0);
            for y in y0..=y1 {
                self.image.put_pixel(left, y, OVERLAY_COLOUR);
                self.image.put_pixel(right, y, OVERLAY_COLOUR);
            }
        }
    }

    /// Encode as JPEG for the MJPEG feed.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::EncodeFailed`] if the encoder rejects the frame.
    #[track_caller]
    pub fn encode_jpeg(&self, quality: u8) -> CoreResult<JpegFrame> {
        let mut buf = Vec::with_capacity((self.width() * self.height()) as usize / 4);

        JpegEncoder::new_with_quality(&mut buf, quality)
            .encode_image(&self.image)
            .map_err(|e| TrackerError::EncodeFailed {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Arc::from(buf))
    }
}
