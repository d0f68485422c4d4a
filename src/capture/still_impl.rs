//! Still-image capture backend
//!
//! Replays a saved screenshot as if it were the live display, which lets the
//! whole loop run against recorded game footage without a capture device.

use super::error::{CaptureError, CaptureResult};
use super::types::{CapturedFrame, ScreenCapturer, crop_region};
use crate::config::CaptureRegion;
use image::RgbaImage;
use std::path::{Path, PathBuf};

pub struct StillImageCapture {
    path: PathBuf,
    source: RgbaImage,
    capture_count: u64,
}

impl StillImageCapture {
    /// Decode the screenshot once; the desktop origin is its top-left corner.
    pub fn open(path: &Path) -> CaptureResult<Self> {
        let source = image::open(path)
            .map_err(|source| CaptureError::StillImageLoad {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        log::info!(
            "🖼️ Replaying still image {:?} ({}x{})",
            path,
            source.width(),
            source.height()
        );
        Ok(Self::from_image(path.to_path_buf(), source))
    }

    pub fn from_image(path: PathBuf, source: RgbaImage) -> Self {
        Self {
            path,
            source,
            capture_count: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capture_count(&self) -> u64 {
        self.capture_count
    }
}

impl ScreenCapturer for StillImageCapture {
    fn capture(&mut self, region: &CaptureRegion) -> CaptureResult<CapturedFrame> {
        let pixels = crop_region(&self.source, (0, 0), region)?;
        self.capture_count += 1;
        Ok(CapturedFrame::new(pixels))
    }

    fn name(&self) -> &str {
        "still"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_still_capture_crops_region() {
        let source = RgbaImage::from_fn(40, 20, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        let mut capture = StillImageCapture::from_image(PathBuf::from("mem.png"), source);

        let frame = capture.capture(&CaptureRegion::new(5, 3, 10, 8)).unwrap();
        assert_eq!((frame.width(), frame.height()), (10, 8));
        assert_eq!(frame.pixels().get_pixel(0, 0), &Rgba([5, 3, 0, 255]));
        assert_eq!(capture.capture_count(), 1);
        assert_eq!(capture.path(), Path::new("mem.png"));
    }

    #[test]
    fn test_still_capture_rejects_region_outside_image() {
        let mut capture =
            StillImageCapture::from_image(PathBuf::from("mem.png"), RgbaImage::new(10, 10));
        let result = capture.capture(&CaptureRegion::new(5, 5, 10, 10));
        assert!(matches!(result, Err(CaptureError::RegionOutOfBounds { .. })));
        assert_eq!(capture.capture_count(), 0);
    }

    #[test]
    fn test_still_capture_open_missing_file() {
        let result = StillImageCapture::open(Path::new("does/not/exist.png"));
        assert!(matches!(result, Err(CaptureError::StillImageLoad { .. })));
    }
}
