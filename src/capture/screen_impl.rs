//! Live capture of the primary display through `xcap`

use super::error::{CaptureError, CaptureResult};
use super::types::{CapturedFrame, ScreenCapturer, crop_region};
use crate::config::CaptureRegion;
use xcap::Monitor;

/// Captures the primary monitor each call. Monitor handles are enumerated and
/// dropped per capture so nothing is held between cycles.
#[derive(Default)]
pub struct ScreenCapture {
    capture_count: u64,
}

impl ScreenCapture {
    pub fn new() -> Self {
        Self::default()
    }

    fn primary_monitor() -> CaptureResult<Monitor> {
        let monitors = Monitor::all().map_err(|e| CaptureError::Platform {
            description: e.to_string(),
        })?;
        monitors
            .into_iter()
            .find(|m| m.is_primary())
            .ok_or(CaptureError::NoPrimaryDisplay)
    }
}

impl ScreenCapturer for ScreenCapture {
    fn capture(&mut self, region: &CaptureRegion) -> CaptureResult<CapturedFrame> {
        let monitor = Self::primary_monitor()?;
        let screen = monitor
            .capture_image()
            .map_err(|e| CaptureError::Platform {
                description: e.to_string(),
            })?;
        let pixels = crop_region(&screen, (monitor.x(), monitor.y()), region)?;

        self.capture_count += 1;
        log::trace!(
            "📸 Capture #{} {}x{} from '{}'",
            self.capture_count,
            pixels.width(),
            pixels.height(),
            monitor.name()
        );
        Ok(CapturedFrame::new(pixels))
    }

    fn name(&self) -> &str {
        "screen"
    }
}
