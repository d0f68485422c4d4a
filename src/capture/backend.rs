#[cfg(feature = "screen-capture")]
use super::screen_impl::ScreenCapture;
use super::error::CaptureResult;
use super::still_impl::StillImageCapture;
use super::types::{CapturedFrame, ScreenCapturer};
use crate::config::CaptureRegion;
use std::path::Path;

pub enum CaptureBackend {
    #[cfg(feature = "screen-capture")]
    Screen(ScreenCapture),
    Still(StillImageCapture),
}

impl CaptureBackend {
    /// Replay a still image when given one, otherwise capture the live display
    pub fn select(replay: Option<&Path>) -> CaptureResult<Self> {
        match replay {
            Some(path) => Ok(CaptureBackend::Still(StillImageCapture::open(path)?)),
            None => Self::live(),
        }
    }

    #[cfg(feature = "screen-capture")]
    fn live() -> CaptureResult<Self> {
        Ok(CaptureBackend::Screen(ScreenCapture::new()))
    }

    #[cfg(not(feature = "screen-capture"))]
    fn live() -> CaptureResult<Self> {
        Err(super::error::CaptureError::Unsupported)
    }
}

impl ScreenCapturer for CaptureBackend {
    fn capture(&mut self, region: &CaptureRegion) -> CaptureResult<CapturedFrame> {
        match self {
            #[cfg(feature = "screen-capture")]
            CaptureBackend::Screen(s) => s.capture(region),
            CaptureBackend::Still(s) => s.capture(region),
        }
    }

    fn name(&self) -> &str {
        match self {
            #[cfg(feature = "screen-capture")]
            CaptureBackend::Screen(s) => s.name(),
            CaptureBackend::Still(s) => s.name(),
        }
    }
}
