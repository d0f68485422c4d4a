// Capture module - screen region acquisition for the recognition loop
// Backends produce `CapturedFrame`s that every matcher in a cycle reads.

pub mod backend;
pub mod error;
#[cfg(feature = "screen-capture")]
pub mod screen_impl;
pub mod still_impl;
pub mod types;

// Re-export the main types and functions for easy access
pub use backend::CaptureBackend;
pub use error::{CaptureError, CaptureResult};
#[cfg(feature = "screen-capture")]
pub use screen_impl::ScreenCapture;
pub use still_impl::StillImageCapture;
pub use types::{CapturedFrame, ScreenCapturer};
