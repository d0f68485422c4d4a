use crate::config::CaptureRegion;
use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Capture failures. All of them are transient from the loop's point of view:
/// the cycle is skipped and the next one is scheduled normally.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("No primary display found")]
    NoPrimaryDisplay,

    #[error("Platform capture failed: {description}")]
    Platform { description: String },

    #[error("Capture region {region:?} lies outside the {width}x{height} source surface")]
    RegionOutOfBounds {
        region: CaptureRegion,
        width: u32,
        height: u32,
    },

    #[error("Failed to load still image {path:?}: {source}")]
    StillImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Live screen capture is not available in this build (enable the `screen-capture` feature or use --replay)")]
    Unsupported,
}
