use super::types::BuffCategory;
use crate::capture::CaptureError;
use crate::template_matching::MatchError;
use std::path::PathBuf;
use thiserror::Error;

/// Missing or corrupt assets. Fatal: the loop cannot start without its full set.
#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("Required asset not found: {path:?}")]
    Missing { path: PathBuf },

    #[error("Failed to decode asset {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to read asset directory {path:?}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No {category} template for count {count}")]
    MissingTemplate { category: BuffCategory, count: u8 },

    #[error("No {category} overlay icon for count {count}")]
    MissingIcon { category: BuffCategory, count: u8 },

    #[error("Count {count} is not a valid {category} stack count")]
    InvalidCount { category: BuffCategory, count: u8 },

    #[error(
        "Overlay icon {category}/{count} is {found:?}, expected {expected:?} like the other icons"
    )]
    IconSizeMismatch {
        category: BuffCategory,
        count: u8,
        expected: (u32, u32),
        found: (u32, u32),
    },

    #[error("Asset store has no overlay icons")]
    NoIcons,
}

/// Failure of a single recognition cycle. The cycle is skipped and the
/// previous state is kept.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Template matching failed: {0}")]
    Match(#[from] MatchError),
}

/// Failures that stop the loop from starting or running
#[derive(Debug, Error)]
pub enum LoopError {
    #[error("Failed to build recognition worker pool: {source}")]
    WorkerPool {
        #[from]
        source: rayon::ThreadPoolBuildError,
    },

    #[error("Recognition cycle task failed to complete: {source}")]
    JoinError {
        #[from]
        source: tokio::task::JoinError,
    },
}
