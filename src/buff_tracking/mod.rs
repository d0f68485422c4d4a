// Buff tracking module
// Recognizes buff stack counts from captured frames, debounces alerts and
// composes the overlay, driven by a periodic recognition loop.

pub mod alert;
pub mod assets;
pub mod compositor;
pub mod error;
pub mod recognition_loop;
pub mod recognizer;
pub mod types;


// Re-export the main types and functions for easy access
pub use alert::{AlertDebouncer, AlertDecision};
pub use assets::{AssetStore, CountTemplate, list_buffbar_sizes, list_resolutions, list_scaling_options};
pub use compositor::{OverlayCompositor, OverlayFrame};
pub use error::{AssetLoadError, CycleError, LoopError};
pub use recognition_loop::{OverlaySink, PublishedOverlay, RecognitionLoop};
pub use recognizer::{CONFIDENCE_THRESHOLD, StackRecognizer};
pub use types::{
    BuffCategory, CycleReport, LoopState, Recognition, RecognitionState, ScoredMatch,
    TemplateVariant,
};
