pub mod audio;
pub mod buff_tracking;
pub mod capture;
pub mod config;
pub mod template_matching;

#[cfg(test)]
mod test_support;

pub use buff_tracking::{BuffCategory, RecognitionLoop};
pub use capture::CaptureBackend;
pub use config::Configuration;
