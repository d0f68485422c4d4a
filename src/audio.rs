// Alert playback sinks
use crate::buff_tracking::BuffCategory;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlertSinkError {
    #[error("Alert sound not found: {path:?}")]
    SoundMissing { path: PathBuf },
}

/// Receives one call per fired alert. Failures are logged by the caller and
/// never affect recognition or the overlay.
pub trait AlertSink: Send {
    fn play(&self, category: BuffCategory) -> Result<(), AlertSinkError>;
}

/// Writes alerts to the log instead of playing sound
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn play(&self, category: BuffCategory) -> Result<(), AlertSinkError> {
        match category.alert_sound_file() {
            Some(sound) => log::info!("🔊 {} at maximum ({})", category, sound),
            None => log::info!("🔔 {} at maximum", category),
        }
        Ok(())
    }
}

/// Resolve the alert sound for a category under the sound directory.
/// `Ok(None)` means the category has no sound.
pub fn alert_sound_path(
    sound_dir: &Path,
    category: BuffCategory,
) -> Result<Option<PathBuf>, AlertSinkError> {
    let Some(file_name) = category.alert_sound_file() else {
        return Ok(None);
    };
    let path = sound_dir.join(file_name);
    if !path.is_file() {
        return Err(AlertSinkError::SoundMissing { path });
    }
    Ok(Some(path))
}

#[cfg(feature = "audio")]
pub use rodio_sink::RodioAlertSink;

#[cfg(feature = "audio")]
mod rodio_sink {
    use super::{AlertSink, AlertSinkError, alert_sound_path};
    use crate::buff_tracking::BuffCategory;
    use std::path::PathBuf;

    /// Plays the category's wav file on a detached thread
    #[derive(Debug, Clone)]
    pub struct RodioAlertSink {
        sound_dir: PathBuf,
    }

    impl RodioAlertSink {
        pub fn new(sound_dir: impl Into<PathBuf>) -> Self {
            Self {
                sound_dir: sound_dir.into(),
            }
        }
    }

    impl AlertSink for RodioAlertSink {
        fn play(&self, category: BuffCategory) -> Result<(), AlertSinkError> {
            let Some(path) = alert_sound_path(&self.sound_dir, category)? else {
                return Ok(());
            };

            std::thread::spawn(move || {
                use rodio::{Decoder, OutputStream, Sink};
                use std::fs::File;
                use std::io::BufReader;

                let Ok((_stream, stream_handle)) = OutputStream::try_default() else {
                    log::warn!("🔇 No audio output device");
                    return;
                };
                let Ok(file) = File::open(&path) else { return };
                let Ok(source) = Decoder::new(BufReader::new(file)) else {
                    log::warn!("🔇 Could not decode {:?}", path);
                    return;
                };
                let Ok(sink) = Sink::try_new(&stream_handle) else {
                    return;
                };

                sink.append(source);
                sink.sleep_until_end();
            });

            Ok(())
        }
    }
}
