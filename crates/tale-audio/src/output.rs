use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::AudioError;

/// The host audio output: a single background track plus one-shot clips.
///
/// The background track behaves like a media element: a source is loaded,
/// then played, paused, or re-leveled. Only [`AudioManager`] drives it.
///
/// [`AudioManager`]: crate::AudioManager
pub trait AudioOutput {
    /// Replace the background track source. Playback does not start until `play`.
    fn set_source(&mut self, path: &Path);

    /// Start or resume the background track. The host may refuse.
    fn play(&mut self) -> Result<(), AudioError>;

    fn pause(&mut self);

    /// Set the background track's output level (0.0–1.0).
    fn set_volume(&mut self, volume: f64);

    /// Play an in-memory encoded clip once, independent of the background track.
    fn play_clip(&mut self, bytes: Vec<u8>) -> Result<(), AudioError>;

    /// Per-frame housekeeping.
    fn update(&mut self) {}
}

impl<T: AudioOutput + ?Sized> AudioOutput for Box<T> {
    fn set_source(&mut self, path: &Path) {
        (**self).set_source(path)
    }

    fn play(&mut self) -> Result<(), AudioError> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn set_volume(&mut self, volume: f64) {
        (**self).set_volume(volume)
    }

    fn play_clip(&mut self, bytes: Vec<u8>) -> Result<(), AudioError> {
        (**self).play_clip(bytes)
    }

    fn update(&mut self) {
        (**self).update()
    }
}

/// Output used when no audio device is available. Accepts everything, plays nothing.
#[derive(Debug, Default)]
pub struct SilentOutput {
    source: Option<PathBuf>,
    volume: f64,
}

impl SilentOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioOutput for SilentOutput {
    fn set_source(&mut self, path: &Path) {
        self.source = Some(path.to_path_buf());
    }

    fn play(&mut self) -> Result<(), AudioError> {
        debug!("Silent output: play {:?} at {:.2}", self.source, self.volume);
        Ok(())
    }

    fn pause(&mut self) {}

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn play_clip(&mut self, bytes: Vec<u8>) -> Result<(), AudioError> {
        debug!("Silent output: dropping {} byte clip", bytes.len());
        Ok(())
    }
}
