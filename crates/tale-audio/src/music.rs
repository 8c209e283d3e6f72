use std::io::Cursor;
use std::path::{Path, PathBuf};

use kira::manager::backend::DefaultBackend;
use kira::manager::{AudioManager as KiraManager, AudioManagerSettings};
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings};
use kira::sound::PlaybackState;
use kira::tween::Tween;
use tracing::{debug, info};

use crate::error::AudioError;
use crate::output::AudioOutput;

/// kira-backed output: one looping background track plus fire-and-forget clips.
pub struct KiraOutput {
    manager: KiraManager<DefaultBackend>,
    source: Option<PathBuf>,
    track: Option<StaticSoundHandle>,
    clips: Vec<StaticSoundHandle>,
    volume: f64,
}

impl KiraOutput {
    /// Open the default audio device.
    pub fn new() -> Result<Self, AudioError> {
        let manager = KiraManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| AudioError::InitFailed(e.to_string()))?;

        info!("Audio output initialized");

        Ok(Self {
            manager,
            source: None,
            track: None,
            clips: Vec::new(),
            volume: 0.0,
        })
    }

    fn start_track(&mut self, path: &Path) -> Result<StaticSoundHandle, AudioError> {
        let data = StaticSoundData::from_file(path)
            .map_err(|e| AudioError::LoadFailed(path.to_path_buf(), e.to_string()))?;
        let settings = StaticSoundSettings::new()
            .volume(self.volume)
            .loop_region(..);
        let data = data.with_settings(settings);

        self.manager
            .play(data)
            .map_err(|e| AudioError::PlaybackRejected(e.to_string()))
    }
}

impl AudioOutput for KiraOutput {
    fn set_source(&mut self, path: &Path) {
        if let Some(mut handle) = self.track.take() {
            handle.stop(Tween::default());
        }
        self.source = Some(path.to_path_buf());
    }

    fn play(&mut self) -> Result<(), AudioError> {
        if let Some(ref mut handle) = self.track {
            if handle.state() != PlaybackState::Stopped {
                handle.resume(Tween::default());
                return Ok(());
            }
        }

        let path = self
            .source
            .clone()
            .ok_or_else(|| AudioError::PlaybackRejected("no source loaded".into()))?;
        let handle = self.start_track(&path)?;
        debug!("Playing {:?}", path);
        self.track = Some(handle);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(ref mut handle) = self.track {
            handle.pause(Tween::default());
        }
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
        if let Some(ref mut handle) = self.track {
            handle.set_volume(volume, Tween::default());
        }
    }

    fn play_clip(&mut self, bytes: Vec<u8>) -> Result<(), AudioError> {
        let data = StaticSoundData::from_cursor(Cursor::new(bytes))
            .map_err(|e| AudioError::DecodeFailed(e.to_string()))?;
        let handle = self
            .manager
            .play(data)
            .map_err(|e| AudioError::PlaybackRejected(e.to_string()))?;
        self.clips.push(handle);
        Ok(())
    }

    /// Remove handles for clips that have finished playing.
    fn update(&mut self) {
        self.clips.retain(|h| h.state() != PlaybackState::Stopped);
    }
}
