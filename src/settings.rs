//! Client settings with persistence
//!
//! Settings are saved to `~/.config/tale/settings.toml`

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tale_audio::{AudioConfig, AudioError, AudioSessionState, LocationMusicMap};
use tale_integration::ServerConfig;

/// All client settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tale"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load settings from a specific file, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };
        self.save_to(&dir.join("settings.toml"))
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            base_url: self.server.base_url.clone(),
            timeout: Duration::from_secs(self.server.timeout_secs.max(1)),
        }
    }

    pub fn audio_config(&self) -> AudioConfig {
        AudioConfig {
            volume: self.audio.volume,
            muted: self.audio.muted,
            fade_step: self.audio.fade_step,
            fade_tick: Duration::from_millis(self.audio.fade_tick_ms),
            assets_dir: self.audio.assets_dir.clone(),
        }
    }

    /// Location music from `[audio.locations]`, layered over the built-in
    /// table unless `builtin_tracks` is off. A table of our own must name a
    /// `default` track.
    pub fn music_map(&self) -> Result<LocationMusicMap, AudioError> {
        let locations = self.audio.locations.clone();
        if self.audio.builtin_tracks {
            Ok(LocationMusicMap::with_overrides(locations))
        } else {
            LocationMusicMap::new(locations)
        }
    }

    /// Copy the session's volume and mute state back into the settings.
    /// Returns true if anything changed and the file should be saved.
    pub fn remember_audio(&mut self, session: &AudioSessionState) -> bool {
        let changed = self.audio.volume != session.volume || self.audio.muted != session.muted;
        self.audio.volume = session.volume;
        self.audio.muted = session.muted;
        changed
    }
}

/// Game server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Base URL the `/command` and `/character_audio` endpoints live under
    pub base_url: String,
    /// Request timeout in seconds (image generation can be slow)
    pub timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        let server = ServerConfig::default();
        Self {
            base_url: server.base_url,
            timeout_secs: server.timeout.as_secs(),
        }
    }
}

/// Audio settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Music volume (0.0 to 1.0)
    pub volume: f64,
    pub muted: bool,
    /// Volume change per fade tick
    pub fade_step: f64,
    /// Milliseconds between fade ticks
    pub fade_tick_ms: u64,
    /// Directory music paths are resolved against
    pub assets_dir: PathBuf,
    /// Start from the built-in location table
    pub builtin_tracks: bool,
    /// Extra or replacement location tracks, keyed by location id
    pub locations: BTreeMap<String, PathBuf>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        let audio = AudioConfig::default();
        Self {
            volume: audio.volume,
            muted: audio.muted,
            fade_step: audio.fade_step,
            fade_tick_ms: audio.fade_tick.as_millis() as u64,
            assets_dir: audio.assets_dir,
            builtin_tracks: true,
            locations: BTreeMap::new(),
        }
    }
}

/// Front end settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Commands offered as one-key suggestions
    pub suggestions: Vec<String>,
    /// Location whose music starts with the session
    pub start_location: Option<String>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            suggestions: vec![
                "look around".into(),
                "check inventory".into(),
                "talk to the innkeeper".into(),
                "explore the forest".into(),
            ],
            start_location: None,
        }
    }
}
