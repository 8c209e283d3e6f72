//! Tale Audio - Location music and cross-fades using kira
//!
//! Picks background music by the player's location, fades between tracks,
//! and exposes the mute and volume controls.

mod config;
mod error;
mod fade;
mod locations;
mod manager;
mod music;
mod output;

pub use config::{clamp_volume, AudioConfig};
pub use error::AudioError;
pub use fade::{Fade, FadeStep};
pub use locations::{LocationMusicMap, DEFAULT_LOCATION};
pub use manager::{AudioManager, AudioSessionState, PlaybackPhase, VolumeIndicator};
pub use music::KiraOutput;
pub use output::{AudioOutput, SilentOutput};
