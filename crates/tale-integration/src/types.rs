use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::IntegrationError;

/// Form body for `POST /command`
#[derive(Debug, Clone, Serialize)]
pub struct CommandForm<'a> {
    pub command: &'a str,
}

/// Successful response from `POST /command`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub description: String,
    pub image_url: String,
    /// Location the player is in after the command, when the server reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Raw response from `GET /character_audio/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterAudioPayload {
    /// Base64-encoded audio file
    pub audio_data: String,
    pub audio_text: String,
    #[serde(default)]
    pub voice_type: Option<String>,
}

impl CharacterAudioPayload {
    /// Decode the base64 audio into a playable clip
    pub fn decode(self) -> Result<CharacterIntro, IntegrationError> {
        let audio = STANDARD.decode(self.audio_data.trim())?;
        if audio.is_empty() {
            return Err(IntegrationError::Decode("empty audio payload".into()));
        }
        Ok(CharacterIntro {
            audio,
            caption: self.audio_text,
            voice_type: self.voice_type,
        })
    }
}

/// A decoded character introduction, ready to play
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterIntro {
    /// Encoded audio file bytes (e.g. mp3)
    pub audio: Vec<u8>,
    pub caption: String,
    pub voice_type: Option<String>,
}

/// A scene image that was fetched and decoded successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub url: String,
    pub width: u32,
    pub height: u32,
}
