use reqwest::{Client, Url};
use tracing::debug;

use crate::error::IntegrationError;
use crate::server::{character_audio_endpoint, handle_response};
use crate::types::{CharacterAudioPayload, CharacterIntro};

/// API client for character introduction audio
pub struct CharacterAudioApi {
    client: Client,
    base: Url,
}

impl CharacterAudioApi {
    pub fn new(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    /// Fetch and decode the introduction clip stored under `audio_id`
    pub async fn fetch(&self, audio_id: &str) -> Result<CharacterIntro, IntegrationError> {
        let url = character_audio_endpoint(&self.base, audio_id)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let payload: CharacterAudioPayload = handle_response(response).await?;
        payload.decode()
    }
}
