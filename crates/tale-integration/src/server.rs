//! Server location and response helpers shared by the API clients

use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::error::IntegrationError;

/// Where the game server lives and how long to wait for it
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    /// Parse the base URL, making sure relative joins stay under its path
    pub fn base(&self) -> Result<Url, IntegrationError> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Ok(Url::parse(&raw)?)
    }
}

/// Resolve `path` against the server base. Absolute URLs pass through.
pub(crate) fn endpoint(base: &Url, path: &str) -> Result<Url, IntegrationError> {
    Ok(base.join(path)?)
}

/// URL of the introduction clip `audio_id`. The id is always a single,
/// percent-encoded path segment.
pub(crate) fn character_audio_endpoint(base: &Url, audio_id: &str) -> Result<Url, IntegrationError> {
    let mut url = endpoint(base, "character_audio/")?;
    url.path_segments_mut()
        .map_err(|_| IntegrationError::InvalidUrl(format!("{} cannot carry a path", base)))?
        .pop_if_empty()
        .push(audio_id);
    Ok(url)
}

/// Turn a non-success status into `ServerError`, otherwise parse the JSON body
pub(crate) async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, IntegrationError> {
    let response = check_status(response).await?;
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, IntegrationError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(IntegrationError::ServerError {
            status: status.as_u16(),
            message: text,
        });
    }
    Ok(response)
}
