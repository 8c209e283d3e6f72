use reqwest::{Client, Url};
use tracing::debug;

use crate::error::IntegrationError;
use crate::server::{check_status, endpoint};
use crate::types::ImageInfo;

/// Fetches scene images and checks that they decode
pub struct SceneImageApi {
    client: Client,
    base: Url,
}

impl SceneImageApi {
    pub fn new(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    /// Load the image at `image_url` (relative URLs resolve against the server)
    pub async fn load(&self, image_url: &str) -> Result<ImageInfo, IntegrationError> {
        let url = endpoint(&self.base, image_url)?;
        debug!("GET {}", url);

        let response = check_status(self.client.get(url).send().await?).await?;
        let bytes = response.bytes().await?;
        decode_image(image_url, &bytes)
    }
}

/// Decode image bytes, reporting the dimensions
pub fn decode_image(image_url: &str, bytes: &[u8]) -> Result<ImageInfo, IntegrationError> {
    if bytes.is_empty() {
        return Err(IntegrationError::InvalidImage("empty body".into()));
    }
    let image = image::load_from_memory(bytes)?;
    Ok(ImageInfo {
        url: image_url.to_string(),
        width: image.width(),
        height: image.height(),
    })
}
