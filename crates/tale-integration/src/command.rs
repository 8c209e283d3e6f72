use reqwest::{Client, Url};
use tracing::debug;

use crate::error::IntegrationError;
use crate::server::{endpoint, handle_response};
use crate::types::{CommandForm, CommandResponse};

/// API client for submitting player commands
pub struct CommandApi {
    client: Client,
    base: Url,
}

impl CommandApi {
    pub fn new(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    /// Post one command as the `command` form field
    pub async fn send(&self, command: &str) -> Result<CommandResponse, IntegrationError> {
        let url = endpoint(&self.base, "command")?;
        debug!("POST {} command={:?}", url, command);

        let response = self.client
            .post(url)
            .form(&CommandForm { command })
            .send()
            .await?;

        handle_response(response).await
    }
}
