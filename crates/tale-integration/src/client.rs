use std::sync::mpsc;
use std::sync::Arc;

use reqwest::Client;
use tracing::{info, warn};

use crate::character_audio::CharacterAudioApi;
use crate::command::CommandApi;
use crate::error::IntegrationError;
use crate::scene_image::SceneImageApi;
use crate::server::ServerConfig;
use crate::types::*;

/// Sending half paired with a [`PendingRequest`].
pub type ResultSender<T> = mpsc::Sender<Result<T, IntegrationError>>;

/// A non-blocking handle to an in-flight async request.
/// Call `try_recv()` each frame to check for results without blocking the frame loop.
pub struct PendingRequest<T> {
    receiver: mpsc::Receiver<Result<T, IntegrationError>>,
}

impl<T> PendingRequest<T> {
    /// Create a request handle together with the sender that completes it.
    pub fn channel() -> (ResultSender<T>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { receiver: rx })
    }

    /// A handle that is already complete.
    pub fn ready(result: Result<T, IntegrationError>) -> Self {
        let (tx, pending) = Self::channel();
        let _ = tx.send(result);
        pending
    }

    /// Non-blocking check for the result. Returns `None` if still pending.
    ///
    /// A request whose worker went away without answering resolves to a
    /// network error instead of staying pending forever.
    pub fn try_recv(&self) -> Option<Result<T, IntegrationError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                Some(Err(IntegrationError::Network("Channel closed".into())))
            }
        }
    }
}

/// Everything the command controller needs from the game server.
pub trait GameBackend {
    /// Submit one player command.
    fn send_command(&self, command: String) -> PendingRequest<CommandResponse>;

    /// Fetch and decode a character introduction clip.
    fn fetch_character_audio(&self, audio_id: String) -> PendingRequest<CharacterIntro>;

    /// Load a scene image; the result plays the role of the image's load/error event.
    fn load_image(&self, image_url: String) -> PendingRequest<ImageInfo>;
}

/// Facade for all game server interactions.
/// Owns a background tokio runtime and dispatches async work via channels.
pub struct IntegrationClient {
    runtime: tokio::runtime::Runtime,
    command_api: Arc<CommandApi>,
    character_audio_api: Arc<CharacterAudioApi>,
    image_api: Arc<SceneImageApi>,
}

impl IntegrationClient {
    /// Create a new integration client with a background tokio runtime.
    pub fn new(config: ServerConfig) -> Result<Self, IntegrationError> {
        let base = config.base()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|e| IntegrationError::Network(format!("Failed to create runtime: {}", e)))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IntegrationError::Network(format!("Failed to create HTTP client: {}", e)))?;

        info!("Game server at {}", base);

        Ok(Self {
            runtime,
            command_api: Arc::new(CommandApi::new(client.clone(), base.clone())),
            character_audio_api: Arc::new(CharacterAudioApi::new(client.clone(), base.clone())),
            image_api: Arc::new(SceneImageApi::new(client, base)),
        })
    }
}

impl GameBackend for IntegrationClient {
    fn send_command(&self, command: String) -> PendingRequest<CommandResponse> {
        let (tx, pending) = PendingRequest::channel();
        let api = Arc::clone(&self.command_api);

        self.runtime.spawn(async move {
            let result = api.send(&command).await;
            if let Err(e) = &result {
                warn!("Command failed: {}", e);
            }
            let _ = tx.send(result);
        });

        pending
    }

    fn fetch_character_audio(&self, audio_id: String) -> PendingRequest<CharacterIntro> {
        let (tx, pending) = PendingRequest::channel();
        let api = Arc::clone(&self.character_audio_api);

        self.runtime.spawn(async move {
            let result = api.fetch(&audio_id).await;
            let _ = tx.send(result);
        });

        pending
    }

    fn load_image(&self, image_url: String) -> PendingRequest<ImageInfo> {
        let (tx, pending) = PendingRequest::channel();
        let api = Arc::clone(&self.image_api);

        self.runtime.spawn(async move {
            let result = api.load(&image_url).await;
            let _ = tx.send(result);
        });

        pending
    }
}
