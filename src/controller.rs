//! Command input/output loop
//!
//! Turns a submitted command into a rendered game turn: optimistic echo,
//! one request to the server, then the narrative text and scene image.
//! At most one command is in flight; the submit control stays disabled until
//! the server answers.

use tracing::{debug, info, warn};

use tale_core::{GameTurn, ImageSource, LogEntry};
use tale_integration::{CharacterIntro, CommandResponse, GameBackend, ImageInfo, PendingRequest};

use crate::view::GameView;

/// Log line shown when a command fails
pub const COMMAND_ERROR_TEXT: &str = "Error processing your command. Please try again.";

/// Alert shown when the character introduction cannot be loaded
pub const INTRO_ERROR_TEXT: &str = "Could not load the character introduction audio.";

/// What happened to a submit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The command was echoed and sent
    Sent,
    /// Input was empty or whitespace; nothing happened
    Empty,
    /// Another command is still waiting for the server
    Busy,
}

/// Things the controller hands back to its owner
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// The server reported a new player location
    LocationChanged(String),
    /// A character introduction clip is ready to play
    PlayClip(Vec<u8>),
    /// A command round-trip finished successfully
    TurnCompleted(GameTurn),
}

struct InFlightCommand {
    command: String,
    request: PendingRequest<CommandResponse>,
}

pub struct CommandController<B: GameBackend> {
    backend: B,
    input: String,
    input_focused: bool,
    suggestions: Vec<String>,
    log: Vec<LogEntry>,
    image: ImageSource,
    loading: bool,
    in_flight: Option<InFlightCommand>,
    image_request: Option<PendingRequest<ImageInfo>>,
    intro_request: Option<PendingRequest<CharacterIntro>>,
}

impl<B: GameBackend> CommandController<B> {
    pub fn new(backend: B, suggestions: Vec<String>) -> Self {
        Self {
            backend,
            input: String::new(),
            input_focused: false,
            suggestions,
            log: Vec::new(),
            image: ImageSource::Empty,
            loading: false,
            in_flight: None,
            image_request: None,
            intro_request: None,
        }
    }

    /// Initial render: the command input starts focused.
    pub fn start(&mut self, view: &mut impl GameView) {
        view.set_submit_enabled(true);
        self.focus_input(view);
    }

    /// Replace the input text, as typing does.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Submit the current input as a command.
    pub fn submit(&mut self, view: &mut impl GameView) -> SubmitOutcome {
        if self.in_flight.is_some() {
            debug!("Ignoring submit while a command is in flight");
            return SubmitOutcome::Busy;
        }

        let command = self.input.trim().to_string();
        if command.is_empty() {
            return SubmitOutcome::Empty;
        }

        self.append(view, LogEntry::command(&command));
        self.set_loading(view, true);
        view.set_submit_enabled(false);

        info!("Sending command {:?}", command);
        let request = self.backend.send_command(command.clone());
        self.in_flight = Some(InFlightCommand { command, request });

        self.input.clear();
        view.set_input("");
        SubmitOutcome::Sent
    }

    /// Check outstanding requests and apply whatever has completed.
    /// Call once per frame.
    pub fn poll(&mut self, view: &mut impl GameView) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        self.poll_command(view, &mut events);
        self.poll_image(view);
        self.poll_intro(view, &mut events);
        events
    }

    /// The scene image finished loading.
    pub fn on_image_loaded(&mut self, info: &ImageInfo, view: &mut impl GameView) {
        debug!("Image loaded {} ({}x{})", info.url, info.width, info.height);
        if self.in_flight.is_none() {
            self.set_loading(view, false);
        }
        view.image_loaded(info);
    }

    /// The scene image failed to load: show the local placeholder instead.
    pub fn on_image_error(&mut self, view: &mut impl GameView) {
        if self.image.is_placeholder() {
            return;
        }
        self.image_request = None;
        self.image = ImageSource::Placeholder;
        view.show_image(&self.image);
    }

    /// Copy suggestion `index` into the input and focus it.
    pub fn choose_suggestion(&mut self, index: usize, view: &mut impl GameView) -> bool {
        let Some(suggestion) = self.suggestions.get(index) else {
            return false;
        };
        self.input = suggestion.clone();
        view.set_input(&self.input);
        self.focus_input(view);
        true
    }

    /// Keyboard shortcut handling. Returns true when the key was consumed.
    pub fn on_key(&mut self, key: char, view: &mut impl GameView) -> bool {
        if key == '/' && !self.input_focused {
            self.focus_input(view);
            return true;
        }
        false
    }

    /// The input lost focus: the player pressed Enter, or output was written
    /// after the prompt.
    pub fn blur_input(&mut self) {
        self.input_focused = false;
    }

    /// Give the input focus back if something took it away.
    pub fn restore_focus(&mut self, view: &mut impl GameView) {
        if !self.input_focused {
            self.focus_input(view);
        }
    }

    pub fn is_input_focused(&self) -> bool {
        self.input_focused
    }

    /// Fetch and play the character introduction stored under `audio_id`.
    /// Returns false if an introduction is already loading.
    pub fn request_intro(&mut self, audio_id: impl Into<String>, view: &mut impl GameView) -> bool {
        if self.intro_request.is_some() {
            return false;
        }
        view.set_intro_busy(true);
        self.intro_request = Some(self.backend.fetch_character_audio(audio_id.into()));
        true
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn image(&self) -> &ImageSource {
        &self.image
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a command is waiting for the server
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether a command or a character introduction is still outstanding
    pub fn has_pending_requests(&self) -> bool {
        self.in_flight.is_some() || self.intro_request.is_some()
    }

    fn poll_command(&mut self, view: &mut impl GameView, events: &mut Vec<ControllerEvent>) {
        let result = match &self.in_flight {
            Some(in_flight) => match in_flight.request.try_recv() {
                Some(result) => result,
                None => return,
            },
            None => return,
        };
        let Some(InFlightCommand { command, .. }) = self.in_flight.take() else {
            return;
        };
        self.blur_input();

        self.set_loading(view, false);
        view.set_submit_enabled(true);

        match result {
            Ok(response) => {
                self.append(view, LogEntry::response(response.description.clone()));
                self.show_image(view, &response.image_url);
                view.scroll_to_latest();

                if let Some(location) = response.location {
                    events.push(ControllerEvent::LocationChanged(location));
                }
                events.push(ControllerEvent::TurnCompleted(GameTurn {
                    command_text: command,
                    response_text: response.description,
                    image_url: response.image_url,
                }));
            }
            Err(e) => {
                warn!("Command {:?} failed: {}", command, e);
                self.append(view, LogEntry::error(COMMAND_ERROR_TEXT));
            }
        }
    }

    fn poll_image(&mut self, view: &mut impl GameView) {
        let Some(result) = self.image_request.as_ref().and_then(|r| r.try_recv()) else {
            return;
        };
        self.image_request = None;
        self.blur_input();

        match result {
            Ok(info) => self.on_image_loaded(&info, view),
            Err(e) => {
                debug!("Image failed to load: {}", e);
                self.on_image_error(view);
            }
        }
    }

    fn poll_intro(&mut self, view: &mut impl GameView, events: &mut Vec<ControllerEvent>) {
        let Some(result) = self.intro_request.as_ref().and_then(|r| r.try_recv()) else {
            return;
        };
        self.intro_request = None;
        self.blur_input();
        view.set_intro_busy(false);

        match result {
            Ok(intro) => {
                info!("Character introduction ready ({} bytes)", intro.audio.len());
                view.show_caption(&intro.caption);
                events.push(ControllerEvent::PlayClip(intro.audio));
            }
            Err(e) => {
                warn!("Character introduction failed: {}", e);
                view.alert(INTRO_ERROR_TEXT);
            }
        }
    }

    fn show_image(&mut self, view: &mut impl GameView, image_url: &str) {
        if image_url.trim().is_empty() {
            self.image = ImageSource::Empty;
            self.on_image_error(view);
            return;
        }
        self.image = ImageSource::Url(image_url.to_string());
        view.show_image(&self.image);
        self.image_request = Some(self.backend.load_image(image_url.to_string()));
    }

    fn append(&mut self, view: &mut impl GameView, entry: LogEntry) {
        view.append_entry(&entry);
        view.scroll_to_latest();
        self.log.push(entry);
    }

    fn set_loading(&mut self, view: &mut impl GameView, visible: bool) {
        self.loading = visible;
        view.set_loading(visible);
    }

    fn focus_input(&mut self, view: &mut impl GameView) {
        self.input_focused = true;
        view.focus_input();
    }
}
