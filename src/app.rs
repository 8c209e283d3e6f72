//! Top-level client: owns the command controller and the audio manager
//!
//! The two components never talk to each other; the app routes controller
//! events (location changes, intro clips) to the audio manager.

use std::time::Duration;

use tracing::{debug, warn};

use tale_audio::{AudioManager, AudioOutput};
use tale_core::FrameClock;
use tale_integration::GameBackend;

use crate::controller::{CommandController, ControllerEvent, SubmitOutcome};
use crate::terminal::UserInput;
use crate::view::ClientView;

/// Whether the frame loop should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<B: GameBackend, O: AudioOutput> {
    controller: CommandController<B>,
    audio: AudioManager<O>,
    clock: FrameClock,
}

impl<B: GameBackend, O: AudioOutput> App<B, O> {
    pub fn new(controller: CommandController<B>, audio: AudioManager<O>) -> Self {
        Self {
            controller,
            audio,
            clock: FrameClock::default(),
        }
    }

    /// Initial render, and music for the saved location if there is one.
    pub fn start(&mut self, view: &mut impl ClientView, location: Option<&str>) {
        let session = self.audio.session();
        view.show_volume(self.audio.indicator(), session.volume);
        self.controller.start(view);
        if let Some(location) = location {
            self.audio.play_location_music(location);
        }
    }

    /// Apply one line of player input.
    pub fn handle(&mut self, input: UserInput, view: &mut impl ClientView) -> Flow {
        // Entering the line moved the terminal past the prompt.
        self.controller.blur_input();
        match input {
            UserInput::Command(text) => {
                self.controller.set_input(text);
                self.submit(view);
            }
            UserInput::SubmitPending => self.submit(view),
            UserInput::FocusInput => {
                self.controller.on_key('/', view);
            }
            UserInput::Suggestion(index) => {
                if !self.controller.choose_suggestion(index, view) {
                    view.show_help(self.controller.suggestions());
                }
            }
            UserInput::Mute => {
                let indicator = self.audio.toggle_mute();
                view.show_volume(indicator, self.audio.session().volume);
            }
            UserInput::Volume(percent) => {
                self.audio.set_volume(f64::from(percent.min(100)) / 100.0);
                view.show_volume(self.audio.indicator(), self.audio.session().volume);
            }
            UserInput::Intro(audio_id) => {
                if !self.controller.request_intro(audio_id, view) {
                    debug!("Introduction already loading");
                }
            }
            UserInput::Help => view.show_help(self.controller.suggestions()),
            UserInput::Unknown(line) => view.unknown_input(&line),
            UserInput::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// One iteration of the frame loop: apply finished requests, advance fades.
    pub fn frame(&mut self, raw_delta: Duration, view: &mut impl ClientView) {
        let delta = self.clock.update(raw_delta);
        for event in self.controller.poll(view) {
            self.dispatch(event);
        }
        self.audio.update(delta);
    }

    /// Put the input focus back after input or output displaced it.
    pub fn restore_focus(&mut self, view: &mut impl ClientView) {
        self.controller.restore_focus(view);
    }

    /// Whether a command or introduction request is still outstanding.
    pub fn has_pending_requests(&self) -> bool {
        self.controller.has_pending_requests()
    }

    /// Stop music and cancel any running fade.
    pub fn shutdown(&mut self) {
        self.audio.shutdown();
    }

    pub fn controller(&self) -> &CommandController<B> {
        &self.controller
    }

    pub fn audio(&self) -> &AudioManager<O> {
        &self.audio
    }

    fn submit(&mut self, view: &mut impl ClientView) {
        if self.controller.submit(view) == SubmitOutcome::Busy {
            // Keep what was typed visible until the current turn finishes.
            view.set_input(self.controller.input());
        }
    }

    fn dispatch(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::LocationChanged(location) => {
                self.audio.play_location_music(&location);
            }
            ControllerEvent::PlayClip(bytes) => {
                if let Err(e) = self.audio.play_clip(bytes) {
                    warn!("Could not play character introduction: {}", e);
                }
            }
            ControllerEvent::TurnCompleted(turn) => {
                debug!("Turn complete: {:?} -> {}", turn.command_text, turn.image_url);
            }
        }
    }
}
