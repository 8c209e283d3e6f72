//! Presentation surface driven by the command controller
//!
//! A front end implements [`GameView`] to render the log, the scene image and
//! the input controls. The controller never reads anything back from the view.

use tale_audio::VolumeIndicator;
use tale_core::{ImageSource, LogEntry};
use tale_integration::ImageInfo;

/// Everything the controller can change on screen
pub trait GameView {
    /// Append one line to the game log
    fn append_entry(&mut self, entry: &LogEntry);

    /// Keep the newest log entry in view
    fn scroll_to_latest(&mut self);

    /// Show or hide the loading indicator over the scene image
    fn set_loading(&mut self, visible: bool);

    /// Enable or disable the submit control
    fn set_submit_enabled(&mut self, enabled: bool);

    /// Point the scene image at a new source
    fn show_image(&mut self, image: &ImageSource);

    /// The scene image finished loading
    fn image_loaded(&mut self, _info: &ImageInfo) {}

    /// Replace the text in the command input
    fn set_input(&mut self, text: &str);

    fn focus_input(&mut self);

    /// Disable the intro control and show it busy, or restore it
    fn set_intro_busy(&mut self, busy: bool);

    /// Show the caption of a character introduction
    fn show_caption(&mut self, caption: &str);

    /// Blocking, user-visible alert
    fn alert(&mut self, message: &str);
}

/// Parts of the screen owned by the app rather than the command controller
pub trait ClientView: GameView {
    /// Update the mute button icon and volume slider
    fn show_volume(&mut self, indicator: VolumeIndicator, volume: f64);

    fn show_help(&mut self, suggestions: &[String]);

    /// Input that is neither a command nor a known shortcut
    fn unknown_input(&mut self, line: &str);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// View that records every call, for asserting on what the player would see
    #[derive(Debug, Default)]
    pub struct RecordingView {
        pub entries: Vec<LogEntry>,
        pub scrolls: usize,
        pub loading: bool,
        pub submit_enabled: bool,
        pub image: ImageSource,
        pub loaded: Vec<ImageInfo>,
        pub input: String,
        pub focus_count: usize,
        pub intro_busy: bool,
        pub captions: Vec<String>,
        pub alerts: Vec<String>,
        pub volume: Option<(VolumeIndicator, f64)>,
        pub help_shown: usize,
        pub unknown: Vec<String>,
    }

    impl RecordingView {
        pub fn new() -> Self {
            Self {
                submit_enabled: true,
                ..Default::default()
            }
        }

        pub fn texts(&self) -> Vec<&str> {
            self.entries.iter().map(|e| e.text.as_str()).collect()
        }
    }

    impl GameView for RecordingView {
        fn append_entry(&mut self, entry: &LogEntry) {
            self.entries.push(entry.clone());
        }

        fn scroll_to_latest(&mut self) {
            self.scrolls += 1;
        }

        fn set_loading(&mut self, visible: bool) {
            self.loading = visible;
        }

        fn set_submit_enabled(&mut self, enabled: bool) {
            self.submit_enabled = enabled;
        }

        fn show_image(&mut self, image: &ImageSource) {
            self.image = image.clone();
        }

        fn image_loaded(&mut self, info: &ImageInfo) {
            self.loaded.push(info.clone());
        }

        fn set_input(&mut self, text: &str) {
            self.input = text.to_string();
        }

        fn focus_input(&mut self) {
            self.focus_count += 1;
        }

        fn set_intro_busy(&mut self, busy: bool) {
            self.intro_busy = busy;
        }

        fn show_caption(&mut self, caption: &str) {
            self.captions.push(caption.to_string());
        }

        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }
    }

    impl ClientView for RecordingView {
        fn show_volume(&mut self, indicator: VolumeIndicator, volume: f64) {
            self.volume = Some((indicator, volume));
        }

        fn show_help(&mut self, _suggestions: &[String]) {
            self.help_shown += 1;
        }

        fn unknown_input(&mut self, line: &str) {
            self.unknown.push(line.to_string());
        }
    }
}
