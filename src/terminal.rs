//! Terminal front end: line-based input parsing and a text renderer

use std::io::Write;

use tale_audio::VolumeIndicator;
use tale_core::{EntryKind, ImageSource, LogEntry};
use tale_integration::ImageInfo;

use crate::view::{ClientView, GameView};

/// Shown in place of a scene image that failed to load
pub const IMAGE_PLACEHOLDER: &str = "[ image failed to load ]";

/// One line of player input, parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    /// Text to send to the server
    Command(String),
    /// Empty line: send whatever is in the input buffer
    SubmitPending,
    /// The `/` shortcut
    FocusInput,
    /// Zero-based suggestion index
    Suggestion(usize),
    Mute,
    /// Volume in percent
    Volume(u8),
    Intro(String),
    Help,
    Quit,
    Unknown(String),
}

/// Parse a line typed at the prompt. Lines starting with `/` are client
/// shortcuts; everything else is a game command.
pub fn parse_line(line: &str) -> UserInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return UserInput::SubmitPending;
    }
    if trimmed == "/" {
        return UserInput::FocusInput;
    }
    let Some(shortcut) = trimmed.strip_prefix('/') else {
        return UserInput::Command(line.trim_end_matches(['\r', '\n']).to_string());
    };

    let mut parts = shortcut.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    match (name, arg) {
        ("quit" | "exit", None) => UserInput::Quit,
        ("help" | "?", None) => UserInput::Help,
        ("mute", None) => UserInput::Mute,
        ("volume" | "vol", Some(value)) => match value.trim_end_matches('%').parse::<u16>() {
            Ok(percent) => UserInput::Volume(percent.min(100) as u8),
            Err(_) => UserInput::Unknown(trimmed.to_string()),
        },
        ("s" | "suggest", Some(value)) => match value.parse::<usize>() {
            Ok(n) if n >= 1 => UserInput::Suggestion(n - 1),
            _ => UserInput::Unknown(trimmed.to_string()),
        },
        ("intro", Some(id)) if id.bytes().all(|b| b.is_ascii_digit()) => {
            UserInput::Intro(id.to_string())
        }
        _ => UserInput::Unknown(trimmed.to_string()),
    }
}

/// Renders the game to a text stream
pub struct TerminalView<W: Write> {
    out: W,
    submit_enabled: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            submit_enabled: true,
        }
    }

    /// Print the input prompt
    fn prompt(&mut self) {
        let marker = if self.submit_enabled { ">" } else { "…" };
        let _ = write!(self.out, "{} ", marker);
        let _ = self.out.flush();
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> GameView for TerminalView<W> {
    fn append_entry(&mut self, entry: &LogEntry) {
        let _ = match entry.kind {
            EntryKind::UserCommand => writeln!(self.out, "{}", entry.text),
            EntryKind::GameResponse => writeln!(self.out, "\n{}\n", entry.text),
            EntryKind::Error => writeln!(self.out, "! {}", entry.text),
        };
    }

    fn scroll_to_latest(&mut self) {
        let _ = self.out.flush();
    }

    fn set_loading(&mut self, visible: bool) {
        if visible {
            let _ = writeln!(self.out, "  ...");
        }
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }

    fn show_image(&mut self, image: &ImageSource) {
        let _ = match image {
            ImageSource::Empty => Ok(()),
            ImageSource::Url(url) => writeln!(self.out, "[ scene: {} ]", url),
            ImageSource::Placeholder => writeln!(self.out, "{}", IMAGE_PLACEHOLDER),
        };
    }

    fn image_loaded(&mut self, info: &ImageInfo) {
        let _ = writeln!(self.out, "[ scene loaded, {}x{} ]", info.width, info.height);
    }

    fn set_input(&mut self, text: &str) {
        if !text.is_empty() {
            let _ = writeln!(self.out, "input: {}  (Enter to send)", text);
        }
    }

    fn focus_input(&mut self) {
        self.prompt();
    }

    fn set_intro_busy(&mut self, busy: bool) {
        if busy {
            let _ = writeln!(self.out, "[ loading introduction... ]");
        }
    }

    fn show_caption(&mut self, caption: &str) {
        let _ = writeln!(self.out, "\n\"{}\"\n", caption);
    }

    fn alert(&mut self, message: &str) {
        let rule = "=".repeat(message.chars().count() + 4);
        let _ = writeln!(self.out, "{}\n| {} |\n{}", rule, message, rule);
    }
}

impl<W: Write> ClientView for TerminalView<W> {
    fn show_volume(&mut self, indicator: VolumeIndicator, volume: f64) {
        let percent = (volume * 100.0).round() as u32;
        let _ = match indicator {
            VolumeIndicator::Sound => writeln!(self.out, "[ music on, {}% ]", percent),
            VolumeIndicator::Muted => writeln!(self.out, "[ music muted, {}% ]", percent),
        };
    }

    fn show_help(&mut self, suggestions: &[String]) {
        let _ = writeln!(
            self.out,
            "Type a command and press Enter. Shortcuts:\n  \
             /            focus the input\n  \
             /s N         use suggestion N\n  \
             /mute        toggle music\n  \
             /volume P    music volume, 0-100\n  \
             /intro ID    play a character introduction (numeric id)\n  \
             /quit        leave the game"
        );
        for (i, suggestion) in suggestions.iter().enumerate() {
            let _ = writeln!(self.out, "  {}. {}", i + 1, suggestion);
        }
    }

    fn unknown_input(&mut self, line: &str) {
        let _ = writeln!(self.out, "Unknown shortcut {} (try /help)", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(f: impl FnOnce(&mut TerminalView<Vec<u8>>)) -> String {
        let mut view = TerminalView::new(Vec::new());
        f(&mut view);
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn parses_commands_and_shortcuts() {
        assert_eq!(parse_line("look around\n"), UserInput::Command("look around".into()));
        assert_eq!(parse_line("   "), UserInput::SubmitPending);
        assert_eq!(parse_line("/"), UserInput::FocusInput);
        assert_eq!(parse_line("/quit"), UserInput::Quit);
        assert_eq!(parse_line("/mute"), UserInput::Mute);
        assert_eq!(parse_line("/volume 40"), UserInput::Volume(40));
        assert_eq!(parse_line("/vol 250%"), UserInput::Volume(100));
        assert_eq!(parse_line("/s 2"), UserInput::Suggestion(1));
        assert_eq!(parse_line("/intro 12"), UserInput::Intro("12".into()));
        assert_eq!(parse_line("/help"), UserInput::Help);
    }

    #[test]
    fn rejects_malformed_shortcuts() {
        assert_eq!(parse_line("/s 0"), UserInput::Unknown("/s 0".into()));
        assert_eq!(parse_line("/volume loud"), UserInput::Unknown("/volume loud".into()));
        assert_eq!(parse_line("/intro"), UserInput::Unknown("/intro".into()));
        assert_eq!(parse_line("/intro ../command"), UserInput::Unknown("/intro ../command".into()));
        assert_eq!(parse_line("/intro 7?x=1"), UserInput::Unknown("/intro 7?x=1".into()));
        assert_eq!(parse_line("/dance"), UserInput::Unknown("/dance".into()));
    }

    #[test]
    fn renders_log_entries() {
        let out = rendered(|view| {
            view.append_entry(&LogEntry::command("look around"));
            view.append_entry(&LogEntry::response("You see a meadow."));
            view.append_entry(&LogEntry::error("Error processing your command. Please try again."));
        });
        assert!(out.contains("> look around\n"));
        assert!(out.contains("\nYou see a meadow.\n"));
        assert!(out.contains("! Error processing your command."));
    }

    #[test]
    fn renders_placeholder_image() {
        let out = rendered(|view| view.show_image(&ImageSource::Placeholder));
        assert_eq!(out.trim(), IMAGE_PLACEHOLDER);
    }

    #[test]
    fn prompt_shows_busy_marker() {
        let out = rendered(|view| {
            view.set_submit_enabled(false);
            view.prompt();
        });
        assert_eq!(out, "… ");
    }

    #[test]
    fn renders_volume() {
        let out = rendered(|view| view.show_volume(VolumeIndicator::Muted, 0.3));
        assert_eq!(out.trim(), "[ music muted, 30% ]");
    }
}
