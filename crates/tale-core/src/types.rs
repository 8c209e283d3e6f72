//! Core types used throughout the Tale client

use serde::{Deserialize, Serialize};

/// One command/response exchange with the game server.
///
/// Turns are never persisted client-side; the server holds the canonical history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTurn {
    pub command_text: String,
    pub response_text: String,
    pub image_url: String,
}

/// How a log entry is styled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Echo of what the player typed
    UserCommand,
    /// Narrative text returned by the server
    GameResponse,
    /// Inline error shown after a failed turn
    Error,
}

/// A single line in the append-only game log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: EntryKind,
    pub text: String,
}

impl LogEntry {
    /// Echo line for a submitted command, prefixed with `> `
    pub fn command(command: &str) -> Self {
        Self {
            kind: EntryKind::UserCommand,
            text: format!("> {}", command),
        }
    }

    pub fn response(text: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::GameResponse,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Error,
            text: text.into(),
        }
    }
}

/// What the scene image panel currently shows
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageSource {
    /// Nothing has been shown yet
    #[default]
    Empty,
    /// An image served by the game server
    Url(String),
    /// The local stand-in shown when an image fails to load
    Placeholder,
}

impl ImageSource {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ImageSource::Placeholder)
    }
}
