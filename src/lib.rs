//! Tale - terminal client for an illustrated text-adventure server
//!
//! - [`controller`]: the command round-trip (echo, request, narrative, scene image)
//! - [`app`]: owns the controller and the audio manager and routes events between them
//! - [`terminal`]: line input parsing and the text renderer
//! - [`settings`]: TOML settings under the user's config directory

pub mod app;
pub mod controller;
pub mod settings;
pub mod terminal;
pub mod view;
