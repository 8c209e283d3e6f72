//! Tale Integration - Game server API client
//!
//! Submits player commands, fetches character introduction audio, and loads
//! scene images, all without blocking the frame loop.

pub mod error;
pub mod types;
pub mod server;
pub mod command;
pub mod character_audio;
pub mod scene_image;
pub mod client;

pub use client::{GameBackend, IntegrationClient, PendingRequest, ResultSender};
pub use error::IntegrationError;
pub use server::ServerConfig;
pub use types::*;

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod api_tests;
