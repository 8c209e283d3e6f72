//! Tale Core - Core types and utilities for the Tale client
//!
//! This crate provides the foundational types shared by the client crates:
//! - Game turns and the append-only log entries they render into
//! - Image sources shown in the scene panel
//! - Frame clock and repeating timers driven by the frame loop

pub mod time;
pub mod types;

pub use time::{FrameClock, RepeatingTimer};
pub use types::{EntryKind, GameTurn, ImageSource, LogEntry};
