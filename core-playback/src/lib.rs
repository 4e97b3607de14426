//! # Playback Module
//!
//! Playlist playback engine for the playlist core.
//!
//! ## Overview
//!
//! This crate handles:
//! - Track validation and ordered playlist storage with a current-track cursor
//! - The [`PlaybackEngine`]: play/pause/next/prev/stop controls plus a
//!   background session that advances tracks as their durations elapse
//! - Playback configuration (resume policy)
//!
//! Persistence and remote access live in other crates; the engine is purely
//! in-memory and owns no I/O.

pub mod config;
pub mod engine;
pub mod error;
pub mod playlist;
pub mod track;

pub use config::{PlaybackConfig, ResumePolicy};
pub use engine::{PlaybackEngine, PlaybackSnapshot, PlaybackState};
pub use error::{PlaybackError, Result};
pub use playlist::Playlist;
pub use track::Track;
