//! # Tracks
//!
//! A track is a title plus a positive duration. Titles identify tracks inside
//! a playlist.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A playable item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    title: String,
    duration: Duration,
}

impl Track {
    /// Creates a validated track.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::InvalidTitle`] if `title` is empty
    /// - [`PlaybackError::InvalidDuration`] if `duration` is zero
    pub fn new(title: impl Into<String>, duration: Duration) -> Result<Self> {
        let title = title.into();
        validate_title(&title)?;
        validate_duration(duration)?;
        Ok(Self { title, duration })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Replaces title and duration in place. Inputs must already be validated.
    pub(crate) fn update(&mut self, title: String, duration: Duration) {
        self.title = title;
        self.duration = duration;
    }
}

pub(crate) fn validate_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(PlaybackError::InvalidTitle);
    }
    Ok(())
}

pub(crate) fn validate_duration(duration: Duration) -> Result<()> {
    if duration.is_zero() {
        return Err(PlaybackError::InvalidDuration);
    }
    Ok(())
}
