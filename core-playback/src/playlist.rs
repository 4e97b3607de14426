//! # Playlist
//!
//! Ordered track storage with a cursor naming the current track.
//!
//! ## Overview
//!
//! Tracks live in a `Vec` in insertion order, which is also playback order.
//! The cursor is an index into that `Vec`, or `None` until playback first
//! starts. Removing a track before the cursor shifts the index down so the
//! cursor keeps naming the same track; the cursor's own track can never be
//! removed, so a cursor never dangles.
//!
//! `Playlist` does no locking. The engine owns one behind its state mutex.

use crate::error::{PlaybackError, Result};
use crate::track::{validate_duration, validate_title, Track};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    cursor: Option<usize>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Index of the current track, if one has been selected.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&Track> {
        self.cursor.and_then(|index| self.tracks.get(index))
    }

    /// Index of the first track with this title.
    pub fn position_of(&self, title: &str) -> Option<usize> {
        self.tracks.iter().position(|track| track.title() == title)
    }

    /// Appends a track. The cursor is untouched.
    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Removes the first track with this title, returning its former index.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::EmptyPlaylist`] if there are no tracks
    /// - [`PlaybackError::TrackNotFound`] if no track has this title
    /// - [`PlaybackError::TrackIsPlaying`] if the track is under the cursor
    pub fn remove(&mut self, title: &str) -> Result<(usize, Track)> {
        if self.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }

        let index = self
            .position_of(title)
            .ok_or_else(|| PlaybackError::TrackNotFound(title.to_string()))?;

        if self.cursor == Some(index) {
            return Err(PlaybackError::TrackIsPlaying(title.to_string()));
        }

        let removed = self.tracks.remove(index);
        if let Some(cursor) = self.cursor {
            if index < cursor {
                self.cursor = Some(cursor - 1);
            }
        }

        Ok((index, removed))
    }

    /// Inserts a track at `index`, clamped to the end of the list.
    ///
    /// The cursor keeps naming the same track, so it moves up by one when the
    /// insertion lands at or before it. Returns the index actually used.
    pub fn insert_at(&mut self, index: usize, track: Track) -> usize {
        let index = index.min(self.tracks.len());
        self.tracks.insert(index, track);
        if let Some(cursor) = self.cursor {
            if index <= cursor {
                self.cursor = Some(cursor + 1);
            }
        }
        index
    }

    /// Renames and re-times the first track titled `old_title`, in place.
    ///
    /// # Errors
    ///
    /// Checked in order: [`PlaybackError::EmptyPlaylist`],
    /// [`PlaybackError::InvalidTitle`], [`PlaybackError::InvalidDuration`],
    /// [`PlaybackError::TrackNotFound`].
    pub fn rename(&mut self, old_title: &str, new_title: &str, duration: Duration) -> Result<usize> {
        if self.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }
        validate_title(new_title)?;
        validate_duration(duration)?;

        let index = self
            .position_of(old_title)
            .ok_or_else(|| PlaybackError::TrackNotFound(old_title.to_string()))?;

        self.tracks[index].update(new_title.to_string(), duration);
        Ok(index)
    }

    /// Selects the first track if nothing is selected yet.
    pub fn ensure_cursor(&mut self) -> Option<usize> {
        if self.cursor.is_none() && !self.tracks.is_empty() {
            self.cursor = Some(0);
        }
        self.cursor
    }

    /// Moves the cursor forward, wrapping from the last track to the first.
    pub fn advance(&mut self) -> Result<usize> {
        let cursor = self.cursor.ok_or(PlaybackError::EmptyPlaylist)?;
        let next = (cursor + 1) % self.tracks.len();
        self.cursor = Some(next);
        Ok(next)
    }

    /// Moves the cursor backward, wrapping from the first track to the last.
    pub fn retreat(&mut self) -> Result<usize> {
        let cursor = self.cursor.ok_or(PlaybackError::EmptyPlaylist)?;
        let previous = if cursor == 0 {
            self.tracks.len() - 1
        } else {
            cursor - 1
        };
        self.cursor = Some(previous);
        Ok(previous)
    }
}
