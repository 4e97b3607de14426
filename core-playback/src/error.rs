//! # Playback Error Types
//!
//! Error types for playlist and playback-control operations.

use thiserror::Error;

/// Errors that can occur during playback operations.
///
/// Every engine operation either applies fully or fails with one of these
/// without changing any state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Track title is empty.
    #[error("Track title must not be empty")]
    InvalidTitle,

    /// Track duration is not positive.
    #[error("Track duration must be greater than zero")]
    InvalidDuration,

    // ========================================================================
    // Playlist Errors
    // ========================================================================
    /// The playlist has no tracks, or no current track has been selected yet.
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// No track in the playlist has this title.
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// The track is the current track and cannot be removed.
    #[error("Track is currently selected for playback: {0}")]
    TrackIsPlaying(String),

    // ========================================================================
    // Playback Control Errors
    // ========================================================================
    /// Play was requested while already playing.
    #[error("Already playing")]
    AlreadyPlaying,

    /// Pause was requested while already paused.
    #[error("Already paused")]
    AlreadyPaused,

    /// Pause or stop was requested while stopped.
    #[error("Not playing")]
    NotPlaying,

    /// A playback session needs a Tokio runtime and none is reachable.
    #[error("No async runtime available to drive playback")]
    RuntimeUnavailable,
}

impl PlaybackError {
    /// Returns `true` if the caller supplied invalid track data.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PlaybackError::InvalidTitle | PlaybackError::InvalidDuration
        )
    }

    /// Returns `true` if the request conflicts with the current playback state.
    pub fn is_state_conflict(&self) -> bool {
        matches!(
            self,
            PlaybackError::AlreadyPlaying
                | PlaybackError::AlreadyPaused
                | PlaybackError::NotPlaying
                | PlaybackError::TrackIsPlaying(_)
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(PlaybackError::InvalidTitle.is_validation());
        assert!(PlaybackError::InvalidDuration.is_validation());
        assert!(!PlaybackError::EmptyPlaylist.is_validation());

        assert!(PlaybackError::AlreadyPlaying.is_state_conflict());
        assert!(PlaybackError::TrackIsPlaying("Song 1".into()).is_state_conflict());
        assert!(!PlaybackError::TrackNotFound("Song 1".into()).is_state_conflict());
        assert!(!PlaybackError::RuntimeUnavailable.is_state_conflict());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            PlaybackError::TrackIsPlaying("Song 1".into()).to_string(),
            "Track is currently selected for playback: Song 1"
        );
        assert_eq!(PlaybackError::NotPlaying.to_string(), "Not playing");
    }
}
