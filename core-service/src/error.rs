use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Track already exists: {0}")]
    TrackAlreadyExists(String),

    #[error("Track not in catalog: {0}")]
    TrackNotInCatalog(String),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Library error: {0}")]
    Library(#[from] core_library::LibraryError),

    #[error("Playback error: {0}")]
    Playback(#[from] core_playback::PlaybackError),
}

impl CoreError {
    /// True when the caller can fix the request; false for infrastructure
    /// failures.
    pub fn is_client_error(&self) -> bool {
        use core_library::LibraryError;
        use core_playback::PlaybackError;

        match self {
            CoreError::TrackAlreadyExists(_) | CoreError::TrackNotInCatalog(_) => true,
            CoreError::Playback(PlaybackError::RuntimeUnavailable) => false,
            CoreError::Playback(_) => true,
            CoreError::Library(
                LibraryError::NotFound { .. }
                | LibraryError::Conflict { .. }
                | LibraryError::InvalidInput { .. },
            ) => true,
            CoreError::Library(_) | CoreError::Runtime(_) | CoreError::InitializationFailed(_) => {
                false
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use core_library::LibraryError;
    use core_playback::PlaybackError;

    #[test]
    fn test_client_errors() {
        assert!(CoreError::TrackAlreadyExists("a".into()).is_client_error());
        assert!(CoreError::TrackNotInCatalog("a".into()).is_client_error());
        assert!(CoreError::from(PlaybackError::TrackIsPlaying("a".into())).is_client_error());
        assert!(CoreError::from(LibraryError::Conflict {
            entity_type: "Track".into(),
            key: "a".into(),
        })
        .is_client_error());
    }

    #[test]
    fn test_infrastructure_errors() {
        assert!(!CoreError::from(PlaybackError::RuntimeUnavailable).is_client_error());
        assert!(!CoreError::from(LibraryError::Migration("boom".into())).is_client_error());
        assert!(!CoreError::from(core_runtime::Error::Config("bad".into())).is_client_error());
        assert!(!CoreError::InitializationFailed("pool".into()).is_client_error());
    }

    #[test]
    fn test_display_wraps_source() {
        let err = CoreError::from(PlaybackError::EmptyPlaylist);
        assert!(err.to_string().starts_with("Playback error:"));
    }
}
