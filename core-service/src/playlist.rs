//! # Playlist Service
//!
//! Keeps the persistent track catalog and the in-memory playback engine in
//! step. Catalog writes happen first for creates and updates; deletes ask the
//! engine first so a track under the cursor is never removed from the store.

use crate::error::{CoreError, Result};
use core_library::{LibraryError, TrackRecord, TrackRepository};
use core_playback::{PlaybackEngine, PlaybackError, PlaybackSnapshot, Track};
use core_runtime::events::{CoreEvent, EventBus, EventStream, LibraryEvent};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Track catalog and playback controls behind one façade.
pub struct PlaylistService {
    repository: Arc<dyn TrackRepository>,
    engine: Arc<PlaybackEngine>,
    events: EventBus,
}

/// Converts wire seconds into a validated track.
fn validated_track(title: &str, duration_secs: i64) -> Result<Track> {
    if title.is_empty() {
        return Err(PlaybackError::InvalidTitle.into());
    }
    let secs = u64::try_from(duration_secs).map_err(|_| PlaybackError::InvalidDuration)?;
    Ok(Track::new(title, Duration::from_secs(secs))?)
}

impl PlaylistService {
    pub fn new(
        repository: Arc<dyn TrackRepository>,
        engine: Arc<PlaybackEngine>,
        events: EventBus,
    ) -> Self {
        Self {
            repository,
            engine,
            events,
        }
    }

    pub fn engine(&self) -> &Arc<PlaybackEngine> {
        &self.engine
    }

    /// Subscribe to library and playback events.
    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }

    fn emit(&self, event: LibraryEvent) {
        // No subscribers is not an error.
        let _ = self.events.emit(CoreEvent::Library(event));
    }

    /// Loads every catalog track into the engine in insertion order.
    ///
    /// Returns the number of tracks loaded.
    #[instrument(skip(self))]
    pub async fn hydrate(&self) -> Result<usize> {
        let records = self.repository.list().await?;
        for record in &records {
            self.engine.add_track(record.title.clone(), record.duration())?;
        }
        info!(tracks = records.len(), "Playlist hydrated from catalog");
        Ok(records.len())
    }

    // ------------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------------

    /// Persists a new track and appends it to the playlist.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::InvalidTitle`] / [`PlaybackError::InvalidDuration`]
    ///   on bad input
    /// - [`CoreError::TrackAlreadyExists`] if the title is taken
    #[instrument(skip(self))]
    pub async fn create_track(&self, title: &str, duration_secs: i64) -> Result<TrackRecord> {
        let track = validated_track(title, duration_secs)?;

        if self.repository.find_by_title(title).await?.is_some() {
            return Err(CoreError::TrackAlreadyExists(title.to_string()));
        }

        let record = self
            .repository
            .create(title, duration_secs)
            .await
            .map_err(|err| match err {
                LibraryError::Conflict { .. } => CoreError::TrackAlreadyExists(title.to_string()),
                other => other.into(),
            })?;

        if let Err(err) = self.engine.add_track(track.title(), track.duration()) {
            warn!(error = %err, "Engine rejected catalog track, rolling back");
            self.repository.delete(title).await?;
            return Err(err.into());
        }

        self.emit(LibraryEvent::TrackAdded {
            track_id: record.id,
            title: record.title.clone(),
            duration_secs: record.duration_secs,
        });
        debug!(track_id = record.id, "Track created");
        Ok(record)
    }

    pub async fn get_track(&self, title: &str) -> Result<TrackRecord> {
        self.repository
            .find_by_title(title)
            .await?
            .ok_or_else(|| CoreError::TrackNotInCatalog(title.to_string()))
    }

    /// Catalog tracks in insertion order.
    pub async fn list_tracks(&self) -> Result<Vec<TrackRecord>> {
        Ok(self.repository.list().await?)
    }

    /// Renames and re-times a track in the catalog and the playlist.
    ///
    /// The playlist position is kept, and a playing track's in-flight timer
    /// is not restarted.
    #[instrument(skip(self))]
    pub async fn update_track(
        &self,
        old_title: &str,
        new_title: &str,
        duration_secs: i64,
    ) -> Result<TrackRecord> {
        let track = validated_track(new_title, duration_secs)?;

        let previous = self
            .repository
            .find_by_title(old_title)
            .await?
            .ok_or_else(|| CoreError::TrackNotInCatalog(old_title.to_string()))?;

        if new_title != old_title && self.repository.find_by_title(new_title).await?.is_some() {
            return Err(CoreError::TrackAlreadyExists(new_title.to_string()));
        }

        let record = self
            .repository
            .update(old_title, new_title, duration_secs)
            .await
            .map_err(|err| match err {
                LibraryError::Conflict { .. } => {
                    CoreError::TrackAlreadyExists(new_title.to_string())
                }
                LibraryError::NotFound { .. } => CoreError::TrackNotInCatalog(old_title.to_string()),
                other => other.into(),
            })?;

        match self
            .engine
            .rename_track(old_title, track.title(), track.duration())
        {
            Ok(()) => {}
            Err(PlaybackError::TrackNotFound(_)) | Err(PlaybackError::EmptyPlaylist) => {
                debug!("Track not loaded in playlist, catalog updated only");
            }
            Err(err) => {
                warn!(error = %err, "Engine rejected rename, rolling back");
                self.repository
                    .update(new_title, old_title, previous.duration_secs)
                    .await?;
                return Err(err.into());
            }
        }

        self.emit(LibraryEvent::TrackUpdated {
            previous_title: previous.title,
            title: record.title.clone(),
            duration_secs: record.duration_secs,
        });
        Ok(record)
    }

    /// Removes a track from the playlist and then from the catalog.
    ///
    /// # Errors
    ///
    /// - [`CoreError::TrackNotInCatalog`] if the title is unknown
    /// - [`PlaybackError::TrackIsPlaying`] if the track is under the cursor;
    ///   the catalog is left untouched
    #[instrument(skip(self))]
    pub async fn delete_track(&self, title: &str) -> Result<()> {
        if self.repository.find_by_title(title).await?.is_none() {
            return Err(CoreError::TrackNotInCatalog(title.to_string()));
        }

        let removed = match self.engine.remove_track(title) {
            Ok(removed) => Some(removed),
            Err(PlaybackError::TrackNotFound(_)) | Err(PlaybackError::EmptyPlaylist) => {
                debug!("Track not loaded in playlist, deleting from catalog only");
                None
            }
            Err(err) => return Err(err.into()),
        };

        let outcome = match self.repository.delete(title).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(CoreError::TrackNotInCatalog(title.to_string())),
            Err(err) => Err(err.into()),
        };

        if let Err(err) = outcome {
            if let Some((position, track)) = removed {
                warn!(error = %err, position, "Catalog delete failed, restoring playlist track");
                self.engine.restore_track(position, track);
            }
            return Err(err);
        }

        self.emit(LibraryEvent::TrackDeleted {
            title: title.to_string(),
        });
        debug!("Track deleted");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------------

    pub fn play(&self) -> Result<()> {
        Ok(self.engine.play()?)
    }

    pub fn pause(&self) -> Result<()> {
        Ok(self.engine.pause()?)
    }

    pub fn next(&self) -> Result<()> {
        Ok(self.engine.next()?)
    }

    pub fn prev(&self) -> Result<()> {
        Ok(self.engine.prev()?)
    }

    pub fn stop(&self) -> Result<()> {
        Ok(self.engine.stop()?)
    }

    pub fn status(&self) -> PlaybackSnapshot {
        self.engine.snapshot()
    }
}
