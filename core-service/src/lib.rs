//! Core service façade and bootstrap helpers.
//!
//! This crate wires the persistent track catalog (`core-library`), the
//! playback engine (`core-playback`) and the event bus (`core-runtime`) into
//! a single [`CoreService`]. Hosts call [`CoreService::bootstrap`] with a
//! [`CoreConfig`] and drive everything through [`PlaylistService`].
//!
//! ```no_run
//! # async fn example() -> core_service::Result<()> {
//! use core_runtime::config::CoreConfig;
//! use core_service::CoreService;
//!
//! let config = CoreConfig::builder().database_path("tracks.db").build()?;
//! let core = CoreService::bootstrap(config).await?;
//!
//! core.playlist().create_track("Song 1", 150).await?;
//! core.playlist().play()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod playlist;

pub use error::{CoreError, Result};
pub use playlist::PlaylistService;

use std::sync::Arc;

use core_library::{create_pool, DatabaseConfig, SqliteTrackRepository, TrackRepository};
use core_playback::{PlaybackConfig, PlaybackEngine};
use core_runtime::config::CoreConfig;
use core_runtime::events::{EventBus, EventStream};
use core_runtime::logging::init_logging;
use core_runtime::Error as RuntimeError;
use tracing::{debug, info};

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    config: Arc<CoreConfig>,
    events: EventBus,
    playlist: Arc<PlaylistService>,
}

impl CoreService {
    /// Opens the catalog described by `config` and builds the service on it.
    pub async fn bootstrap(config: CoreConfig) -> Result<Self> {
        config.validate()?;

        let db_config = DatabaseConfig::from_optional_path(config.database_path.clone())
            .max_connections(config.max_connections);
        let pool = create_pool(db_config)
            .await
            .map_err(|err| CoreError::InitializationFailed(err.to_string()))?;

        let repository: Arc<dyn TrackRepository> = Arc::new(SqliteTrackRepository::new(pool));
        Self::with_repository(config, repository).await
    }

    /// Builds the service on an existing catalog.
    ///
    /// Installs the configured logging unless the host already installed a
    /// subscriber. When `hydrate_on_startup` is set the playlist is loaded
    /// from the catalog before this returns.
    pub async fn with_repository(
        config: CoreConfig,
        repository: Arc<dyn TrackRepository>,
    ) -> Result<Self> {
        install_logging(&config)?;

        let events = EventBus::new(config.event_buffer_size);
        let engine = Arc::new(PlaybackEngine::with_event_bus(
            playback_config(&config),
            events.clone(),
        ));
        let playlist = Arc::new(PlaylistService::new(repository, engine, events.clone()));

        if config.features.hydrate_on_startup {
            playlist.hydrate().await?;
        }

        info!(
            in_memory = config.is_in_memory(),
            tracks = playlist.engine().len(),
            "Core service ready"
        );

        Ok(Self {
            config: Arc::new(config),
            events,
            playlist,
        })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn playlist(&self) -> &PlaylistService {
        &self.playlist
    }

    /// Subscribe to library and playback events.
    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }
}

fn install_logging(config: &CoreConfig) -> Result<()> {
    match init_logging(config.logging.clone()) {
        Ok(()) => Ok(()),
        Err(RuntimeError::Internal(reason)) => {
            debug!(%reason, "Keeping the installed tracing subscriber");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn playback_config(config: &CoreConfig) -> PlaybackConfig {
    if config.features.preserve_elapsed_on_resume {
        PlaybackConfig::preserving_elapsed()
    } else {
        PlaybackConfig::default()
    }
}
