//! # Core Configuration Module
//!
//! Provides configuration management for the playlist core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds the settings the service needs at bootstrap. It enforces
//! fail-fast validation so misconfiguration surfaces before any database is
//! opened or background task is spawned.
//!
//! ## Usage
//!
//! ### File-backed catalog
//!
//! ```rust
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .database_path("/var/lib/playlist/tracks.db")
//!     .max_connections(4)
//!     .build()
//!     .expect("Failed to build config");
//!
//! assert!(!config.is_in_memory());
//! ```
//!
//! ### In-memory catalog (tests, demos)
//!
//! ```rust
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .in_memory()
//!     .preserve_elapsed_on_resume(true)
//!     .build()
//!     .unwrap();
//!
//! assert!(config.is_in_memory());
//! assert!(config.features.preserve_elapsed_on_resume);
//! ```
//!
//! ## Error Handling
//!
//! The builder validates every field and returns [`Error::Config`] with an
//! actionable message:
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .event_buffer_size(0)
//!     .build()
//!     .expect("Should fail - zero event buffer");
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use crate::logging::LoggingConfig;
use std::path::PathBuf;

/// Default pool size for a file-backed catalog.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Upper bound accepted for the catalog pool size.
pub const MAX_CONNECTIONS_LIMIT: u32 = 64;

/// Core configuration for the playlist core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Path to the SQLite catalog file. `None` keeps the catalog in memory.
    pub database_path: Option<PathBuf>,

    /// Maximum connections in the catalog pool
    pub max_connections: u32,

    /// Capacity of the event bus channel
    pub event_buffer_size: usize,

    /// Logging settings applied by binaries that own the subscriber
    pub logging: LoggingConfig,

    /// Feature flags
    pub features: FeatureFlags,
}

/// Feature flags control optional behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Resume a paused track with its remaining time instead of its full duration
    pub preserve_elapsed_on_resume: bool,

    /// Load persisted tracks into the playback engine at bootstrap
    pub hydrate_on_startup: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            preserve_elapsed_on_resume: false,
            hydrate_on_startup: true,
        }
    }
}

impl CoreConfig {
    /// Creates a new builder.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Returns true when the catalog lives only for the lifetime of the process.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.is_none()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.database_path {
            if path.as_os_str().is_empty() {
                return Err(Error::Config(
                    "Database path cannot be empty. Omit it to use an in-memory catalog."
                        .to_string(),
                ));
            }
        }

        if self.max_connections == 0 {
            return Err(Error::Config(
                "Max connections must be greater than 0".to_string(),
            ));
        }

        if self.max_connections > MAX_CONNECTIONS_LIMIT {
            return Err(Error::Config(format!(
                "Max connections exceeds maximum of {}",
                MAX_CONNECTIONS_LIMIT
            )));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`CoreConfig`].
#[derive(Debug, Default)]
pub struct CoreConfigBuilder {
    database_path: Option<PathBuf>,
    max_connections: Option<u32>,
    event_buffer_size: Option<usize>,
    logging: Option<LoggingConfig>,
    features: FeatureFlags,
}

impl CoreConfigBuilder {
    /// Sets the SQLite catalog file path.
    pub fn database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Keeps the catalog in memory.
    pub fn in_memory(mut self) -> Self {
        self.database_path = None;
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = Some(max);
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    pub fn preserve_elapsed_on_resume(mut self, enabled: bool) -> Self {
        self.features.preserve_elapsed_on_resume = enabled;
        self
    }

    pub fn hydrate_on_startup(mut self, enabled: bool) -> Self {
        self.features.hydrate_on_startup = enabled;
        self
    }

    pub fn features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    /// Builds the configuration.
    ///
    /// In-memory catalogs are pinned to a single connection, since every
    /// SQLite `:memory:` connection opens a separate database.
    pub fn build(self) -> Result<CoreConfig> {
        let max_connections = match (&self.database_path, self.max_connections) {
            (None, Some(max)) if max > 1 => {
                return Err(Error::Config(
                    "An in-memory catalog supports exactly one connection. \
                     Set a database path or drop the max_connections override."
                        .to_string(),
                ))
            }
            (None, _) => 1,
            (Some(_), max) => max.unwrap_or(DEFAULT_MAX_CONNECTIONS),
        };

        let config = CoreConfig {
            database_path: self.database_path,
            max_connections,
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            logging: self.logging.unwrap_or_default(),
            features: self.features,
        };

        config.validate()?;

        Ok(config)
    }
}
