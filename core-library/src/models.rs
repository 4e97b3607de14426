//! Domain models for the track catalog
//!
//! This module contains the persisted track model with validation and
//! database mapping.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::time::Duration;

/// A persisted track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TrackRecord {
    /// Store-assigned identifier; ascending ids follow insertion order
    pub id: i64,
    /// Unique track title
    pub title: String,
    /// Duration in whole seconds
    pub duration_secs: i64,

    // Timestamps
    /// When first added (unix seconds)
    pub created_at: i64,
    /// Last update time (unix seconds)
    pub updated_at: i64,
}

impl TrackRecord {
    /// Validate track data
    pub fn validate(&self) -> Result<(), String> {
        Self::validate_fields(&self.title, self.duration_secs)
    }

    /// Validate a title and duration before they reach the database.
    pub fn validate_fields(title: &str, duration_secs: i64) -> Result<(), String> {
        if title.is_empty() {
            return Err("Track title cannot be empty".to_string());
        }

        if duration_secs <= 0 {
            return Err("Track duration must be positive".to_string());
        }

        Ok(())
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs.max(0) as u64)
    }
}
