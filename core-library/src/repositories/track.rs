//! Track repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::TrackRecord;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query_as, SqlitePool};
use tracing::debug;

const ENTITY: &str = "Track";

/// Track repository interface for data access operations
#[async_trait]
pub trait TrackRepository: Send + Sync {
    /// Insert a new track and return the stored record
    ///
    /// # Errors
    /// Returns error if:
    /// - Title or duration fails validation
    /// - A track with the same title already exists
    /// - Database error occurs
    async fn create(&self, title: &str, duration_secs: i64) -> Result<TrackRecord>;

    /// Find a track by its ID
    async fn find_by_id(&self, id: i64) -> Result<Option<TrackRecord>>;

    /// Find a track by its title
    ///
    /// # Returns
    /// - `Ok(Some(track))` if found
    /// - `Ok(None)` if not found
    /// - `Err` if database error occurs
    async fn find_by_title(&self, title: &str) -> Result<Option<TrackRecord>>;

    /// Rename and re-time the track titled `old_title`
    ///
    /// # Errors
    /// Returns error if:
    /// - No track has `old_title`
    /// - Another track already has `new_title`
    /// - Validation fails
    async fn update(
        &self,
        old_title: &str,
        new_title: &str,
        duration_secs: i64,
    ) -> Result<TrackRecord>;

    /// Delete a track by title
    ///
    /// # Returns
    /// - `Ok(true)` if track was deleted
    /// - `Ok(false)` if track was not found
    async fn delete(&self, title: &str) -> Result<bool>;

    /// All tracks in insertion order
    async fn list(&self) -> Result<Vec<TrackRecord>>;

    /// Count total tracks
    async fn count(&self) -> Result<i64>;
}

/// SQLite implementation of TrackRepository
pub struct SqliteTrackRepository {
    pool: SqlitePool,
}

impl SqliteTrackRepository {
    /// Create a new SQLite track repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn validate(title: &str, duration_secs: i64) -> Result<()> {
    TrackRecord::validate_fields(title, duration_secs).map_err(|message| {
        LibraryError::InvalidInput {
            field: "track".to_string(),
            message,
        }
    })
}

#[async_trait]
impl TrackRepository for SqliteTrackRepository {
    async fn create(&self, title: &str, duration_secs: i64) -> Result<TrackRecord> {
        validate(title, duration_secs)?;

        let now = Utc::now().timestamp();
        let result = sqlx::query(
            "INSERT INTO tracks (title, duration_secs, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(title)
        .bind(duration_secs)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| LibraryError::from_write(e, ENTITY, title))?;

        let id = result.last_insert_rowid();
        debug!(track_id = id, title, "Inserted track");

        Ok(TrackRecord {
            id,
            title: title.to_string(),
            duration_secs,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<TrackRecord>> {
        let track = query_as::<_, TrackRecord>("SELECT * FROM tracks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(track)
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<TrackRecord>> {
        let track = query_as::<_, TrackRecord>("SELECT * FROM tracks WHERE title = ?")
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;

        Ok(track)
    }

    async fn update(
        &self,
        old_title: &str,
        new_title: &str,
        duration_secs: i64,
    ) -> Result<TrackRecord> {
        validate(new_title, duration_secs)?;

        let now = Utc::now().timestamp();
        let result =
            sqlx::query("UPDATE tracks SET title = ?, duration_secs = ?, updated_at = ? WHERE title = ?")
                .bind(new_title)
                .bind(duration_secs)
                .bind(now)
                .bind(old_title)
                .execute(&self.pool)
                .await
                .map_err(|e| LibraryError::from_write(e, ENTITY, new_title))?;

        if result.rows_affected() == 0 {
            return Err(LibraryError::NotFound {
                entity_type: ENTITY.to_string(),
                id: old_title.to_string(),
            });
        }

        self.find_by_title(new_title)
            .await?
            .ok_or_else(|| LibraryError::NotFound {
                entity_type: ENTITY.to_string(),
                id: new_title.to_string(),
            })
    }

    async fn delete(&self, title: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tracks WHERE title = ?")
            .bind(title)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<TrackRecord>> {
        let tracks = query_as::<_, TrackRecord>("SELECT * FROM tracks ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(tracks)
    }

    async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tracks")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
