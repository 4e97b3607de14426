use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Entity already exists: {entity_type} with key {key}")]
    Conflict { entity_type: String, key: String },

    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    #[error("Migration failed: {0}")]
    Migration(String),
}

impl LibraryError {
    /// Maps a unique-constraint violation to [`LibraryError::Conflict`],
    /// leaving every other database error untouched.
    pub(crate) fn from_write(err: sqlx::Error, entity_type: &str, key: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                LibraryError::Conflict {
                    entity_type: entity_type.to_string(),
                    key: key.to_string(),
                }
            }
            _ => LibraryError::Database(err),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LibraryError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, LibraryError::Conflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
