//! # Repository Pattern Implementation
//!
//! Repository traits and their SQLite implementations.
//!
//! - Traits define the interface so services can be tested against mocks
//! - SQLite implementations use sqlx for async database access
//! - All operations return `Result<T>`

pub mod track;

pub use track::{SqliteTrackRepository, TrackRepository};
