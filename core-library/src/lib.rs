//! # Track Catalog
//!
//! Owns the persistent track catalog and provides repository patterns for
//! data access.
//!
//! ## Overview
//!
//! This module manages:
//! - SQLite database schema and migrations
//! - Connection pooling
//! - The [`TrackRepository`] trait and its SQLite implementation
//!
//! The catalog only stores tracks. Playback order and the current track live
//! in `core-playback`; the service layer keeps the two in step.

pub mod db;
pub mod error;
pub mod models;
pub mod repositories;

pub use db::{create_pool, create_test_pool, DatabaseConfig};
pub use error::{LibraryError, Result};
pub use models::TrackRecord;
pub use repositories::{SqliteTrackRepository, TrackRepository};
