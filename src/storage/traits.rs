//! Cache traits and error types
//!
//! This module defines the trait interface for parse cache backends and
//! associated error types.

use crate::bookmarks::BookmarkRecord;
use crate::storage::{CacheInfo, CacheKey};
use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt cache entry: {0}")]
    Corrupt(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for cache operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for parse cache backends
///
/// A cache maps a [`CacheKey`] to the records a parse produced, in document
/// order. Entries are immutable; saving under an existing key replaces it.
pub trait BookmarkCache {
    /// Stores the records for a key
    fn save(&mut self, key: &CacheKey, records: &[BookmarkRecord]) -> StorageResult<()>;

    /// Loads the records for a key, if present
    fn load(&self, key: &CacheKey) -> StorageResult<Option<Vec<BookmarkRecord>>>;

    /// Removes every entry, returning how many were removed
    fn clear(&mut self) -> StorageResult<usize>;

    /// Removes entries older than `max_age`, returning how many were removed
    fn cleanup_expired(&mut self, max_age: chrono::Duration) -> StorageResult<usize>;

    /// Summary of the cache contents
    fn info(&self) -> StorageResult<CacheInfo>;
}
