//! SQLite cache implementation
//!
//! This module provides a SQLite-based implementation of the BookmarkCache trait.

use crate::bookmarks::{BookmarkRecord, FolderPath};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{BookmarkCache, StorageError, StorageResult};
use crate::storage::{CacheInfo, CacheKey};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Raw row of `cached_bookmarks`, before decoding
type RawRecord = (String, String, String, Option<String>, Option<String>);

/// SQLite cache backend
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    /// Creates a new SqliteCache instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteCache)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn save_at(
        &mut self,
        key: &CacheKey,
        records: &[BookmarkRecord],
        created_at: DateTime<Utc>,
    ) -> StorageResult<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "DELETE FROM parse_cache
             WHERE content_hash = ?1 AND rules_fingerprint = ?2 AND parser_version = ?3",
            params![key.content_hash, key.rules_fingerprint, key.parser_version],
        )?;
        tx.execute(
            "INSERT INTO parse_cache (content_hash, rules_fingerprint, parser_version, created_at, record_count)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                key.content_hash,
                key.rules_fingerprint,
                key.parser_version,
                created_at.to_rfc3339(),
                records.len() as i64
            ],
        )?;
        let cache_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO cached_bookmarks (cache_id, position, title, url, folder_path, added_at, icon)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (position, record) in records.iter().enumerate() {
                stmt.execute(params![
                    cache_id,
                    position as i64,
                    record.title,
                    record.url,
                    serde_json::to_string(&record.folder_path)?,
                    record.added_at.map(|d| d.to_rfc3339()),
                    record.icon,
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}

fn parse_time(raw: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| StorageError::Corrupt(format!("bad timestamp '{}': {}", raw, e)))
}

fn decode(raw: RawRecord) -> StorageResult<BookmarkRecord> {
    let (title, url, folder_json, added_at, icon) = raw;
    let folder_path: FolderPath = serde_json::from_str(&folder_json)?;
    let added_at = added_at.as_deref().map(parse_time).transpose()?;

    Ok(BookmarkRecord {
        title,
        url,
        folder_path,
        added_at,
        icon,
    })
}

impl BookmarkCache for SqliteCache {
    fn save(&mut self, key: &CacheKey, records: &[BookmarkRecord]) -> StorageResult<()> {
        self.save_at(key, records, Utc::now())?;
        tracing::debug!("Cached {} records", records.len());
        Ok(())
    }

    fn load(&self, key: &CacheKey) -> StorageResult<Option<Vec<BookmarkRecord>>> {
        let cache_id: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM parse_cache
                 WHERE content_hash = ?1 AND rules_fingerprint = ?2 AND parser_version = ?3",
                params![key.content_hash, key.rules_fingerprint, key.parser_version],
                |row| row.get(0),
            )
            .optional()?;

        let cache_id = match cache_id {
            Some(id) => id,
            None => return Ok(None),
        };

        let mut stmt = self.conn.prepare(
            "SELECT title, url, folder_path, added_at, icon FROM cached_bookmarks
             WHERE cache_id = ?1 ORDER BY position",
        )?;

        let rows = stmt
            .query_map(params![cache_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
            })?
            .collect::<Result<Vec<RawRecord>, _>>()?;

        let records = rows.into_iter().map(decode).collect::<StorageResult<Vec<_>>>()?;
        Ok(Some(records))
    }

    fn clear(&mut self) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM cached_bookmarks", [])?;
        let removed = tx.execute("DELETE FROM parse_cache", [])?;
        tx.commit()?;
        Ok(removed)
    }

    fn cleanup_expired(&mut self, max_age: chrono::Duration) -> StorageResult<usize> {
        let cutoff = (Utc::now() - max_age).to_rfc3339();
        let removed = self.conn.execute(
            "DELETE FROM parse_cache WHERE created_at < ?1",
            params![cutoff],
        )?;

        if removed > 0 {
            tracing::info!("Removed {} expired cache entries", removed);
        }
        Ok(removed)
    }

    fn info(&self) -> StorageResult<CacheInfo> {
        let (entries, records, oldest, newest): (i64, i64, Option<String>, Option<String>) =
            self.conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(record_count), 0), MIN(created_at), MAX(created_at)
                 FROM parse_cache",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )?;

        Ok(CacheInfo {
            entries: entries as u64,
            records: records as u64,
            oldest: oldest.as_deref().map(parse_time).transpose()?,
            newest: newest.as_deref().map(parse_time).transpose()?,
        })
    }
}
