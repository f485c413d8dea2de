//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the parse cache.

/// SQL schema for the cache database
pub const SCHEMA_SQL: &str = r#"
-- One row per cached parse
CREATE TABLE IF NOT EXISTS parse_cache (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content_hash TEXT NOT NULL,
    rules_fingerprint TEXT NOT NULL,
    parser_version TEXT NOT NULL,
    created_at TEXT NOT NULL,
    record_count INTEGER NOT NULL,
    UNIQUE(content_hash, rules_fingerprint, parser_version)
);

CREATE INDEX IF NOT EXISTS idx_parse_cache_created ON parse_cache(created_at);

-- Records of a cached parse, in document order
CREATE TABLE IF NOT EXISTS cached_bookmarks (
    cache_id INTEGER NOT NULL REFERENCES parse_cache(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    title TEXT NOT NULL,
    url TEXT NOT NULL,
    folder_path TEXT NOT NULL,
    added_at TEXT,
    icon TEXT,
    PRIMARY KEY (cache_id, position)
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_schema(&conn).unwrap();
        let result = initialize_schema(&conn);

        assert!(result.is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in ["parse_cache", "cached_bookmarks"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table {} should exist", table);
        }
    }
}
