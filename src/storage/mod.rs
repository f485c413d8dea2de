//! Parse result cache
//!
//! A parse result only depends on the document, the rule set and the parser
//! build. This module caches records keyed by all three:
//! - SQLite database initialization and schema management
//! - Saving and loading records in document order
//! - Expiry and cache statistics

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteCache;
pub use traits::{BookmarkCache, StorageError, StorageResult};

use crate::rules::FilterRuleSet;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Opens or creates a cache database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteCache)` - Successfully opened cache
/// * `Err(StorageError)` - Failed to open the database
pub fn open_cache(path: &Path) -> StorageResult<SqliteCache> {
    SqliteCache::new(path)
}

/// Version of the parser that produced a cached entry
pub const PARSER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default age after which cache entries are dropped
pub const DEFAULT_MAX_AGE_DAYS: i64 = 30;

/// Identifies one parse: what was parsed, under which rules, by which build
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// SHA-256 of the document text
    pub content_hash: String,
    /// [`FilterRuleSet::fingerprint`] of the rules in effect
    pub rules_fingerprint: String,
    /// [`PARSER_VERSION`] at the time of the parse
    pub parser_version: String,
}

impl CacheKey {
    pub fn compute(html: &str, rules: &FilterRuleSet) -> Self {
        Self {
            content_hash: hex::encode(Sha256::digest(html.as_bytes())),
            rules_fingerprint: rules.fingerprint(),
            parser_version: PARSER_VERSION.to_string(),
        }
    }
}

/// Cache contents at a glance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheInfo {
    pub entries: u64,
    pub records: u64,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}
