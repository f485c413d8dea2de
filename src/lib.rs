//! Bookmark-Notes: turns a browser bookmark export into Markdown notes
//!
//! This crate parses Netscape bookmark HTML into folder-aware bookmark records,
//! filters out URLs that are not worth keeping, detects bookmarks that already
//! have a note on disk, and renders the rest as Markdown with YAML front matter.

pub mod bookmarks;
pub mod notes;
pub mod output;
pub mod rules;
pub mod storage;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Bookmark-Notes operations
#[derive(Debug, Error)]
pub enum BookmarkError {
    #[error("Rule load error: {0}")]
    Rules(#[from] RuleLoadError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Notes error: {0}")]
    Notes(#[from] notes::NotesError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rule document errors
///
/// Any of these aborts parser construction.
#[derive(Debug, Error)]
pub enum RuleLoadError {
    #[error("Failed to read rule file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid deny pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Non-fatal condition: the rule file does not exist
///
/// Returned alongside the empty fallback rule set so the caller can log it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Rule file not found: {}", path.display())]
pub struct RuleSourceMissing {
    pub path: PathBuf,
}

/// Document-level parse errors
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("No bookmark list found in document")]
    NoRootList,

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing scheme in URL")]
    MissingScheme,

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Bookmark-Notes operations
pub type Result<T> = std::result::Result<T, BookmarkError>;

/// Result type alias for rule loading
pub type RuleResult<T> = std::result::Result<T, RuleLoadError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use bookmarks::{BookmarkParser, BookmarkRecord, FolderPath, ParseOutcome, ParseReport};
pub use output::{sanitize_filename, summarize, BookmarkSummary};
pub use rules::{load_rules, FilterRuleSet, LoadedRules};
pub use crate::url::{evaluate, should_exclude, FilterDecision};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_convert_into_umbrella() {
        let err: BookmarkError = ParseError::NoRootList.into();
        assert!(matches!(err, BookmarkError::Parse(ParseError::NoRootList)));
        assert_eq!(err.to_string(), "Parse error: No bookmark list found in document");

        let err: BookmarkError = RuleLoadError::Validation("bad".to_string()).into();
        assert_eq!(err.to_string(), "Rule load error: Validation error: bad");
    }
}
