//! Bookmark data model

use crate::output::sanitize_filename;
use crate::url::{extract_host, parse_candidate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Folder names from the export root down to the containing folder
///
/// Equality is element-wise and order-sensitive; the empty path is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderPath(Vec<String>);

impl FolderPath {
    /// The root folder
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns a new path one level deeper
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Segments joined with `/`; the root is the empty string
    pub fn key(&self) -> String {
        self.0.join("/")
    }
}

impl From<Vec<String>> for FolderPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[&str]> for FolderPath {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "(root)")
        } else {
            write!(f, "{}", self.0.join(" > "))
        }
    }
}

/// One bookmark that survived filtering
///
/// Records are only created for URLs the filter ladder kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub title: String,
    pub url: String,
    pub folder_path: FolderPath,
    pub added_at: Option<DateTime<Utc>>,
    /// Opaque icon value, usually a data URI
    pub icon: Option<String>,
}

impl BookmarkRecord {
    /// Lowercased host of the URL
    pub fn host(&self) -> Option<String> {
        parse_candidate(&self.url)
            .ok()
            .and_then(|url| extract_host(&url))
    }

    /// File stem derived from the title
    pub fn filename(&self) -> String {
        sanitize_filename(&self.title)
    }
}

/// Link data pulled out of a bookmark entry, before filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkData {
    pub title: String,
    pub url: String,
    pub added_at: Option<DateTime<Utc>>,
    pub icon: Option<String>,
}

/// A classified bookmark entry together with its folder, awaiting the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkCandidate {
    pub folder_path: FolderPath,
    pub link: LinkData,
}

impl BookmarkCandidate {
    pub fn into_record(self) -> BookmarkRecord {
        BookmarkRecord {
            title: self.link.title,
            url: self.link.url,
            folder_path: self.folder_path,
            added_at: self.link.added_at,
            icon: self.link.icon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_path_key() {
        assert_eq!(FolderPath::root().key(), "");
        let path = FolderPath::root().child("Dev").child("Rust");
        assert_eq!(path.key(), "Dev/Rust");
        assert_eq!(path.depth(), 2);
        assert_eq!(path.to_string(), "Dev > Rust");
    }

    #[test]
    fn test_folder_path_equality_is_order_sensitive() {
        let ab = FolderPath::from(&["A", "B"][..]);
        let ba = FolderPath::from(&["B", "A"][..]);
        assert_ne!(ab, ba);
        assert_eq!(ab, FolderPath::root().child("A").child("B"));
    }

    #[test]
    fn test_child_does_not_mutate_parent() {
        let parent = FolderPath::root().child("A");
        let _child = parent.child("B");
        assert_eq!(parent.segments(), ["A"]);
    }

    #[test]
    fn test_record_host_and_filename() {
        let record = BookmarkRecord {
            title: "Rust: The Book".to_string(),
            url: "https://Doc.Rust-Lang.org/book/".to_string(),
            folder_path: FolderPath::root(),
            added_at: None,
            icon: None,
        };
        assert_eq!(record.host(), Some("doc.rust-lang.org".to_string()));
        assert_eq!(record.filename(), "Rust_ The Book");
    }

    #[test]
    fn test_candidate_into_record() {
        let candidate = BookmarkCandidate {
            folder_path: FolderPath::root().child("Dev"),
            link: LinkData {
                title: "T".to_string(),
                url: "https://x.com/a".to_string(),
                added_at: None,
                icon: Some("data:image/png;base64,AAAA".to_string()),
            },
        };
        let record = candidate.into_record();
        assert_eq!(record.folder_path.key(), "Dev");
        assert_eq!(record.icon.as_deref(), Some("data:image/png;base64,AAAA"));
    }
}
