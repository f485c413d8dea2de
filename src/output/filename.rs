//! File and folder naming
//!
//! Every place that turns a bookmark into a path goes through this module, so
//! the duplicate detector and the note writer always agree on names.

use crate::bookmarks::{BookmarkRecord, FolderPath};

/// Characters that are illegal in file names on at least one common platform
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Fallback stem for titles that sanitize to nothing
pub const UNTITLED: &str = "untitled";

const MAX_FILENAME_CHARS: usize = 200;
const MAX_FOLDER_CHARS: usize = 100;

const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Replaces illegal characters with `_` and collapses runs of `_`
fn replace_illegal(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if ILLEGAL_CHARS.contains(&c) { '_' } else { c };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out
}

fn truncate_chars(name: &str, max: usize) -> String {
    name.chars().take(max).collect()
}

/// Derives a file stem from a bookmark title
///
/// Deterministic; never returns an empty string.
///
/// ```
/// use bookmark_notes::sanitize_filename;
///
/// assert_eq!(sanitize_filename("a/b: c?"), "a_b_ c");
/// assert_eq!(sanitize_filename("???"), "untitled");
/// ```
pub fn sanitize_filename(title: &str) -> String {
    let replaced = replace_illegal(title);
    let trimmed = replaced.trim_matches(|c| c == ' ' || c == '_');
    let capped = truncate_chars(trimmed, MAX_FILENAME_CHARS);

    if capped.is_empty() {
        UNTITLED.to_string()
    } else {
        capped
    }
}

/// Derives a directory name from a folder name
///
/// Returns an empty string when nothing usable is left; callers drop such
/// segments.
pub fn sanitize_folder_name(name: &str) -> String {
    let replaced = replace_illegal(name);
    let trimmed = replaced.trim_matches(|c| c == ' ' || c == '_' || c == '.');
    let capped = truncate_chars(trimmed, MAX_FOLDER_CHARS);

    if RESERVED_NAMES.contains(&capped.to_uppercase().as_str()) {
        format!("_{}", capped)
    } else {
        capped
    }
}

/// Path-length aware stem fitting
///
/// The numbers are a heuristic for staying under Windows' classic path limit
/// once the stem lands under an output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenamePolicy {
    pub max_path_len: usize,
    /// Assumed length of the output directory itself
    pub base_path_estimate: usize,
    pub extension: String,
    pub min_len: usize,
    /// Appended to cut stems
    pub marker: String,
}

impl Default for FilenamePolicy {
    fn default() -> Self {
        Self {
            max_path_len: 260,
            base_path_estimate: 50,
            extension: ".md".to_string(),
            min_len: 20,
            marker: "...".to_string(),
        }
    }
}

impl FilenamePolicy {
    /// Longest stem allowed under the given folder key
    pub fn budget(&self, folder_key: &str) -> usize {
        let reserved = self.base_path_estimate + folder_key.chars().count() + 1 + self.extension.len();
        self.max_path_len
            .saturating_sub(reserved)
            .clamp(self.min_len, MAX_FILENAME_CHARS)
    }

    /// Cuts a stem to the budget, ending it with the marker when cut
    pub fn fit(&self, stem: &str, folder_key: &str) -> String {
        let budget = self.budget(folder_key);
        if stem.chars().count() <= budget {
            return stem.to_string();
        }

        let keep = budget.saturating_sub(self.marker.chars().count());
        let head: String = stem.chars().take(keep).collect();
        format!("{}{}", head.trim_end(), self.marker)
    }
}

/// Where a bookmark's note lives, relative to the notes root
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotePath {
    /// Sanitized folder segments
    pub folders: Vec<String>,
    /// Fitted file stem, without extension
    pub stem: String,
}

impl NotePath {
    /// Folder segments joined with `/`; the root is the empty string
    pub fn folder_key(&self) -> String {
        self.folders.join("/")
    }
}

/// Single naming authority for notes on disk
#[derive(Debug, Clone, Default)]
pub struct NoteLayout {
    policy: FilenamePolicy,
}

impl NoteLayout {
    pub fn new(policy: FilenamePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &FilenamePolicy {
        &self.policy
    }

    pub fn extension(&self) -> &str {
        &self.policy.extension
    }

    /// Sanitized directory segments, with empty ones dropped
    pub fn folder_segments(&self, path: &FolderPath) -> Vec<String> {
        path.segments()
            .iter()
            .map(|segment| sanitize_folder_name(segment))
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    pub fn note_path(&self, record: &BookmarkRecord) -> NotePath {
        let folders = self.folder_segments(&record.folder_path);
        let folder_key = folders.join("/");
        let stem = self.policy.fit(&record.filename(), &folder_key);
        NotePath { folders, stem }
    }
}
