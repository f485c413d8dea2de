//! Note tree index and duplicate detection

use crate::bookmarks::BookmarkRecord;
use crate::notes::{NotesError, NotesResult};
use crate::output::NoteLayout;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const NOTE_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Markdown file stems found under a notes root, grouped by directory
///
/// Directory keys are relative to the root with segments joined by `/`; the
/// root itself is `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteIndex {
    root: PathBuf,
    files: BTreeMap<String, BTreeSet<String>>,
}

impl NoteIndex {
    /// An index with nothing in it
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: BTreeMap::new(),
        }
    }

    /// Walks `root` and records every note file below it
    ///
    /// A root that does not exist yet yields an empty index.
    pub fn scan(root: &Path) -> NotesResult<Self> {
        let mut index = Self::empty(root);

        if !root.exists() {
            tracing::debug!("Notes root {} does not exist yet", root.display());
            return Ok(index);
        }
        if !root.is_dir() {
            return Err(NotesError::NotADirectory(root.to_path_buf()));
        }

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.map_err(|source| NotesError::Scan {
                path: root.to_path_buf(),
                source,
            })?;

            if !entry.file_type().is_file() || !is_note_file(entry.path()) {
                continue;
            }

            let stem = match entry.path().file_stem() {
                Some(stem) => stem.to_string_lossy().into_owned(),
                None => continue,
            };
            let folder_key = entry
                .path()
                .parent()
                .and_then(|dir| dir.strip_prefix(root).ok())
                .map(relative_key)
                .unwrap_or_default();

            index.insert(&folder_key, &stem);
        }

        tracing::info!(
            "Indexed {} notes in {} directories under {}",
            index.file_count(),
            index.directory_count(),
            root.display()
        );

        Ok(index)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn insert(&mut self, folder_key: &str, stem: &str) {
        self.files
            .entry(folder_key.to_string())
            .or_default()
            .insert(stem.to_string());
    }

    pub fn contains(&self, folder_key: &str, stem: &str) -> bool {
        self.files
            .get(folder_key)
            .map_or(false, |stems| stems.contains(stem))
    }

    pub fn file_count(&self) -> usize {
        self.files.values().map(BTreeSet::len).sum()
    }

    pub fn directory_count(&self) -> usize {
        self.files.len()
    }
}

fn is_note_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map_or(false, |ext| NOTE_EXTENSIONS.contains(&ext.as_str()))
}

fn relative_key(dir: &Path) -> String {
    dir.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Bookmarks that already have a note on disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateReport {
    flagged: BTreeSet<usize>,
    /// `folder/stem` of each duplicate, in bookmark order
    pub files: Vec<String>,
}

impl DuplicateReport {
    /// Returns true if the bookmark at `index` already has a note
    pub fn is_duplicate(&self, index: usize) -> bool {
        self.flagged.contains(&index)
    }

    pub fn count(&self) -> usize {
        self.flagged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flagged.is_empty()
    }
}

/// Flags bookmarks whose note path is already taken
pub fn find_duplicates(
    bookmarks: &[BookmarkRecord],
    index: &NoteIndex,
    layout: &NoteLayout,
) -> DuplicateReport {
    let mut report = DuplicateReport::default();

    for (i, bookmark) in bookmarks.iter().enumerate() {
        let path = layout.note_path(bookmark);
        let folder_key = path.folder_key();

        if index.contains(&folder_key, &path.stem) {
            let file = if folder_key.is_empty() {
                path.stem.clone()
            } else {
                format!("{}/{}", folder_key, path.stem)
            };
            tracing::debug!("Duplicate: {}", file);
            report.flagged.insert(i);
            report.files.push(file);
        }
    }

    tracing::info!(
        "Duplicate check: {} of {} bookmarks already have notes",
        report.count(),
        bookmarks.len()
    );

    report
}
