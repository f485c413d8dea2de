//! Note writer

use crate::bookmarks::BookmarkRecord;
use crate::notes::{DuplicateReport, NotesResult};
use crate::output::{render_note, NoteLayout, PageContent};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

/// Numbered suffixes tried before falling back to a timestamp
const MAX_SUFFIX: u32 = 999;

/// A note that could not be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    pub url: String,
    pub error: String,
}

/// Outcome of writing a batch of notes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Paths of the notes written, in bookmark order
    pub written: Vec<PathBuf>,
    pub skipped_duplicates: usize,
    pub failures: Vec<WriteFailure>,
}

/// Writes notes below a root directory
#[derive(Debug, Clone)]
pub struct NoteWriter {
    root: PathBuf,
    layout: NoteLayout,
}

impl NoteWriter {
    pub fn new(root: impl Into<PathBuf>, layout: NoteLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory a bookmark's note goes into
    pub fn directory_for(&self, record: &BookmarkRecord) -> PathBuf {
        self.layout
            .folder_segments(&record.folder_path)
            .iter()
            .fold(self.root.clone(), |dir, segment| dir.join(segment))
    }

    /// Renders and writes one note, never replacing an existing file
    pub fn write_note(&self, record: &BookmarkRecord, page: Option<&PageContent>) -> NotesResult<PathBuf> {
        let note = render_note(record, page)?;
        let dir = self.directory_for(record);
        fs::create_dir_all(&dir)?;

        let stem = self.layout.note_path(record).stem;
        let path = dir.join(unique_file_name(&dir, &stem, self.layout.extension()));
        fs::write(&path, note)?;

        tracing::debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Writes a note for every bookmark not flagged as a duplicate
    ///
    /// A failed note is recorded and the batch continues.
    pub fn write_all(&self, bookmarks: &[BookmarkRecord], duplicates: &DuplicateReport) -> WriteReport {
        let mut report = WriteReport::default();

        for (i, bookmark) in bookmarks.iter().enumerate() {
            if duplicates.is_duplicate(i) {
                report.skipped_duplicates += 1;
                continue;
            }

            match self.write_note(bookmark, None) {
                Ok(path) => report.written.push(path),
                Err(e) => {
                    tracing::warn!("Failed to write note for {}: {}", bookmark.url, e);
                    report.failures.push(WriteFailure {
                        url: bookmark.url.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Wrote {} notes ({} duplicates skipped, {} failed)",
            report.written.len(),
            report.skipped_duplicates,
            report.failures.len()
        );

        report
    }
}

/// First free file name for `stem` in `dir`
///
/// Tries `stem.ext`, then `stem_001.ext` through `stem_999.ext`, then a
/// timestamped name.
fn unique_file_name(dir: &Path, stem: &str, extension: &str) -> String {
    let original = format!("{}{}", stem, extension);
    if !dir.join(&original).exists() {
        return original;
    }

    for n in 1..=MAX_SUFFIX {
        let candidate = format!("{}_{:03}{}", stem, n, extension);
        if !dir.join(&candidate).exists() {
            tracing::info!("{} exists, using {}", original, candidate);
            return candidate;
        }
    }

    let fallback = format!("{}_{}{}", stem, Utc::now().format("%Y%m%d_%H%M%S"), extension);
    tracing::warn!("Ran out of numbered names for {}, using {}", original, fallback);
    fallback
}
