//! Existing note tree handling
//!
//! This module handles:
//! - Indexing the Markdown files already present under the notes root
//! - Flagging bookmarks whose note already exists
//! - Writing new notes without overwriting anything

mod index;
mod writer;

pub use index::{find_duplicates, DuplicateReport, NoteIndex};
pub use writer::{NoteWriter, WriteFailure, WriteReport};

use crate::output::OutputError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing the note tree
#[derive(Debug, Error)]
pub enum NotesError {
    #[error("Failed to scan {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to render note: {0}")]
    Render(#[from] OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for note tree operations
pub type NotesResult<T> = Result<T, NotesError>;
