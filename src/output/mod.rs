//! Output module for turning bookmarks into notes
//!
//! This module handles:
//! - Deriving file and folder names from bookmark titles and folders
//! - Summarizing bookmarks into a directory structure with counts
//! - Rendering Markdown notes with YAML front matter

mod filename;
mod markdown;
pub mod stats;

pub use filename::{
    sanitize_filename, sanitize_folder_name, FilenamePolicy, NoteLayout, NotePath, UNTITLED,
};
pub use markdown::{
    clean_tag, render_note, NoteStatus, OutputError, OutputResult, PageContent, NOTE_SOURCE,
};
pub use stats::{print_statistics, summarize, BookmarkSummary};
