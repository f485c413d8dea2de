//! Bookmark tree parsing
//!
//! This module turns a Netscape bookmark export into an ordered sequence of
//! [`BookmarkRecord`]s:
//! - [`classify`] decides what a single entry is, without recursing
//! - [`walker`] drives the recursive descent and guards against revisits
//! - [`pipeline`] filters the flattened candidates, optionally in parallel
//! - [`parser`] ties these together behind [`BookmarkParser`]

pub mod classify;
mod model;
mod parser;
pub mod pipeline;
pub mod walker;

pub use classify::{classify_entry, Entry, SkipReason};
pub use model::{BookmarkCandidate, BookmarkRecord, FolderPath, LinkData};
pub use parser::{BookmarkParser, ParseOutcome, ParseReport};
pub use pipeline::{FilterOutcome, ProgressFn};
pub use walker::{TreeWalker, WalkStats, MAX_LIST_DEPTH};
