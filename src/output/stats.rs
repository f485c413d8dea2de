//! Statistics and directory structure summary
//!
//! This module aggregates parsed bookmarks into the folder layout the notes
//! will have, plus a few counts, and prints them for the `--stats` mode.

use crate::bookmarks::{BookmarkRecord, ParseReport};
use crate::output::filename::sanitize_filename;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Bookmark summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkSummary {
    /// Folder path (segments joined by `/`, root is `""`) to file stems, in
    /// document order
    pub structure: BTreeMap<String, Vec<String>>,

    /// Total number of bookmarks
    pub total_bookmarks: usize,

    /// Number of distinct hosts
    pub unique_hosts: usize,

    /// Number of distinct non-root folder paths
    pub folder_count: usize,
}

/// Summarizes parsed bookmarks
///
/// # Arguments
///
/// * `bookmarks` - Records in document order
///
/// # Returns
///
/// The directory structure and counts
pub fn summarize(bookmarks: &[BookmarkRecord]) -> BookmarkSummary {
    let mut structure: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut hosts = HashSet::new();
    let mut folders = BTreeSet::new();

    for bookmark in bookmarks {
        let key = bookmark.folder_path.key();
        structure
            .entry(key.clone())
            .or_default()
            .push(sanitize_filename(&bookmark.title));

        if !bookmark.folder_path.is_root() {
            folders.insert(key);
        }

        if let Some(host) = bookmark.host() {
            hosts.insert(host);
        }
    }

    BookmarkSummary {
        structure,
        total_bookmarks: bookmarks.len(),
        unique_hosts: hosts.len(),
        folder_count: folders.len(),
    }
}

/// Prints a summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The summary to display
/// * `report` - Counters from the parse that produced it
pub fn print_statistics(summary: &BookmarkSummary, report: &ParseReport) {
    println!("=== Bookmark Statistics ===\n");

    println!("Overview:");
    println!("  Bookmarks kept: {}", summary.total_bookmarks);
    println!("  Unique hosts: {}", summary.unique_hosts);
    println!("  Folders: {}", summary.folder_count);
    println!();

    println!("Parse:");
    println!("  Links in document: {}", report.anchors_in_document);
    println!("  Bookmark entries: {}", report.candidates);
    println!("  Excluded by rules: {}", report.excluded);
    println!("  Skipped entries: {}", report.skipped_entries);
    if report.revisited_lists > 0 {
        println!("  Lists reached twice: {}", report.revisited_lists);
    }
    if report.depth_limited > 0 {
        println!("  Lists nested too deep: {}", report.depth_limited);
    }
    println!();

    if !summary.structure.is_empty() {
        println!("Directory Structure:");
        for (folder, files) in &summary.structure {
            let label = if folder.is_empty() { "(root)" } else { folder };
            println!("  {}/ ({} files)", label, files.len());
        }
        println!();
    }

    let keep_rate = if report.candidates > 0 {
        (summary.total_bookmarks as f64 / report.candidates as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Keep Rate: {:.1}% ({} / {} bookmark entries)",
        keep_rate, summary.total_bookmarks, report.candidates
    );
}
