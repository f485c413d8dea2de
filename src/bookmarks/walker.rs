//! Recursive descent over the bookmark list tree
//!
//! The walker reconstructs folder paths and collects bookmark candidates; it
//! does no filtering. Each `<dl>` is processed at most once, keyed by its node
//! id in the parsed document, so a list that is reachable along two different
//! paths in a malformed export is neither duplicated nor looped over.

use crate::bookmarks::classify::{classify_entry, Entry};
use crate::bookmarks::model::{BookmarkCandidate, FolderPath};
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Lists nested deeper than this are not descended into
pub const MAX_LIST_DEPTH: usize = 256;

/// Heading text browsers put above the root list
const ROOT_HEADING: &str = "Bookmarks";

/// Counters gathered during a walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Folders descended into
    pub folders: usize,
    /// Entries that yielded neither a folder nor a bookmark
    pub skipped_entries: usize,
    /// Skipped entries that still carried a usable href
    pub skipped_links: usize,
    /// Lists reached a second time and ignored
    pub revisited_lists: usize,
    /// Lists not entered because of the depth limit
    pub depth_limited: usize,
}

/// Collects bookmark candidates from a parsed export
#[derive(Debug, Default)]
pub struct TreeWalker {
    visited: HashSet<NodeId>,
    candidates: Vec<BookmarkCandidate>,
    stats: WalkStats,
}

impl TreeWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks a list and everything below it
    ///
    /// Calling this again with a list that was already walked is a no-op.
    pub fn walk_list(&mut self, list: ElementRef<'_>, path: &FolderPath) {
        self.walk_at_depth(list, path, 0);
    }

    fn walk_at_depth(&mut self, list: ElementRef<'_>, path: &FolderPath, depth: usize) {
        if depth >= MAX_LIST_DEPTH {
            tracing::warn!("Folder nesting deeper than {} at {}; not descending", MAX_LIST_DEPTH, path);
            self.stats.depth_limited += 1;
            return;
        }

        if !self.visited.insert(list.id()) {
            tracing::trace!("List under {} already processed", path);
            self.stats.revisited_lists += 1;
            return;
        }

        tracing::debug!("Descending into {}", path);

        for entry in direct_entries(list) {
            match classify_entry(entry) {
                Entry::Folder { name, list: nested } => {
                    tracing::debug!("Found folder: {}", name);
                    self.stats.folders += 1;
                    let child_path = path.child(name);
                    self.walk_at_depth(nested, &child_path, depth + 1);
                }
                Entry::Bookmark(link) => {
                    self.candidates.push(BookmarkCandidate {
                        folder_path: path.clone(),
                        link,
                    });
                }
                Entry::Skip(reason) => {
                    tracing::debug!("Skipping entry under {}: {:?}", path, reason);
                    self.stats.skipped_entries += 1;
                    if reason.had_link() {
                        self.stats.skipped_links += 1;
                    }
                }
            }
        }
    }

    pub fn candidates(&self) -> &[BookmarkCandidate] {
        &self.candidates
    }

    pub fn stats(&self) -> &WalkStats {
        &self.stats
    }

    /// Consumes the walker, returning candidates in document order
    pub fn finish(self) -> (Vec<BookmarkCandidate>, WalkStats) {
        (self.candidates, self.stats)
    }
}

/// Enumerates the entries that belong directly to a list
///
/// Entries are `<dt>` children of the list, or `<dt>` elements wrapped in a
/// `<p>` child of the list. A wrapped entry is only counted if the list is
/// still its nearest enclosing `<dl>`.
pub fn direct_entries(list: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let list_id = list.id();
    let mut entries = Vec::new();

    for child in list.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "dt" => entries.push(child),
            "p" => {
                entries.extend(
                    child
                        .children()
                        .filter_map(ElementRef::wrap)
                        .filter(|e| e.value().name() == "dt")
                        .filter(|e| nearest_list_id(*e) == Some(list_id)),
                );
            }
            _ => {}
        }
    }

    entries
}

/// Node id of the closest `<dl>` ancestor
fn nearest_list_id(element: ElementRef<'_>) -> Option<NodeId> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "dl")
        .map(|a| a.id())
}

/// Finds the top-level bookmark list
///
/// Prefers the `<dl>` right after an `<h1>Bookmarks</h1>` heading and falls
/// back to the first `<dl>` in the document.
pub fn find_root_list(document: &Html) -> Option<ElementRef<'_>> {
    let h1 = Selector::parse("h1").ok()?;
    let dl = Selector::parse("dl").ok()?;

    let heading = document
        .select(&h1)
        .find(|h| h.text().collect::<String>().trim() == ROOT_HEADING);
    let after_heading = heading.and_then(|h| {
        h.next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|s| s.value().name() == "dl")
    });

    let first = document.select(&dl).next();
    after_heading.or(first)
}

/// Counts `<a>` elements carrying a non-blank `href`
pub fn count_anchors(document: &Html) -> usize {
    match Selector::parse("a[href]") {
        Ok(selector) => document
            .select(&selector)
            .filter(|a| {
                a.value()
                    .attr("href")
                    .map_or(false, |href| !href.trim().is_empty())
            })
            .count(),
        Err(_) => 0,
    }
}
