//! Bookmark export parser
//!
//! Ties the pieces together: locate the root list, walk it into a flat list of
//! candidates, then filter. The parser owns its rule set for its whole life.

use crate::bookmarks::model::{BookmarkCandidate, BookmarkRecord};
use crate::bookmarks::pipeline::{filter_parallel, filter_sequential, FilterOutcome, ProgressFn};
use crate::bookmarks::walker::{count_anchors, find_root_list, TreeWalker, WalkStats};
use crate::bookmarks::FolderPath;
use crate::rules::{load_rules, FilterRuleSet};
use crate::{ParseError, RuleLoadError};
use scraper::Html;
use std::path::Path;

/// Marker present in the doctype of every Netscape bookmark export
const NETSCAPE_MARKER: &str = "NETSCAPE-Bookmark-file";

/// Counters describing one parse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// `<a>` elements with a non-blank `href` anywhere in the document
    pub anchors_in_document: usize,
    /// Entries classified as bookmarks
    pub candidates: usize,
    /// Candidates rejected by the filter ladder
    pub excluded: usize,
    /// Entries dropped for structural reasons
    pub skipped_entries: usize,
    /// Folders descended into
    pub folders: usize,
    /// Lists that were reached again and ignored
    pub revisited_lists: usize,
    /// Lists not entered because they were nested too deep
    pub depth_limited: usize,
}

impl ParseReport {
    fn from_walk(anchors_in_document: usize, candidates: usize, stats: &WalkStats) -> Self {
        Self {
            anchors_in_document,
            candidates,
            skipped_entries: stats.skipped_entries,
            folders: stats.folders,
            revisited_lists: stats.revisited_lists,
            depth_limited: stats.depth_limited,
            ..Self::default()
        }
    }

    /// Number of records produced
    pub fn kept(&self) -> usize {
        self.candidates - self.excluded
    }
}

/// Records plus the report that produced them
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub bookmarks: Vec<BookmarkRecord>,
    pub report: ParseReport,
}

/// Parses Netscape bookmark exports into filtered records
#[derive(Debug, Clone, Default)]
pub struct BookmarkParser {
    rules: FilterRuleSet,
}

impl BookmarkParser {
    /// Creates a parser around an already loaded rule set
    pub fn new(rules: FilterRuleSet) -> Self {
        Self { rules }
    }

    /// Creates a parser from a rule file
    ///
    /// A missing file yields the empty rule set; a malformed one is an error.
    pub fn from_rules_file(path: &Path) -> Result<Self, RuleLoadError> {
        let loaded = load_rules(path)?;
        Ok(Self::new(loaded.rules))
    }

    pub fn rules(&self) -> &FilterRuleSet {
        &self.rules
    }

    /// Parses a document into records in document order
    pub fn parse(&self, html: &str) -> Result<Vec<BookmarkRecord>, ParseError> {
        Ok(self.parse_with_report(html)?.bookmarks)
    }

    /// Parses a document, also returning its [`ParseReport`]
    pub fn parse_with_report(&self, html: &str) -> Result<ParseOutcome, ParseError> {
        let (candidates, report) = match collect_candidates(html)? {
            Some(collected) => collected,
            None => return Ok(ParseOutcome::default()),
        };

        let outcome = filter_sequential(candidates, &self.rules);
        Ok(finish(outcome, report))
    }

    /// Parses a document, running the filter phase on `workers` threads
    ///
    /// The tree walk itself always runs on the calling thread. Records come
    /// back in the same order as [`parse`](Self::parse) returns them.
    pub fn parse_parallel(
        &self,
        html: &str,
        workers: usize,
        progress: Option<&ProgressFn<'_>>,
    ) -> Result<ParseOutcome, ParseError> {
        let (candidates, report) = match collect_candidates(html)? {
            Some(collected) => collected,
            None => return Ok(ParseOutcome::default()),
        };

        let outcome = filter_parallel(candidates, &self.rules, workers, progress)?;
        Ok(finish(outcome, report))
    }
}

/// Phase 1: document structure to a flat candidate list
///
/// Returns `None` for documents that are valid but hold no list at all.
fn collect_candidates(html: &str) -> Result<Option<(Vec<BookmarkCandidate>, ParseReport)>, ParseError> {
    if html.trim().is_empty() {
        tracing::info!("Empty bookmark document");
        return Ok(None);
    }

    let document = Html::parse_document(html);

    let root = match find_root_list(&document) {
        Some(root) => root,
        None if html.contains(NETSCAPE_MARKER) => {
            tracing::info!("Bookmark export contains no bookmarks");
            return Ok(None);
        }
        None => return Err(ParseError::NoRootList),
    };

    tracing::info!("Parsing bookmark document ({} bytes)", html.len());

    let mut walker = TreeWalker::new();
    walker.walk_list(root, &FolderPath::root());
    let (candidates, stats) = walker.finish();

    let anchors = count_anchors(&document);
    let accounted = candidates.len() + stats.skipped_links;
    if accounted != anchors {
        tracing::warn!(
            "Anchor count mismatch: {} links in document, {} accounted for",
            anchors,
            accounted
        );
    }

    let report = ParseReport::from_walk(anchors, candidates.len(), &stats);
    Ok(Some((candidates, report)))
}

fn finish(outcome: FilterOutcome, mut report: ParseReport) -> ParseOutcome {
    report.excluded = outcome.excluded;

    tracing::info!(
        "Parsed {} bookmarks ({} candidates, {} excluded, {} skipped, {} folders)",
        outcome.records.len(),
        report.candidates,
        report.excluded,
        report.skipped_entries,
        report.folders
    );

    ParseOutcome {
        bookmarks: outcome.records,
        report,
    }
}
