//! Entry classification
//!
//! A `<dt>` entry in a Netscape export is either a folder (a heading plus a
//! nested list) or a bookmark (a link). Browsers disagree on where the nested
//! list lives, so both shapes are recognised here:
//!
//! ```text
//! <DT><H3>Folder</H3>            <DT><H3>Folder</H3>
//! <DD><DL>...</DL>                   <DL>...</DL>       (inside the DT)
//! ```
//!
//! Classification only looks at the entry and its immediate neighbours; it
//! never recurses.

use crate::bookmarks::model::LinkData;
use chrono::{DateTime, Utc};
use scraper::ElementRef;

/// Untitled folder placeholder
const UNTITLED_FOLDER: &str = "untitled";

/// What a single `<dt>` entry turned out to be
#[derive(Debug, Clone)]
pub enum Entry<'a> {
    Folder { name: String, list: ElementRef<'a> },
    Bookmark(LinkData),
    Skip(SkipReason),
}

/// Why an entry produced nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Neither a heading nor a link
    NoMarker,
    /// Heading without any nested list
    FolderWithoutList,
    /// Link without an `href`, or with a blank one
    MissingHref,
    /// Link whose visible text is blank
    EmptyTitle,
}

impl SkipReason {
    /// Returns true if the entry carried a usable `href`
    pub fn had_link(&self) -> bool {
        matches!(self, Self::EmptyTitle)
    }
}

/// Classifies one `<dt>` entry
///
/// A heading takes precedence over a link when both are present.
pub fn classify_entry(entry: ElementRef<'_>) -> Entry<'_> {
    if let Some(heading) = child_element(entry, "h3") {
        let name = collect_text(heading);
        let name = if name.is_empty() {
            UNTITLED_FOLDER.to_string()
        } else {
            name
        };

        return match nested_list(entry) {
            Some(list) => Entry::Folder { name, list },
            None => Entry::Skip(SkipReason::FolderWithoutList),
        };
    }

    if let Some(anchor) = child_element(entry, "a") {
        return match extract_link(anchor) {
            Ok(link) => Entry::Bookmark(link),
            Err(reason) => Entry::Skip(reason),
        };
    }

    Entry::Skip(SkipReason::NoMarker)
}

/// Finds the list that holds a folder's children
///
/// Looks inside the entry first, then at the element right after it: either a
/// `<dd>` wrapping a `<dl>`, or a bare `<dl>`.
pub fn nested_list(entry: ElementRef<'_>) -> Option<ElementRef<'_>> {
    if let Some(list) = child_element(entry, "dl") {
        return Some(list);
    }

    let sibling = entry
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .next()?;

    match sibling.value().name() {
        "dd" => child_element(sibling, "dl"),
        "dl" => Some(sibling),
        _ => None,
    }
}

/// Pulls link data out of an `<a>` element
pub fn extract_link(anchor: ElementRef<'_>) -> Result<LinkData, SkipReason> {
    let url = anchor
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .ok_or(SkipReason::MissingHref)?
        .to_string();

    let title = collect_text(anchor);
    if title.is_empty() {
        return Err(SkipReason::EmptyTitle);
    }

    let added_at = anchor.value().attr("add_date").and_then(parse_timestamp);
    let icon = anchor
        .value()
        .attr("icon")
        .filter(|icon| !icon.is_empty())
        .map(str::to_string);

    Ok(LinkData {
        title,
        url,
        added_at,
        icon,
    })
}

/// Parses a Unix timestamp in seconds
///
/// Anything that is not a representable integer yields `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let secs = raw.trim().parse::<i64>().ok()?;
    DateTime::<Utc>::from_timestamp(secs, 0)
}

/// First direct child element with the given tag name
fn child_element<'a>(parent: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == name)
}

fn collect_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
