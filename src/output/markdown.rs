//! Markdown note rendering
//!
//! This module renders one bookmark as a Markdown note with YAML front matter.
//! Page content is optional: a note for a page nobody fetched still records
//! where the bookmark came from.

use crate::bookmarks::BookmarkRecord;
use serde::Serialize;
use thiserror::Error;

/// Value of the `source` front matter key
pub const NOTE_SOURCE: &str = "bookmark-notes";

const MAX_TAG_CHARS: usize = 50;
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors that can occur while rendering a note
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format front matter: {0}")]
    Format(#[from] serde_yaml::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Content extracted from the bookmarked page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    /// Page title, if it differs from the bookmark title
    pub title: Option<String>,
    /// Article body as Markdown
    pub content: String,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub author: Option<String>,
}

/// Note lifecycle marker written to the front matter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoteStatus {
    /// Page content was captured
    Captured,
    /// Only the bookmark itself is known
    BookmarkOnly,
}

#[derive(Debug, Serialize)]
struct FrontMatter<'a> {
    title: &'a str,
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    bookmarked: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    folder: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<&'a str>,
    source: &'static str,
    status: NoteStatus,
}

/// Renders a note for one bookmark
///
/// # Arguments
///
/// * `record` - The bookmark
/// * `page` - Content extracted from the page, if it was fetched
///
/// # Returns
///
/// The complete note, front matter included
pub fn render_note(record: &BookmarkRecord, page: Option<&PageContent>) -> OutputResult<String> {
    let title = page
        .and_then(|p| p.title.as_deref())
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(&record.title);

    let tags: Vec<String> = page
        .map(|p| p.tags.iter().map(|t| clean_tag(t)).filter(|t| !t.is_empty()).collect())
        .unwrap_or_default();

    let front_matter = FrontMatter {
        title,
        url: &record.url,
        bookmarked: record.added_at.map(|d| d.to_rfc3339()),
        folder: (!record.folder_path.is_root()).then(|| record.folder_path.key()),
        tags: tags.clone(),
        description: page.and_then(|p| p.description.as_deref()),
        author: page.and_then(|p| p.author.as_deref()),
        source: NOTE_SOURCE,
        status: if page.is_some() {
            NoteStatus::Captured
        } else {
            NoteStatus::BookmarkOnly
        },
    };

    let mut md = String::new();

    md.push_str("---\n");
    md.push_str(&serde_yaml::to_string(&front_matter)?);
    md.push_str("---\n\n");

    md.push_str(&format!("# {}\n\n", title));
    md.push_str(&format!("**Source:** [{}]({})\n\n", record.url, record.url));

    if let Some(added_at) = record.added_at {
        md.push_str(&format!("**Bookmarked:** {}\n\n", added_at.format(DATE_FORMAT)));
    }

    if !record.folder_path.is_root() {
        md.push_str(&format!("**Folder:** {}\n\n", record.folder_path));
    }

    match page {
        Some(page) => {
            if !page.content.trim().is_empty() {
                md.push_str("## Content\n\n");
                md.push_str(page.content.trim());
                md.push_str("\n\n");
            }

            if !tags.is_empty() {
                md.push_str("## Tags\n\n");
                let rendered: Vec<String> = tags.iter().map(|t| format!("#{}", t)).collect();
                md.push_str(&rendered.join(" "));
                md.push_str("\n\n");
            }

            if page.description.is_some() || page.author.is_some() {
                md.push_str("## Metadata\n\n");
                if let Some(description) = &page.description {
                    md.push_str(&format!("**Description:** {}\n\n", description));
                }
                if let Some(author) = &page.author {
                    md.push_str(&format!("**Author:** {}\n\n", author));
                }
            }
        }
        None => {
            md.push_str("## Note\n\n");
            md.push_str("Page content was not captured. Open the source link to read it.\n\n");
        }
    }

    Ok(format!("{}\n", md.trim_end()))
}

/// Normalizes a tag for use as `#tag`
///
/// Whitespace runs and `/ \ . +` become `-`; anything that is not a letter,
/// digit, `-` or `_` is dropped.
pub fn clean_tag(tag: &str) -> String {
    let mut out = String::new();
    for c in tag.trim().chars() {
        if c.is_whitespace() || matches!(c, '/' | '\\' | '.' | '+') {
            if !out.ends_with('-') {
                out.push('-');
            }
        } else if c.is_alphanumeric() || c == '-' || c == '_' {
            out.push(c);
        }
    }

    out.trim_matches(|c| c == '-' || c == '_')
        .chars()
        .take(MAX_TAG_CHARS)
        .collect()
}
