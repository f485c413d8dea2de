//! Integration tests for the bookmark pipeline
//!
//! These tests run a realistic browser export through the public API:
//! rule loading, parsing, summarizing, duplicate detection and note writing.

use bookmark_notes::bookmarks::{BookmarkParser, BookmarkRecord};
use bookmark_notes::notes::{find_duplicates, NoteIndex, NoteWriter};
use bookmark_notes::output::{summarize, NoteLayout};
use bookmark_notes::rules::load_rules;
use bookmark_notes::storage::{open_cache, BookmarkCache, CacheKey};
use std::path::Path;
use tempfile::TempDir;

const CHROME_EXPORT: &str = include_str!("../fixtures/chrome_export.html");

fn fixture_parser() -> BookmarkParser {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/filter_rules.toml");
    let loaded = load_rules(&path).unwrap();
    assert!(!loaded.is_fallback());
    BookmarkParser::new(loaded.rules)
}

fn titles(records: &[BookmarkRecord]) -> Vec<&str> {
    records.iter().map(|r| r.title.as_str()).collect()
}

#[test]
fn test_chrome_export_is_filtered_and_ordered() {
    let outcome = fixture_parser().parse_with_report(CHROME_EXPORT).unwrap();

    assert_eq!(
        titles(&outcome.bookmarks),
        vec![
            "What is Ownership? - The Rust Programming Language",
            "Qiita: async Rust",
            "Rust tips",
        ]
    );

    let report = outcome.report;
    assert_eq!(report.anchors_in_document, 11);
    assert_eq!(report.candidates, 11);
    assert_eq!(report.excluded, 8);
    assert_eq!(report.folders, 4);
    assert_eq!(report.skipped_entries, 0);
    assert_eq!(report.revisited_lists, 0);
}

#[test]
fn test_chrome_export_fields() {
    let records = fixture_parser().parse(CHROME_EXPORT).unwrap();

    let ownership = &records[0];
    assert_eq!(
        ownership.url,
        "https://doc.rust-lang.org/book/ch04-01-what-is-ownership.html"
    );
    assert_eq!(ownership.folder_path.segments(), ["Bookmarks bar", "Dev"]);
    assert_eq!(ownership.added_at.map(|d| d.timestamp()), Some(1_640_995_200));
    assert_eq!(ownership.icon.as_deref(), Some("data:image/png;base64,iVBORw0KGgo="));

    // Non-numeric timestamps degrade to None
    assert_eq!(records[1].added_at, None);

    assert_eq!(records[2].folder_path.segments(), ["Bookmarks bar", "Dev", "Rust"]);
}

#[test]
fn test_parsing_is_idempotent() {
    let parser = fixture_parser();
    let first = parser.parse(CHROME_EXPORT).unwrap();
    let second = parser.parse(CHROME_EXPORT).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_paragraph_wrappers_do_not_change_paths() {
    let parser = fixture_parser();
    let with_p = parser
        .parse(
            r#"<DL><p>
<DT><H3>A</H3>
<DL><p>
    <DT><H3>B</H3>
    <DL><p>
        <DT><A HREF="https://qiita.com/x/items/1">Deep</A>
    </DL><p>
</DL><p>
</DL><p>"#,
        )
        .unwrap();
    let without_p = parser
        .parse(
            r#"<DL>
<DT><H3>A</H3>
<DD><DL>
    <DT><H3>B</H3>
    <DD><DL>
        <DT><A HREF="https://qiita.com/x/items/1">Deep</A>
    </DL></DD>
</DL></DD>
</DL>"#,
        )
        .unwrap();

    assert_eq!(with_p.len(), 1);
    assert_eq!(with_p, without_p);
    assert_eq!(with_p[0].folder_path.segments(), ["A", "B"]);
}

#[test]
fn test_parallel_parse_matches_sequential() {
    let parser = fixture_parser();
    let sequential = parser.parse_with_report(CHROME_EXPORT).unwrap();
    let parallel = parser.parse_parallel(CHROME_EXPORT, 3, None).unwrap();

    assert_eq!(sequential.bookmarks, parallel.bookmarks);
    assert_eq!(sequential.report, parallel.report);
}

#[test]
fn test_missing_rule_file_keeps_nothing() {
    let dir = TempDir::new().unwrap();
    let loaded = load_rules(&dir.path().join("filter_rules.toml")).unwrap();
    assert!(loaded.is_fallback());

    let parser = BookmarkParser::new(loaded.rules);
    let outcome = parser.parse_with_report(CHROME_EXPORT).unwrap();

    assert!(outcome.bookmarks.is_empty());
    assert_eq!(outcome.report.candidates, 11);
}

#[test]
fn test_summary_of_export() {
    let records = fixture_parser().parse(CHROME_EXPORT).unwrap();
    let summary = summarize(&records);

    assert_eq!(summary.total_bookmarks, 3);
    assert_eq!(summary.unique_hosts, 3);
    assert_eq!(summary.folder_count, 2);
    assert_eq!(
        summary.structure["Bookmarks bar/Dev"],
        vec![
            "What is Ownership_ - The Rust Programming Language".to_string(),
            "Qiita_ async Rust".to_string(),
        ]
    );
    assert_eq!(summary.structure["Bookmarks bar/Dev/Rust"], vec!["Rust tips".to_string()]);
}

#[test]
fn test_write_then_detect_duplicates() {
    let notes = TempDir::new().unwrap();
    let records = fixture_parser().parse(CHROME_EXPORT).unwrap();
    let layout = NoteLayout::default();

    let index = NoteIndex::scan(notes.path()).unwrap();
    let duplicates = find_duplicates(&records, &index, &layout);
    assert!(duplicates.is_empty());

    let writer = NoteWriter::new(notes.path(), layout.clone());
    let report = writer.write_all(&records, &duplicates);
    assert_eq!(report.written.len(), 3);
    assert!(notes.path().join("Bookmarks bar/Dev/Rust/Rust tips.md").exists());

    // A second run finds every note it wrote
    let index = NoteIndex::scan(notes.path()).unwrap();
    let duplicates = find_duplicates(&records, &index, &layout);
    assert_eq!(duplicates.count(), 3);

    let report = writer.write_all(&records, &duplicates);
    assert!(report.written.is_empty());
    assert_eq!(report.skipped_duplicates, 3);
}

#[test]
fn test_cache_round_trip() {
    let dir = TempDir::new().unwrap();
    let parser = fixture_parser();
    let records = parser.parse(CHROME_EXPORT).unwrap();
    let key = CacheKey::compute(CHROME_EXPORT, parser.rules());

    let mut cache = open_cache(&dir.path().join("cache.db")).unwrap();
    assert_eq!(cache.load(&key).unwrap(), None);

    cache.save(&key, &records).unwrap();
    assert_eq!(cache.load(&key).unwrap(), Some(records));
}
