use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn cmd_in(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bookmark-notes");
    cmd.current_dir(dir.path());
    cmd
}

#[test]
fn stats_prints_summary() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir)
        .arg(fixture("chrome_export.html"))
        .arg("--rules")
        .arg(fixture("filter_rules.toml"))
        .arg("--stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bookmarks kept: 3"))
        .stdout(predicate::str::contains("Excluded by rules: 8"))
        .stdout(predicate::str::contains("Bookmarks bar/Dev/ (2 files)"));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir)
        .arg(fixture("chrome_export.html"))
        .arg("--rules")
        .arg(fixture("filter_rules.toml"))
        .args(["--output", "notes", "--dry-run", "--no-cache"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would write (3):"))
        .stdout(predicate::str::contains("Bookmarks bar/Dev/Rust/Rust tips.md"));

    assert!(!dir.path().join("notes").exists());
}

#[test]
fn write_creates_notes_and_cache() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir)
        .arg(fixture("chrome_export.html"))
        .arg("--rules")
        .arg(fixture("filter_rules.toml"))
        .args(["--output", "notes", "--workers", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 3 notes"));

    let note = fs::read_to_string(dir.path().join("notes/Bookmarks bar/Dev/Rust/Rust tips.md")).unwrap();
    assert!(note.contains("https://example.org/blog/rust-tips"));
    assert!(note.contains("status: bookmark-only"));
    assert!(dir.path().join(".bookmark-notes/cache.db").exists());

    // Second run hits the cache and skips every existing note
    cmd_in(&dir)
        .arg(fixture("chrome_export.html"))
        .arg("--rules")
        .arg(fixture("filter_rules.toml"))
        .args(["--output", "notes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 0 notes"))
        .stdout(predicate::str::contains("3 already present"));
}

#[test]
fn malformed_rules_fail() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.toml"), "[regex_deny]\npatterns = ['(unclosed']\n").unwrap();

    cmd_in(&dir)
        .arg(fixture("chrome_export.html"))
        .args(["--rules", "bad.toml", "--stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load filter rules"));
}

#[test]
fn missing_bookmark_file_fails() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir)
        .args(["absent.html", "--stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read bookmark file"));
}

#[test]
fn missing_rules_keep_nothing() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir)
        .arg(fixture("chrome_export.html"))
        .arg("--stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bookmarks kept: 0"))
        .stderr(predicate::str::contains("Rule file not found"));
}

#[test]
fn stats_reports_cache_contents() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir)
        .arg(fixture("chrome_export.html"))
        .arg("--rules")
        .arg(fixture("filter_rules.toml"))
        .args(["--output", "notes"])
        .assert()
        .success();

    cmd_in(&dir)
        .arg(fixture("chrome_export.html"))
        .arg("--rules")
        .arg(fixture("filter_rules.toml"))
        .arg("--stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 entries, 3 bookmarks)"));
}

#[test]
fn clear_cache_empties_the_database() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir)
        .arg(fixture("chrome_export.html"))
        .arg("--rules")
        .arg(fixture("filter_rules.toml"))
        .args(["--output", "notes"])
        .assert()
        .success();

    cmd_in(&dir)
        .arg("--clear-cache")
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 entries, 3 bookmarks)"))
        .stdout(predicate::str::contains("Cleared 1 cache entries"));

    cmd_in(&dir)
        .arg(fixture("chrome_export.html"))
        .arg("--rules")
        .arg(fixture("filter_rules.toml"))
        .arg("--stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("(0 entries, 0 bookmarks)"));
}

#[test]
fn clear_cache_without_a_cache() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir)
        .arg("--clear-cache")
        .assert()
        .success()
        .stdout(predicate::str::contains("not created yet"));

    assert!(!dir.path().join(".bookmark-notes").exists());
}

#[test]
fn bookmarks_are_required_without_clear_cache() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir).arg("--stats").assert().failure();
}
