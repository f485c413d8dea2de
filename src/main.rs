//! Bookmark-Notes main entry point
//!
//! This is the command-line interface for turning a browser bookmark export
//! into a tree of Markdown notes.

use anyhow::{bail, Context};
use bookmark_notes::bookmarks::{BookmarkParser, BookmarkRecord, ParseOutcome};
use bookmark_notes::notes::{find_duplicates, NoteIndex, NoteWriter};
use bookmark_notes::output::{print_statistics, summarize, NoteLayout};
use bookmark_notes::rules::{compute_rules_hash, load_rules};
use bookmark_notes::storage::{open_cache, BookmarkCache, CacheInfo, CacheKey, DEFAULT_MAX_AGE_DAYS};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Bookmark-Notes: bookmark export to Markdown notes
///
/// Reads a Netscape bookmark HTML export, keeps the bookmarks the filter rules
/// allow, and writes one Markdown note per bookmark, mirroring the bookmark
/// folders. Notes that already exist are left alone.
#[derive(Parser, Debug)]
#[command(name = "bookmark-notes")]
#[command(version = "1.0.0")]
#[command(about = "Turn a bookmark export into Markdown notes", long_about = None)]
struct Cli {
    /// Path to the bookmark HTML export
    #[arg(value_name = "BOOKMARKS", required_unless_present = "clear_cache")]
    bookmarks: Option<PathBuf>,

    /// Path to the TOML filter rule file
    #[arg(long, value_name = "FILE", default_value = "filter_rules.toml")]
    rules: PathBuf,

    /// Directory notes are written to
    #[arg(short, long, value_name = "DIR", default_value = "notes")]
    output: PathBuf,

    /// Path to the parse cache database
    #[arg(long, value_name = "FILE", default_value = ".bookmark-notes/cache.db")]
    cache: PathBuf,

    /// Worker threads for the filter phase (1 = single-threaded)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=256))]
    workers: u16,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show what would be written without writing anything
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show bookmark statistics and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,

    /// Neither read nor update the parse cache
    #[arg(long)]
    no_cache: bool,

    /// Empty the parse cache before doing anything else
    #[arg(long, conflicts_with = "no_cache")]
    clear_cache: bool,

    /// Drop cache entries older than this many days
    #[arg(long, value_name = "DAYS", default_value_t = DEFAULT_MAX_AGE_DAYS,
          value_parser = clap::value_parser!(i64).range(1..))]
    cache_max_age: i64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if cli.clear_cache {
        handle_clear_cache(&cli.cache)?;
    }

    let bookmarks_path = match cli.bookmarks.as_deref() {
        Some(path) => path,
        None => return Ok(()),
    };

    let parser = load_parser(&cli.rules)?;

    let html = std::fs::read_to_string(bookmarks_path)
        .with_context(|| format!("Failed to read bookmark file {}", bookmarks_path.display()))?;

    // Handle different modes
    if cli.stats {
        handle_stats(&cli, bookmarks_path, &parser, &html)
    } else {
        let bookmarks = load_bookmarks(&cli, bookmarks_path, &parser, &html)?;
        if cli.dry_run {
            handle_dry_run(&cli, &bookmarks)
        } else {
            handle_write(&cli, &bookmarks)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bookmark_notes=info,warn"),
            1 => EnvFilter::new("bookmark_notes=debug,info"),
            2 => EnvFilter::new("bookmark_notes=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_parser(path: &Path) -> anyhow::Result<BookmarkParser> {
    tracing::info!("Loading filter rules from: {}", path.display());

    let loaded = load_rules(path)
        .with_context(|| format!("Failed to load filter rules from {}", path.display()))?;

    if !loaded.is_fallback() {
        let hash = compute_rules_hash(path)?;
        tracing::info!("Rule file hash: {}", &hash[..12]);
    }

    Ok(BookmarkParser::new(loaded.rules))
}

fn parse(cli: &Cli, parser: &BookmarkParser, html: &str) -> anyhow::Result<ParseOutcome> {
    let outcome = if cli.workers > 1 {
        let progress = |done: usize, total: usize| {
            if done == total || done % 500 == 0 {
                tracing::debug!("Filtered {}/{} bookmarks", done, total);
            }
        };
        parser.parse_parallel(html, usize::from(cli.workers), Some(&progress))?
    } else {
        parser.parse_with_report(html)?
    };
    Ok(outcome)
}

fn format_cache_info(path: &Path, info: &CacheInfo) -> String {
    let mut line = format!(
        "Cache: {} ({} entries, {} bookmarks)",
        path.display(),
        info.entries,
        info.records
    );
    if let Some(oldest) = info.oldest {
        line.push_str(&format!(", oldest {}", oldest.format("%Y-%m-%d")));
    }
    line
}

/// Handles --clear-cache: reports what the cache held, then empties it
fn handle_clear_cache(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        println!("Cache: {} (not created yet)", path.display());
        return Ok(());
    }

    let mut cache =
        open_cache(path).with_context(|| format!("Failed to open cache {}", path.display()))?;
    println!("{}", format_cache_info(path, &cache.info()?));

    let removed = cache.clear()?;
    println!("✓ Cleared {} cache entries", removed);

    Ok(())
}

/// Parses the export, going through the cache unless disabled
fn load_bookmarks(
    cli: &Cli,
    bookmarks_path: &Path,
    parser: &BookmarkParser,
    html: &str,
) -> anyhow::Result<Vec<BookmarkRecord>> {
    if cli.no_cache {
        return Ok(parse(cli, parser, html)?.bookmarks);
    }

    let key = CacheKey::compute(html, parser.rules());
    let mut cache = open_cache(&cli.cache)
        .with_context(|| format!("Failed to open cache {}", cli.cache.display()))?;
    cache.cleanup_expired(chrono::Duration::days(cli.cache_max_age))?;

    if let Some(bookmarks) = cache.load(&key)? {
        tracing::info!("Cache hit: {} bookmarks", bookmarks.len());
        return Ok(bookmarks);
    }

    tracing::info!("Cache miss; parsing {}", bookmarks_path.display());
    let bookmarks = parse(cli, parser, html)?.bookmarks;
    cache.save(&key, &bookmarks)?;
    tracing::info!("{}", format_cache_info(&cli.cache, &cache.info()?));
    Ok(bookmarks)
}

/// Handles the --stats mode: prints statistics and exits
fn handle_stats(
    cli: &Cli,
    bookmarks_path: &Path,
    parser: &BookmarkParser,
    html: &str,
) -> anyhow::Result<()> {
    println!("Bookmarks: {}\n", bookmarks_path.display());

    let outcome = parse(cli, parser, html)?;
    let summary = summarize(&outcome.bookmarks);
    print_statistics(&summary, &outcome.report);

    if !cli.no_cache && cli.cache.exists() {
        let cache = open_cache(&cli.cache)
            .with_context(|| format!("Failed to open cache {}", cli.cache.display()))?;
        println!("\n{}", format_cache_info(&cli.cache, &cache.info()?));
    }

    Ok(())
}

/// Handles the --dry-run mode: shows what would be written
fn handle_dry_run(cli: &Cli, bookmarks: &[BookmarkRecord]) -> anyhow::Result<()> {
    println!("=== Bookmark-Notes Dry Run ===\n");

    let layout = NoteLayout::default();
    let index = NoteIndex::scan(&cli.output)?;
    let duplicates = find_duplicates(bookmarks, &index, &layout);

    println!("Output: {}", cli.output.display());
    println!("  Existing notes: {}", index.file_count());
    println!();

    println!("Would write ({}):", bookmarks.len() - duplicates.count());
    for (i, bookmark) in bookmarks.iter().enumerate() {
        if duplicates.is_duplicate(i) {
            continue;
        }
        let path = layout.note_path(bookmark);
        let folder_key = path.folder_key();
        if folder_key.is_empty() {
            println!("  - {}{}", path.stem, layout.extension());
        } else {
            println!("  - {}/{}{}", folder_key, path.stem, layout.extension());
        }
    }

    if !duplicates.is_empty() {
        println!("\nAlready present ({}):", duplicates.count());
        for file in &duplicates.files {
            println!("  - {}", file);
        }
    }

    println!("\n✓ Nothing was written");

    Ok(())
}

/// Handles the main operation: writes notes
fn handle_write(cli: &Cli, bookmarks: &[BookmarkRecord]) -> anyhow::Result<()> {
    let layout = NoteLayout::default();
    let index = NoteIndex::scan(&cli.output)?;
    let duplicates = find_duplicates(bookmarks, &index, &layout);

    let writer = NoteWriter::new(&cli.output, layout);
    let report = writer.write_all(bookmarks, &duplicates);

    println!(
        "✓ Wrote {} notes to {} ({} already present)",
        report.written.len(),
        cli.output.display(),
        report.skipped_duplicates
    );

    if !report.failures.is_empty() {
        for failure in &report.failures {
            tracing::error!("{}: {}", failure.url, failure.error);
        }
        bail!("{} notes could not be written", report.failures.len());
    }

    Ok(())
}
