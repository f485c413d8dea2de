//! Filter phase of the parse pipeline
//!
//! Phase 1 (the tree walk) produces a flat list of candidates. This module is
//! phase 2: every candidate goes through the filter ladder, either on the
//! calling thread or on a dedicated rayon pool. Both paths keep document order.

use crate::bookmarks::model::{BookmarkCandidate, BookmarkRecord};
use crate::rules::FilterRuleSet;
use crate::url::{evaluate, ExcludeReason, FilterDecision};
use crate::ParseError;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Progress callback, called with `(done, total)`
pub type ProgressFn<'a> = dyn Fn(usize, usize) + Sync + 'a;

/// Result of the filter phase
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Kept records in document order
    pub records: Vec<BookmarkRecord>,
    /// Total number of excluded candidates
    pub excluded: usize,
    /// Excluded candidates broken down by reason
    pub excluded_by_reason: HashMap<ExcludeReason, usize>,
}

impl FilterOutcome {
    fn from_results(results: Vec<Result<BookmarkRecord, ExcludeReason>>) -> Self {
        let mut outcome = Self::default();
        for result in results {
            match result {
                Ok(record) => outcome.records.push(record),
                Err(reason) => {
                    outcome.excluded += 1;
                    *outcome.excluded_by_reason.entry(reason).or_insert(0) += 1;
                }
            }
        }
        outcome
    }
}

fn decide(candidate: BookmarkCandidate, rules: &FilterRuleSet) -> Result<BookmarkRecord, ExcludeReason> {
    match evaluate(&candidate.link.url, rules) {
        FilterDecision::Keep(reason) => {
            tracing::debug!("Keeping {} ({:?})", candidate.link.url, reason);
            Ok(candidate.into_record())
        }
        FilterDecision::Exclude(reason) => {
            tracing::debug!("Excluding {} ({:?})", candidate.link.url, reason);
            Err(reason)
        }
    }
}

/// Filters candidates on the current thread
pub fn filter_sequential(candidates: Vec<BookmarkCandidate>, rules: &FilterRuleSet) -> FilterOutcome {
    let results = candidates
        .into_iter()
        .map(|candidate| decide(candidate, rules))
        .collect();
    FilterOutcome::from_results(results)
}

/// Filters candidates on a pool of `workers` threads
///
/// Output order matches [`filter_sequential`]. `progress` is called from
/// worker threads after each candidate, so calls may arrive out of order.
pub fn filter_parallel(
    candidates: Vec<BookmarkCandidate>,
    rules: &FilterRuleSet,
    workers: usize,
    progress: Option<&ProgressFn<'_>>,
) -> Result<FilterOutcome, ParseError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("bookmark-filter-{}", i))
        .build()
        .map_err(|e| ParseError::WorkerPool(e.to_string()))?;

    let total = candidates.len();
    let done = AtomicUsize::new(0);

    tracing::debug!("Filtering {} candidates on {} workers", total, workers.max(1));

    let results: Vec<_> = pool.install(|| {
        candidates
            .into_par_iter()
            .map(|candidate| {
                let result = decide(candidate, rules);
                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(report) = progress {
                    report(finished, total);
                }
                result
            })
            .collect()
    });

    Ok(FilterOutcome::from_results(results))
}
