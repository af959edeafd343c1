//! Run statistics.
//!
//! `ArchiveStats` counts what happened to the candidates of one archive and
//! keeps one error record per failure. `DirectoryStats` folds archive
//! results; each of its totals is the sum of the same field over
//! `archive_results`.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One recorded failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Archive or member the failure belongs to
    pub item: String,
    /// Failure cause
    pub message: String,
}

/// Statistics for one archive.
///
/// `processed + failed + filtered_out` never exceeds `total_candidates`.
/// Candidates with incomplete metadata are counted in none of the three.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveStats {
    /// Archive identifier
    pub archive_id: String,
    /// Members with an accepted text extension
    pub total_candidates: usize,
    /// Candidates whose content was extracted
    pub processed: usize,
    /// Candidates that failed extraction, parsing, registration or content extraction
    pub failed: usize,
    /// Candidates rejected by the issuer filter
    pub filtered_out: usize,
    /// Failures in the order they happened
    pub errors: Vec<ErrorRecord>,
}

impl ArchiveStats {
    /// Empty statistics for an archive.
    pub fn new(archive_id: impl Into<String>) -> Self {
        Self {
            archive_id: archive_id.into(),
            ..Self::default()
        }
    }

    /// Append an error record without touching the counters.
    pub fn push_error(&mut self, item: impl Into<String>, message: impl Display) {
        self.errors.push(ErrorRecord {
            item: item.into(),
            message: message.to_string(),
        });
    }

    /// Count a failed candidate and record why.
    pub fn record_failure(&mut self, item: impl Into<String>, message: impl Display) {
        self.failed += 1;
        self.push_error(item, message);
    }

    /// Candidates that ended up in one of the three counters.
    pub const fn accounted(&self) -> usize {
        self.processed + self.failed + self.filtered_out
    }

    /// `processed / (processed + failed)`, or 0 when nothing was attempted.
    pub fn success_rate(&self) -> f64 {
        success_rate(self.processed, self.failed)
    }
}

/// Statistics for one directory run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryStats {
    /// Directory identifier
    pub directory: String,
    /// Archives discovered
    pub total_archives: usize,
    /// Sum of archive candidates
    pub total_candidates: usize,
    /// Sum of processed candidates
    pub processed: usize,
    /// Sum of failed candidates
    pub failed: usize,
    /// Sum of filtered candidates
    pub filtered_out: usize,
    /// One entry per archive, in processing order
    pub archive_results: Vec<ArchiveStats>,
}

impl DirectoryStats {
    /// Empty statistics for a directory.
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Fold statistics from an already processed set of archives.
    pub fn from_archive_results(
        directory: impl Into<String>,
        results: impl IntoIterator<Item = ArchiveStats>,
    ) -> Self {
        let mut stats = Self::new(directory);
        for result in results {
            stats.total_archives += 1;
            stats.absorb(result);
        }
        stats
    }

    /// Add one archive's counters to the running totals and keep its result.
    pub fn absorb(&mut self, result: ArchiveStats) {
        self.total_candidates += result.total_candidates;
        self.processed += result.processed;
        self.failed += result.failed;
        self.filtered_out += result.filtered_out;
        self.archive_results.push(result);
    }

    /// Error records across all archives.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &ErrorRecord)> {
        self.archive_results
            .iter()
            .flat_map(|a| a.errors.iter().map(move |e| (a.archive_id.as_str(), e)))
    }

    /// Total number of error records.
    pub fn error_count(&self) -> usize {
        self.archive_results.iter().map(|a| a.errors.len()).sum()
    }

    /// `processed / (processed + failed)`, or 0 when nothing was attempted.
    pub fn success_rate(&self) -> f64 {
        success_rate(self.processed, self.failed)
    }
}

fn success_rate(processed: usize, failed: usize) -> f64 {
    let attempted = processed + failed;
    if attempted == 0 {
        0.0
    } else {
        processed as f64 / attempted as f64
    }
}
