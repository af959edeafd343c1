//! Run reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sift_pipeline::{ArchiveStats, DirectoryStats};
use thiserror::Error;

/// Error records listed in text reports before the rest are summarized.
const MAX_LISTED_ERRORS: usize = 20;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The builder was given no statistics.
    #[error("No run statistics supplied")]
    MissingStats,
}

/// A report for one directory or archive run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Directory or archive that was processed.
    pub input: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Run statistics. A single-archive run appears as a one-archive directory.
    pub stats: DirectoryStats,
}

impl RunReport {
    /// Create a new report.
    pub fn new(input: String, stats: DirectoryStats) -> Self {
        Self {
            input,
            timestamp: Utc::now(),
            stats,
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Format as an ASCII table for terminal output.
    pub fn to_ascii_table(&self) -> String {
        let stats = &self.stats;
        let mut output = String::new();

        output.push_str(&format!("\nSift Run: {}\n", self.input));
        output.push_str(&format!("Generated: {}\n", self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output.push_str(&format!(
            "{:<36} {:>10} {:>10} {:>8} {:>10}\n",
            "Archive", "Candidates", "Processed", "Failed", "Filtered"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for archive in &stats.archive_results {
            output.push_str(&format!(
                "{:<36} {:>10} {:>10} {:>8} {:>10}\n",
                truncate(&archive_name(archive), 36),
                archive.total_candidates,
                archive.processed,
                archive.failed,
                archive.filtered_out
            ));
        }

        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<36} {:>10} {:>10} {:>8} {:>10}\n",
            format!("Total ({} archives)", stats.total_archives),
            stats.total_candidates,
            stats.processed,
            stats.failed,
            stats.filtered_out
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&format!("Success rate: {:.2}%\n", stats.success_rate() * 100.0));

        let error_count = stats.error_count();
        if error_count > 0 {
            output.push_str(&format!("\nErrors ({error_count}):\n"));
            for (archive, error) in stats.errors().take(MAX_LISTED_ERRORS) {
                output.push_str(&format!("  {archive}: {}: {}\n", error.item, error.message));
            }
            if error_count > MAX_LISTED_ERRORS {
                output.push_str(&format!("  ... and {} more\n", error_count - MAX_LISTED_ERRORS));
            }
        }

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let stats = &self.stats;
        let mut output = String::new();

        output.push_str(&format!("# Sift Run: {}\n\n", self.input));
        output.push_str(&format!("**Generated:** {}\n\n", self.timestamp.to_rfc3339()));

        output.push_str("| Archive | Candidates | Processed | Failed | Filtered |\n");
        output.push_str("|---------|------------|-----------|--------|----------|\n");
        for archive in &stats.archive_results {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                archive_name(archive),
                archive.total_candidates,
                archive.processed,
                archive.failed,
                archive.filtered_out
            ));
        }
        output.push('\n');

        output.push_str("## Summary\n\n");
        output.push_str(&format!("- **Archives:** {}\n", stats.total_archives));
        output.push_str(&format!("- **Candidates:** {}\n", stats.total_candidates));
        output.push_str(&format!("- **Processed:** {}\n", stats.processed));
        output.push_str(&format!("- **Failed:** {}\n", stats.failed));
        output.push_str(&format!("- **Filtered out:** {}\n", stats.filtered_out));
        output.push_str(&format!(
            "- **Success rate:** {:.2}%\n",
            stats.success_rate() * 100.0
        ));

        if stats.error_count() > 0 {
            output.push_str("\n## Errors\n\n");
            for (archive, error) in stats.errors() {
                output.push_str(&format!("- `{archive}` `{}`: {}\n", error.item, error.message));
            }
        }

        output
    }
}

fn archive_name(stats: &ArchiveStats) -> String {
    std::path::Path::new(&stats.archive_id)
        .file_name()
        .map_or_else(|| stats.archive_id.clone(), |n| n.to_string_lossy().into_owned())
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct RunReportBuilder {
    input: Option<String>,
    stats: Option<DirectoryStats>,
}

impl RunReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the processed input path.
    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Report on a directory run.
    pub fn directory(mut self, stats: DirectoryStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Report on a single-archive run.
    pub fn archive(mut self, stats: ArchiveStats) -> Self {
        let id = stats.archive_id.clone();
        self.stats = Some(DirectoryStats::from_archive_results(id, [stats]));
        self
    }

    /// Build the report. The input defaults to the statistics' directory.
    pub fn build(self) -> Result<RunReport, ReportError> {
        let stats = self.stats.ok_or(ReportError::MissingStats)?;
        let input = self.input.unwrap_or_else(|| stats.directory.clone());
        Ok(RunReport::new(input, stats))
    }
}
