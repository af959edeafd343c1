//! Export of run statistics.
//!
//! CSV exports carry one row per archive; error records go to a separate CSV
//! because an archive can have any number of them. JSON exports serialize the
//! statistics structures as-is.

use serde::{Deserialize, Serialize};
use sift_pipeline::{ArchiveStats, DirectoryStats};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Pick a format from a file extension. JSON files are pretty-printed.
    ///
    /// # Errors
    /// Returns [`ExportError::InvalidFormat`] for anything but `.csv` and `.json`.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::PrettyJson),
            _ => Err(ExportError::InvalidFormat(path.display().to_string())),
        }
    }
}

/// One CSV row per archive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArchiveRow {
    /// Archive identifier.
    pub archive: String,
    /// Members with an accepted extension.
    pub total_candidates: usize,
    /// Candidates whose content was extracted.
    pub processed: usize,
    /// Failed candidates.
    pub failed: usize,
    /// Candidates rejected by the issuer filter.
    pub filtered_out: usize,
    /// Number of error records.
    pub errors: usize,
    /// `processed / (processed + failed)`.
    pub success_rate: f64,
}

impl From<&ArchiveStats> for ArchiveRow {
    fn from(stats: &ArchiveStats) -> Self {
        Self {
            archive: stats.archive_id.clone(),
            total_candidates: stats.total_candidates,
            processed: stats.processed,
            failed: stats.failed,
            filtered_out: stats.filtered_out,
            errors: stats.errors.len(),
            success_rate: stats.success_rate(),
        }
    }
}

/// One CSV row per error record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorRow {
    /// Archive the error was recorded on.
    pub archive: String,
    /// Failing archive or member.
    pub item: String,
    /// Failure cause.
    pub message: String,
}

fn error_rows(stats: &ArchiveStats) -> impl Iterator<Item = ErrorRow> + '_ {
    stats.errors.iter().map(|e| ErrorRow {
        archive: stats.archive_id.clone(),
        item: e.item.clone(),
        message: e.message.clone(),
    })
}

/// Where the error listing of a CSV export at `path` is written: `<stem>_errors.csv`.
pub fn errors_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map_or_else(|| "export".into(), |s| s.to_string_lossy());
    path.with_file_name(format!("{stem}_errors.csv"))
}

fn write_csv<T: Serialize>(rows: impl IntoIterator<Item = T>) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

/// Trait for exporting run statistics in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export the error records as CSV.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_errors_csv(&self) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// CSV exports also write the error listing next to `path` (see [`errors_path`]).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        fs::write(path, self.export_to_string(format)?)?;
        if format == ExportFormat::Csv {
            fs::write(errors_path(path), self.export_errors_csv()?)?;
        }
        Ok(())
    }
}

impl Exporter for ArchiveStats {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv([ArchiveRow::from(self)]),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    fn export_errors_csv(&self) -> Result<String, ExportError> {
        write_csv(error_rows(self))
    }
}

impl Exporter for DirectoryStats {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(self.archive_results.iter().map(ArchiveRow::from)),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    fn export_errors_csv(&self) -> Result<String, ExportError> {
        write_csv(self.archive_results.iter().flat_map(error_rows))
    }
}
