//! Error types for pipeline operations.

use sift_filings::FilingError;
use std::path::PathBuf;
use thiserror::Error;
use zip::result::ZipError;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors raised while reading archives or directories.
///
/// None of these escape a processor run except [`PipelineError::ReadDirectory`];
/// the rest are converted into error records on the run statistics.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The file is not a readable zip container
    #[error("Corrupt archive {}: {source}", archive.display())]
    CorruptArchive {
        /// Archive location
        archive: PathBuf,
        /// Underlying zip error
        source: ZipError,
    },

    /// A member could not be read from the archive
    #[error("Zip error: {0}")]
    Zip(#[from] ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata, filtering, selection or extraction error
    #[error(transparent)]
    Filing(#[from] FilingError),

    /// A member name that would escape the scratch area
    #[error("Unsafe archive entry name: {0}")]
    UnsafeEntryName(String),

    /// The input directory could not be listed
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDirectory {
        /// Directory location
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },
}
