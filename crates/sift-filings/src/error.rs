//! Error types for filing operations.

use thiserror::Error;

/// Result type for filing operations.
pub type Result<T> = std::result::Result<T, FilingError>;

/// Errors that can occur while parsing, filtering, selecting or extracting filings.
#[derive(Debug, Error)]
pub enum FilingError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata parsing error
    #[error("Metadata parsing error: {0}")]
    Parse(String),

    /// A candidate was registered with a blank field
    #[error("Invalid filing candidate: {0}")]
    InvalidCandidate(String),

    /// CIK that cannot be normalized
    #[error("Invalid CIK: {0}")]
    InvalidCik(String),

    /// CIK list could not be read
    #[error("CIK list error: {0}")]
    CikList(#[from] csv::Error),

    /// Content extraction error
    #[error("Extraction error: {0}")]
    Extraction(String),
}
