//! Error types for the facade crate.

use sift_filings::FilingError;
use sift_pipeline::PipelineError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration and run setup.
pub type Result<T> = std::result::Result<T, SiftError>;

/// Errors raised while loading configuration or starting a run.
#[derive(Debug, Error)]
pub enum SiftError {
    /// Configuration file could not be read
    #[error("Failed to read config {}: {source}", path.display())]
    ConfigRead {
        /// Config file location
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`crate::SiftConfig`]
    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Issuer filter could not be built
    #[error(transparent)]
    Filing(#[from] FilingError),

    /// Directory run could not start
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
