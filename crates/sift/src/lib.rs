#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sift/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;

// Re-export main types from sub-crates
pub use sift_filings as filings;
pub use sift_output as output;
pub use sift_pipeline as pipeline;

pub use config::{FilterConfig, SiftConfig};
pub use error::{Result, SiftError};

use sift_filings::{CanonicalRegistry, HeaderMetadataParser, MdnaExtractor};
use sift_pipeline::{ArchiveProcessor, DirectoryProcessor};

/// Archive processor wired with the default collaborators.
pub type DefaultArchiveProcessor =
    ArchiveProcessor<HeaderMetadataParser, CanonicalRegistry, MdnaExtractor>;

/// Directory processor wired with the default collaborators.
pub type DefaultDirectoryProcessor =
    DirectoryProcessor<HeaderMetadataParser, CanonicalRegistry, MdnaExtractor>;

/// Build a directory processor from configuration.
///
/// Single archives can be run through
/// [`DirectoryProcessor::archive_processor`].
pub fn default_processor(config: &SiftConfig) -> DefaultDirectoryProcessor {
    DirectoryProcessor::new(ArchiveProcessor::with_config(
        HeaderMetadataParser::new(),
        CanonicalRegistry::new(),
        MdnaExtractor::new(config.extractor.clone()),
        config.pipeline.clone(),
    ))
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
