#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sift/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod archive;
pub mod config;
pub mod directory;
pub mod error;
pub mod processor;
pub mod stats;

pub use archive::{FilingArchive, ScratchArea};
pub use config::PipelineConfig;
pub use directory::{DirectoryProcessor, ProgressObserver, discover_archives};
pub use error::{PipelineError, Result};
pub use processor::ArchiveProcessor;
pub use stats::{ArchiveStats, DirectoryStats, ErrorRecord};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
