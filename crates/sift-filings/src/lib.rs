#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sift/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod filter;
pub mod mdna;
pub mod metadata;
pub mod selection;

pub use error::{FilingError, Result};
pub use filter::{CikFilter, IssuerFilter};
pub use mdna::{ContentExtractor, ExtractorConfig, MdnaExtraction, MdnaExtractor};
pub use metadata::{FilingMetadata, HeaderMetadataParser, MetadataParser, normalize_cik};
pub use selection::{CanonicalRegistry, FilingCandidate, SelectionRegistry, SelectionResult};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
