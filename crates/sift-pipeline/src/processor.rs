//! Single-archive processing.
//!
//! An archive run goes through these stages:
//! 1. Open the archive and list members with an accepted text extension
//! 2. Extract each member into a scratch area, parse its metadata and apply
//!    the issuer filter
//! 3. Register members with complete metadata for canonical selection
//! 4. Extract content from the selected members
//!
//! Every member is isolated: a failure at any stage becomes an error record
//! and the run moves on to the next member.

use crate::archive::{FilingArchive, ScratchArea};
use crate::config::PipelineConfig;
use crate::stats::ArchiveStats;
use sift_filings::{ContentExtractor, IssuerFilter, MetadataParser, SelectionRegistry};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Message recorded when the extractor finds nothing in a selected filing.
pub const EXTRACTION_FAILED: &str = "Extraction failed";

/// What happened to a member after metadata parsing.
enum Admission {
    Registered,
    Filtered,
    Incomplete,
}

/// Runs the filing pipeline over one zip archive.
///
/// Collaborators are injected at construction. The registry is shared by
/// every call; callers running several archives reset it in between (see
/// [`crate::DirectoryProcessor`]).
#[derive(Debug)]
pub struct ArchiveProcessor<P, R, E> {
    parser: P,
    registry: R,
    extractor: E,
    config: PipelineConfig,
}

impl<P, R, E> ArchiveProcessor<P, R, E>
where
    P: MetadataParser,
    R: SelectionRegistry,
    E: ContentExtractor,
{
    /// Create a processor with the default configuration.
    pub fn new(parser: P, registry: R, extractor: E) -> Self {
        Self::with_config(parser, registry, extractor, PipelineConfig::default())
    }

    /// Create a processor with an explicit configuration.
    pub const fn with_config(parser: P, registry: R, extractor: E, config: PipelineConfig) -> Self {
        Self {
            parser,
            registry,
            extractor,
            config,
        }
    }

    /// Pipeline configuration.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Metadata parser.
    pub const fn parser(&self) -> &P {
        &self.parser
    }

    /// Content extractor.
    pub const fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Selection registry.
    pub const fn registry(&self) -> &R {
        &self.registry
    }

    /// Mutable selection registry.
    pub const fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    /// Process every filing in the archive at `archive_path`.
    ///
    /// Never fails: a corrupt archive yields all-zero counters and a single
    /// error record tagged with the archive identifier.
    ///
    /// Member failures, content extraction included, are recorded against the
    /// member name inside the archive. [`ErrorRecord::item`] never holds a
    /// scratch path, so rerunning an archive gives identical statistics.
    ///
    /// Selected filings are extracted in the order the registry returns them.
    ///
    /// [`ErrorRecord::item`]: crate::ErrorRecord::item
    pub fn process_zip_file(
        &mut self,
        archive_path: &Path,
        filter: Option<&dyn IssuerFilter>,
    ) -> ArchiveStats {
        let archive_id = archive_path.display().to_string();
        let mut stats = ArchiveStats::new(archive_id.as_str());

        let mut archive = match FilingArchive::open(archive_path) {
            Ok(archive) => archive,
            Err(e) => {
                tracing::warn!(archive = %archive_id, error = %e, "cannot open archive");
                stats.push_error(archive_id, e);
                return stats;
            }
        };

        if archive.is_empty() {
            tracing::debug!(archive = %archive.path().display(), "archive has no members");
        }
        let members = archive.candidate_members(&self.config);
        stats.total_candidates = members.len();
        tracing::debug!(
            archive = %archive.path().display(),
            members = archive.len(),
            candidates = members.len(),
            "opened archive"
        );

        let scratch = match ScratchArea::new() {
            Ok(scratch) => scratch,
            Err(e) => {
                tracing::warn!(archive = %archive_id, error = %e, "cannot create scratch area");
                stats.push_error(archive_id, e);
                return stats;
            }
        };

        let mut registered: Vec<(&str, PathBuf)> = Vec::new();
        for member in &members {
            let location = match scratch.extract(&mut archive, member) {
                Ok(location) => location,
                Err(e) => {
                    tracing::warn!(member = %member, error = %e, "member extraction failed");
                    stats.record_failure(member.as_str(), e);
                    continue;
                }
            };

            match self.admit(&location, filter) {
                Ok(Admission::Registered) => registered.push((member.as_str(), location)),
                Ok(Admission::Filtered) => {
                    tracing::debug!(member = %member, "rejected by issuer filter");
                    stats.filtered_out += 1;
                }
                Ok(Admission::Incomplete) => {
                    tracing::debug!(member = %member, "incomplete metadata, skipping");
                }
                Err(e) => {
                    tracing::warn!(member = %member, error = %e, "metadata or registration failed");
                    stats.record_failure(member.as_str(), e);
                }
            }
        }

        let selection = self.registry.select();
        let members_by_location: HashMap<&Path, &str> = registered
            .iter()
            .map(|(member, location)| (location.as_path(), *member))
            .collect();

        for location in &selection.process {
            let Some(&member) = members_by_location.get(location.as_path()) else {
                tracing::debug!(location = %location.display(), "selected location not in this archive");
                continue;
            };
            match self.extractor.extract(location) {
                Ok(Some(_)) => stats.processed += 1,
                Ok(None) => {
                    tracing::warn!(member = %member, "no content extracted");
                    stats.record_failure(member, EXTRACTION_FAILED);
                }
                Err(e) => {
                    tracing::warn!(member = %member, error = %e, "content extraction failed");
                    stats.record_failure(member, e);
                }
            }
        }

        tracing::info!(
            archive = %stats.archive_id,
            candidates = stats.total_candidates,
            processed = stats.processed,
            filtered = stats.filtered_out,
            failed = stats.failed,
            duplicates = selection.duplicates.len(),
            "archive complete"
        );
        stats
    }

    fn admit(
        &mut self,
        location: &Path,
        filter: Option<&dyn IssuerFilter>,
    ) -> sift_filings::Result<Admission> {
        let meta = self.parser.parse(location)?;

        if let Some(filter) = filter.filter(|f| f.has_active_rules())
            && !filter.should_process(
                meta.issuer_id.as_deref(),
                meta.period.as_deref(),
                meta.document_type.as_deref(),
            )
        {
            return Ok(Admission::Filtered);
        }

        let Some((issuer_id, period, document_type)) = meta.complete() else {
            return Ok(Admission::Incomplete);
        };
        self.registry
            .register(location, issuer_id, period, document_type)?;
        Ok(Admission::Registered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_filings::{CanonicalRegistry, FilingMetadata, HeaderMetadataParser};
    use std::fs::File;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    /// Accepts every file that is not empty.
    #[derive(Debug)]
    struct NonEmpty;

    impl ContentExtractor for NonEmpty {
        type Output = usize;

        fn extract(&self, path: &Path) -> sift_filings::Result<Option<usize>> {
            let len = std::fs::read(path)?.len();
            Ok((len > 0).then_some(len))
        }
    }

    fn build_zip(dir: &Path, members: &[(&str, &str)]) -> PathBuf {
        let path = dir.join("batch.zip");
        let mut writer = zip::ZipWriter::new(File::create(&path).unwrap());
        for (name, contents) in members {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    fn processor() -> ArchiveProcessor<HeaderMetadataParser, CanonicalRegistry, NonEmpty> {
        ArchiveProcessor::new(HeaderMetadataParser::new(), CanonicalRegistry::new(), NonEmpty)
    }

    #[test]
    fn test_non_text_members_are_not_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let path = build_zip(
            dir.path(),
            &[
                ("20230301_10-K_edgar_data_1_0000000001-23-000001.txt", "body"),
                ("index.htm", "<html>"),
                ("readme.md", "notes"),
            ],
        );

        let stats = processor().process_zip_file(&path, None);
        assert_eq!(stats.total_candidates, 1);
        assert_eq!(stats.processed, 1);
    }

    #[test]
    fn test_selected_but_empty_is_extraction_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = build_zip(
            dir.path(),
            &[("20230301_10-K_edgar_data_1_0000000001-23-000001.txt", "")],
        );

        let stats = processor().process_zip_file(&path, None);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.errors[0].message, EXTRACTION_FAILED);
        assert_eq!(
            stats.errors[0].item,
            "20230301_10-K_edgar_data_1_0000000001-23-000001.txt"
        );
    }

    #[test]
    fn test_missing_archive_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.zip");

        let stats = processor().process_zip_file(&path, None);
        assert_eq!(stats.total_candidates, 0);
        assert_eq!(stats.errors.len(), 1);
        assert_eq!(stats.errors[0].item, path.display().to_string());
    }

    #[test]
    fn test_incomplete_metadata_is_uncounted() {
        let meta = FilingMetadata {
            issuer_id: Some("0000000001".to_string()),
            ..FilingMetadata::default()
        };
        assert!(meta.complete().is_none());

        let dir = tempfile::tempdir().unwrap();
        let path = build_zip(dir.path(), &[("notes.txt", "nothing useful")]);

        let stats = processor().process_zip_file(&path, None);
        assert_eq!(stats.total_candidates, 1);
        assert_eq!(stats.accounted(), 0);
        assert!(stats.errors.is_empty());
    }
}
