//! Directory-level batch processing.

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::processor::ArchiveProcessor;
use crate::stats::{ArchiveStats, DirectoryStats};
use sift_filings::{ContentExtractor, IssuerFilter, MetadataParser, SelectionRegistry};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Receives progress events from a directory run.
pub trait ProgressObserver {
    /// Archives were discovered and processing is about to start.
    fn directory_started(&self, _total_archives: usize) {}

    /// An archive is about to be processed.
    fn archive_started(&self, _archive: &Path) {}

    /// An archive finished processing.
    fn archive_finished(&self, _stats: &ArchiveStats) {}
}

/// Archives directly inside `directory`, sorted by name.
///
/// Hidden files and subdirectories are skipped. Extension matching is
/// case-sensitive.
///
/// # Errors
/// Returns [`PipelineError::ReadDirectory`] if the directory cannot be listed.
pub fn discover_archives(directory: &Path, config: &PipelineConfig) -> Result<Vec<PathBuf>> {
    let read_error = |source| PipelineError::ReadDirectory {
        path: directory.to_path_buf(),
        source,
    };

    let mut archives = BTreeSet::new();
    for entry in fs::read_dir(directory).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with('.') || !config.is_archive_name(name) || !path.is_file() {
            continue;
        }
        archives.insert(path);
    }
    Ok(archives.into_iter().collect())
}

/// Runs an [`ArchiveProcessor`] over every archive in a directory.
#[derive(Debug)]
pub struct DirectoryProcessor<P, R, E> {
    archives: ArchiveProcessor<P, R, E>,
}

impl<P, R, E> DirectoryProcessor<P, R, E>
where
    P: MetadataParser,
    R: SelectionRegistry,
    E: ContentExtractor,
{
    /// Wrap an archive processor.
    pub const fn new(archives: ArchiveProcessor<P, R, E>) -> Self {
        Self { archives }
    }

    /// Underlying archive processor.
    pub const fn archive_processor(&mut self) -> &mut ArchiveProcessor<P, R, E> {
        &mut self.archives
    }

    /// Process every archive in `directory`.
    ///
    /// # Errors
    /// Only listing the directory can fail; archive and member failures are
    /// recorded in the returned statistics.
    pub fn process_directory(
        &mut self,
        directory: &Path,
        filter: Option<&dyn IssuerFilter>,
    ) -> Result<DirectoryStats> {
        self.process_directory_with_progress(directory, filter, None)
    }

    /// Process every archive in `directory`, reporting progress to `observer`.
    ///
    /// # Errors
    /// Only listing the directory can fail.
    pub fn process_directory_with_progress(
        &mut self,
        directory: &Path,
        filter: Option<&dyn IssuerFilter>,
        observer: Option<&dyn ProgressObserver>,
    ) -> Result<DirectoryStats> {
        let archives = discover_archives(directory, self.archives.config())?;
        tracing::info!(
            directory = %directory.display(),
            archives = archives.len(),
            "discovered archives"
        );

        let mut stats = DirectoryStats::new(directory.display().to_string());
        stats.total_archives = archives.len();
        if let Some(observer) = observer {
            observer.directory_started(archives.len());
        }

        for archive in &archives {
            if let Some(observer) = observer {
                observer.archive_started(archive);
            }

            // Candidates must not leak between archives.
            self.archives.registry_mut().reset();
            let result = self.archives.process_zip_file(archive, filter);

            if let Some(observer) = observer {
                observer.archive_finished(&result);
            }
            stats.absorb(result);
        }

        tracing::info!(
            directory = %stats.directory,
            archives = stats.total_archives,
            processed = stats.processed,
            filtered = stats.filtered_out,
            failed = stats.failed,
            "directory complete"
        );
        Ok(stats)
    }
}
