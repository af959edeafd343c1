//! Zip archive access and scratch extraction.
//!
//! This module provides:
//! - `FilingArchive`, a zip container whose text members are filing candidates
//! - `ScratchArea`, a temporary directory members are extracted into; it is
//!   removed when dropped, on every exit path of an archive run

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipArchive;

/// An opened zip archive of filings.
#[derive(Debug)]
pub struct FilingArchive {
    path: PathBuf,
    inner: ZipArchive<File>,
}

impl FilingArchive {
    /// Open the archive at `path`.
    ///
    /// # Errors
    /// Returns [`PipelineError::Io`] if the file cannot be opened and
    /// [`PipelineError::CorruptArchive`] if it is not a valid zip container.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let inner = ZipArchive::new(file).map_err(|source| PipelineError::CorruptArchive {
            archive: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    /// Archive location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of members, directories included.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the archive has no members.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Text member names, in archive listing order.
    pub fn candidate_members(&self, config: &PipelineConfig) -> Vec<String> {
        self.inner
            .file_names()
            .filter(|name| config.is_text_member(name))
            .map(str::to_string)
            .collect()
    }
}

/// Temporary directory holding the members extracted from one archive.
#[derive(Debug)]
pub struct ScratchArea {
    dir: TempDir,
}

impl ScratchArea {
    /// Create a fresh scratch directory.
    ///
    /// # Errors
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("sift-").tempdir()?;
        Ok(Self { dir })
    }

    /// Root of the scratch directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Extract `member` from `archive`, returning the extracted file location.
    ///
    /// The member's relative path is kept below the scratch root.
    ///
    /// # Errors
    /// Returns an error if the member is missing, unreadable, or its name
    /// points outside the scratch area.
    pub fn extract(&self, archive: &mut FilingArchive, member: &str) -> Result<PathBuf> {
        let mut entry = archive.inner.by_name(member)?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| PipelineError::UnsafeEntryName(member.to_string()))?;

        let target = self.dir.path().join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        Ok(target)
    }
}
